use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// Calendar unit a recurrence advances by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Weekly, Frequency::Monthly, Frequency::Yearly];

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Yearly => "Yearly",
        }
    }

    pub fn unit_label(self, count: u32) -> &'static str {
        match (self, count == 1) {
            (Frequency::Weekly, true) => "week",
            (Frequency::Weekly, false) => "weeks",
            (Frequency::Monthly, true) => "month",
            (Frequency::Monthly, false) => "months",
            (Frequency::Yearly, true) => "year",
            (Frequency::Yearly, false) => "years",
        }
    }

    /// Adds `units` whole units of this frequency to `from`.
    ///
    /// Month and year steps clamp the day to the end of a shorter target month.
    /// Returns `None` when the result falls outside the representable range.
    pub fn checked_add(self, from: NaiveDate, units: u32) -> Option<NaiveDate> {
        match self {
            Frequency::Weekly => {
                let days = u64::from(units).checked_mul(7)?;
                from.checked_add_days(Days::new(days))
            }
            Frequency::Monthly => from.checked_add_months(Months::new(units)),
            Frequency::Yearly => {
                let months = units.checked_mul(12)?;
                from.checked_add_months(Months::new(months))
            }
        }
    }
}

/// How often a recurring transaction repeats and when it stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    #[serde(default = "default_interval", deserialize_with = "deserialize_interval")]
    interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Builds a rule, clamping `interval` to at least one unit.
    pub fn new(frequency: Frequency, interval: u32, end_date: Option<NaiveDate>) -> Self {
        Self {
            frequency,
            interval: interval.max(1),
            end_date,
        }
    }

    pub fn weekly() -> Self {
        Self::new(Frequency::Weekly, 1, None)
    }

    pub fn biweekly() -> Self {
        Self::new(Frequency::Weekly, 2, None)
    }

    pub fn monthly() -> Self {
        Self::new(Frequency::Monthly, 1, None)
    }

    pub fn yearly() -> Self {
        Self::new(Frequency::Yearly, 1, None)
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn set_interval(&mut self, interval: u32) {
        self.interval = interval.max(1);
    }

    pub fn with_end_date(mut self, end_date: Option<NaiveDate>) -> Self {
        self.end_date = end_date;
        self
    }

    pub fn label(&self) -> String {
        match (self.frequency, self.interval) {
            (frequency, 1) => frequency.label().into(),
            (Frequency::Weekly, 2) => "Biweekly".into(),
            (frequency, n) => format!("Every {} {}", n, title_case(frequency.unit_label(n))),
        }
    }

    /// End date suggested when a user opts into an explicit end: twelve
    /// intervals for weekly and monthly rules, three for yearly ones.
    pub fn default_end_date(&self, start: NaiveDate) -> NaiveDate {
        let periods = match self.frequency {
            Frequency::Weekly | Frequency::Monthly => 12,
            Frequency::Yearly => 3,
        };
        self.interval
            .checked_mul(periods)
            .and_then(|units| self.frequency.checked_add(start, units))
            .unwrap_or(start)
    }
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self::monthly()
    }
}

fn default_interval() -> u32 {
    1
}

fn deserialize_interval<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(1, i64::from(u32::MAX)) as u32)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Shortcut choices offered when picking a recurrence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecurrencePreset {
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
    Custom,
}

impl RecurrencePreset {
    pub const ALL: [RecurrencePreset; 5] = [
        RecurrencePreset::Weekly,
        RecurrencePreset::Biweekly,
        RecurrencePreset::Monthly,
        RecurrencePreset::Yearly,
        RecurrencePreset::Custom,
    ];

    pub fn from_rule(rule: &RecurrenceRule) -> Self {
        match (rule.frequency, rule.interval) {
            (Frequency::Weekly, 1) => RecurrencePreset::Weekly,
            (Frequency::Weekly, 2) => RecurrencePreset::Biweekly,
            (Frequency::Monthly, 1) => RecurrencePreset::Monthly,
            (Frequency::Yearly, 1) => RecurrencePreset::Yearly,
            _ => RecurrencePreset::Custom,
        }
    }

    /// Applies the preset to `rule`. `Custom` leaves frequency and interval as-is.
    pub fn apply(self, rule: &mut RecurrenceRule) {
        let (frequency, interval) = match self {
            RecurrencePreset::Weekly => (Frequency::Weekly, 1),
            RecurrencePreset::Biweekly => (Frequency::Weekly, 2),
            RecurrencePreset::Monthly => (Frequency::Monthly, 1),
            RecurrencePreset::Yearly => (Frequency::Yearly, 1),
            RecurrencePreset::Custom => return,
        };
        rule.frequency = frequency;
        rule.set_interval(interval);
    }

    pub fn label(self) -> &'static str {
        match self {
            RecurrencePreset::Weekly => "Weekly",
            RecurrencePreset::Biweekly => "Biweekly",
            RecurrencePreset::Monthly => "Monthly",
            RecurrencePreset::Yearly => "Yearly",
            RecurrencePreset::Custom => "Custom",
        }
    }
}
