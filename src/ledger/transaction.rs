use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurrence::RecurrenceRule;

/// A single dated charge or income entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    /// Negative for expenses, positive for income.
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<Uuid>,
}

impl Transaction {
    pub fn new(amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            date,
            note: String::new(),
            category_id: None,
            is_recurring: false,
            recurrence: None,
            series_id: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_category(mut self, category_id: Option<Uuid>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.set_recurrence(Some(rule));
        self
    }

    /// Sets or clears the recurrence rule, keeping `is_recurring` in step.
    ///
    /// Clearing the rule leaves `series_id` untouched so a detached instance
    /// still shows which series it came from.
    pub fn set_recurrence(&mut self, rule: Option<RecurrenceRule>) {
        self.is_recurring = rule.is_some();
        self.recurrence = rule;
    }

    /// Series identifier, falling back to this transaction's own id when it
    /// has not been assigned one yet.
    pub fn recurrence_series(&self) -> Uuid {
        self.series_id.unwrap_or(self.id)
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }
}
