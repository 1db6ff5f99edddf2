use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::month_start;

/// A monthly spending limit, either overall or for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    /// Always the first day of the month the budget applies to.
    pub month_start: NaiveDate,
    pub amount: f64,
    /// `None` marks the overall budget for the month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    /// When set, the overall amount mirrors the month's total income.
    #[serde(default)]
    pub sync_with_income: bool,
}

impl Budget {
    pub fn new(month: NaiveDate, amount: f64, category_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            month_start: month_start(month),
            amount,
            category_id,
            sync_with_income: false,
        }
    }

    pub fn is_overall(&self) -> bool {
        self.category_id.is_none()
    }

    pub fn matches(&self, month: NaiveDate, category_id: Option<Uuid>) -> bool {
        self.month_start == month_start(month) && self.category_id == category_id
    }
}
