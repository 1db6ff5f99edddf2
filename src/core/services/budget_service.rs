use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::core::time::Clock;
use crate::ledger::{month_start, Budget, DateWindow, Transaction};
use crate::storage::{TransactionQuery, TransactionStore};

use super::{CategoryService, ServiceError, ServiceResult};

pub struct BudgetService;

impl BudgetService {
    /// Sets the overall budget for the month containing `month`. An explicit
    /// amount turns income syncing off.
    pub fn set_overall<S: TransactionStore>(
        store: &mut S,
        month: NaiveDate,
        amount: f64,
    ) -> ServiceResult<Uuid> {
        Self::validate_amount(amount)?;
        let id = store.upsert_budget(Budget::new(month, amount, None))?;
        info!(month = %month_start(month), amount, "overall budget set");
        Ok(id)
    }

    pub fn set_for_category<S: TransactionStore>(
        store: &mut S,
        month: NaiveDate,
        category_id: Uuid,
        amount: f64,
    ) -> ServiceResult<Uuid> {
        Self::validate_amount(amount)?;
        CategoryService::require(store, category_id)?;
        let id = store.upsert_budget(Budget::new(month, amount, Some(category_id)))?;
        info!(month = %month_start(month), category = %category_id, amount, "category budget set");
        Ok(id)
    }

    /// Toggles mirroring of the month's income into the overall budget and
    /// returns the resulting amount.
    pub fn set_sync_with_income<S: TransactionStore>(
        store: &mut S,
        month: NaiveDate,
        enabled: bool,
    ) -> ServiceResult<f64> {
        let mut budget = store
            .budget_for(month, None)
            .unwrap_or_else(|| Budget::new(month, 0.0, None));
        budget.sync_with_income = enabled;
        if enabled {
            budget.amount = Self::total_income(store, month)?;
        }
        let amount = budget.amount;
        store.upsert_budget(budget)?;
        Ok(amount)
    }

    /// Recomputes a synced overall budget from income. Returns the new amount,
    /// or `None` when the month's budget is not synced.
    pub fn refresh_synced_income<S: TransactionStore>(
        store: &mut S,
        month: NaiveDate,
    ) -> ServiceResult<Option<f64>> {
        let Some(mut budget) = store.budget_for(month, None) else {
            return Ok(None);
        };
        if !budget.sync_with_income {
            return Ok(None);
        }
        budget.amount = Self::total_income(store, month)?;
        let amount = budget.amount;
        store.upsert_budget(budget)?;
        debug!(month = %month_start(month), amount, "synced budget refreshed");
        Ok(Some(amount))
    }

    /// Makes sure the current month has an overall budget, creating one from
    /// the configured default when missing.
    pub fn ensure_overall_for_month<S: TransactionStore, C: Clock + ?Sized>(
        store: &mut S,
        clock: &C,
        config: &Config,
    ) -> ServiceResult<Budget> {
        let today = clock.today();
        if let Some(existing) = store.budget_for(today, None) {
            return Ok(existing);
        }
        let budget = Budget::new(today, config.default_overall_budget, None);
        store.upsert_budget(budget.clone())?;
        info!(
            month = %budget.month_start,
            amount = budget.amount,
            "created default overall budget"
        );
        Ok(budget)
    }

    pub fn total_income<S: TransactionStore>(store: &S, month: NaiveDate) -> ServiceResult<f64> {
        Ok(Self::month_transactions(store, month)?
            .iter()
            .filter(|txn| txn.is_income())
            .map(|txn| txn.amount)
            .sum())
    }

    /// Sum of spending in the month, as a positive number.
    pub fn total_expenses<S: TransactionStore>(store: &S, month: NaiveDate) -> ServiceResult<f64> {
        Ok(Self::month_transactions(store, month)?
            .iter()
            .filter(|txn| txn.is_expense())
            .map(|txn| -txn.amount)
            .sum())
    }

    fn month_transactions<S: TransactionStore>(
        store: &S,
        month: NaiveDate,
    ) -> ServiceResult<Vec<Transaction>> {
        Ok(store.query(&TransactionQuery::window(DateWindow::month_of(month)))?)
    }

    fn validate_amount(amount: f64) -> ServiceResult<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ServiceError::Invalid(
                "Budget amount must be zero or more".into(),
            ));
        }
        Ok(())
    }
}
