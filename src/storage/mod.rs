pub mod json_backend;

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::Result,
    ledger::{Budget, Category, DateWindow, Ledger, TailRegeneration, Transaction},
};

/// Filter for [`TransactionStore::query`]. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub series_id: Option<Uuid>,
    /// Inclusive lower bound on the transaction date.
    pub on_or_after: Option<NaiveDate>,
    pub window: Option<DateWindow>,
    pub category_ids: HashSet<Uuid>,
}

impl TransactionQuery {
    /// Every instance of `series_id`.
    pub fn series(series_id: Uuid) -> Self {
        Self {
            series_id: Some(series_id),
            ..Self::default()
        }
    }

    pub fn window(window: DateWindow) -> Self {
        Self {
            window: Some(window),
            ..Self::default()
        }
    }

    pub fn on_or_after(mut self, date: NaiveDate) -> Self {
        self.on_or_after = Some(date);
        self
    }

    pub fn in_categories(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.category_ids.extend(ids);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(series_id) = self.series_id {
            if txn.series_id != Some(series_id) {
                return false;
            }
        }
        if let Some(date) = self.on_or_after {
            if txn.date < date {
                return false;
            }
        }
        if let Some(window) = self.window {
            if !window.contains(txn.date) {
                return false;
            }
        }
        if !self.category_ids.is_empty() {
            match txn.category_id {
                Some(id) if self.category_ids.contains(&id) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Key-indexed store for transactions, categories, and budgets.
///
/// `query` must return transactions in ascending date order.
pub trait TransactionStore {
    fn insert(&mut self, transaction: Transaction) -> Result<Uuid>;
    fn update(&mut self, transaction: Transaction) -> Result<()>;
    fn delete(&mut self, id: Uuid) -> Result<Transaction>;
    fn transaction(&self, id: Uuid) -> Result<Transaction>;
    fn query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>>;

    /// Inserts `transactions` in order and returns their ids.
    ///
    /// This default stops at the first failure and keeps the earlier inserts.
    /// Stores that can validate the whole batch first should override it.
    fn insert_batch(&mut self, transactions: Vec<Transaction>) -> Result<Vec<Uuid>> {
        transactions
            .into_iter()
            .map(|txn| self.insert(txn))
            .collect()
    }

    fn insert_category(&mut self, category: Category) -> Result<Uuid>;
    fn update_category(&mut self, category: Category) -> Result<()>;
    /// Resolves a transaction's weak category reference.
    fn category(&self, id: Uuid) -> Option<Category>;
    /// All categories ordered by sort index, then name.
    fn categories(&self) -> Vec<Category>;

    fn upsert_budget(&mut self, budget: Budget) -> Result<Uuid>;
    fn budget_for(&self, month: NaiveDate, category_id: Option<Uuid>) -> Option<Budget>;
    fn budgets(&self) -> Vec<Budget>;

    /// Applies a tail regeneration: update the edited instance, delete the
    /// stale tail, insert the new followers.
    ///
    /// Implementations that can validate up front should do so and leave the
    /// store untouched on error; this default applies the steps in order.
    fn apply_regeneration(&mut self, plan: &TailRegeneration) -> Result<()> {
        self.update(plan.edited.clone())?;
        for id in &plan.to_delete {
            self.delete(*id)?;
        }
        for txn in &plan.to_create {
            self.insert(txn.clone())?;
        }
        Ok(())
    }
}

/// Abstraction over persistence backends capable of storing ledgers and snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger>;

    fn save_to_path(&self, ledger: &Ledger, path: &Path) -> Result<()> {
        json_backend::save_ledger_to_path(ledger, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Ledger> {
        json_backend::load_ledger_from_path(path)
    }
}

pub use json_backend::JsonStorage;
