use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    budget::Budget,
    category::{sort_categories, Category},
    recurring::TailRegeneration,
    transaction::Transaction,
};
use crate::{
    errors::{Result, SpenderError},
    storage::{TransactionQuery, TransactionStore},
};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory document holding every record of one user's finances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            categories: Vec::new(),
            transactions: Vec::new(),
            budgets: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn transaction_ref(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn transaction_mut(&mut self, id: Uuid) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|txn| txn.id == id)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Reports dangling category references and series holding two
    /// instances on the same date.
    pub fn warnings(&self) -> Vec<String> {
        let category_ids: HashSet<_> = self.categories.iter().map(|c| c.id).collect();
        let mut occurrences = HashSet::new();
        let mut warnings = Vec::new();

        for txn in &self.transactions {
            if let Some(category) = txn.category_id {
                if !category_ids.contains(&category) {
                    warnings.push(format!(
                        "transaction {} references missing category {}",
                        txn.id, category
                    ));
                }
            }
            if let Some(series_id) = txn.series_id {
                if !occurrences.insert((series_id, txn.date)) {
                    warnings.push(format!(
                        "series {} has more than one instance on {}",
                        series_id, txn.date
                    ));
                }
            }
            if txn.is_recurring && txn.recurrence.is_none() {
                warnings.push(format!(
                    "transaction {} is marked recurring without a rule",
                    txn.id
                ));
            }
        }
        warnings
    }

    fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.transactions
            .iter()
            .position(|txn| txn.id == id)
            .ok_or(SpenderError::TransactionNotFound(id))
    }
}

impl TransactionStore for Ledger {
    fn insert(&mut self, transaction: Transaction) -> Result<Uuid> {
        let id = transaction.id;
        if self.transaction_ref(id).is_some() {
            return Err(SpenderError::DuplicateId(id));
        }
        debug!(transaction = %id, date = %transaction.date, "inserting transaction");
        self.transactions.push(transaction);
        self.touch();
        Ok(id)
    }

    /// All or nothing: any id already stored or repeated in the batch fails
    /// the whole call before anything is written.
    fn insert_batch(&mut self, transactions: Vec<Transaction>) -> Result<Vec<Uuid>> {
        let mut incoming = HashSet::new();
        for txn in &transactions {
            if self.transaction_ref(txn.id).is_some() || !incoming.insert(txn.id) {
                return Err(SpenderError::DuplicateId(txn.id));
            }
        }
        let ids: Vec<Uuid> = transactions.iter().map(|txn| txn.id).collect();
        debug!(count = ids.len(), "inserting transaction batch");
        self.transactions.extend(transactions);
        self.touch();
        Ok(ids)
    }

    fn update(&mut self, transaction: Transaction) -> Result<()> {
        let idx = self.position(transaction.id)?;
        self.transactions[idx] = transaction;
        self.touch();
        Ok(())
    }

    fn delete(&mut self, id: Uuid) -> Result<Transaction> {
        let idx = self.position(id)?;
        let removed = self.transactions.remove(idx);
        self.touch();
        Ok(removed)
    }

    fn transaction(&self, id: Uuid) -> Result<Transaction> {
        self.transaction_ref(id)
            .cloned()
            .ok_or(SpenderError::TransactionNotFound(id))
    }

    fn query(&self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let mut matches: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|txn| query.matches(txn))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(matches)
    }

    fn insert_category(&mut self, category: Category) -> Result<Uuid> {
        if self.categories.iter().any(|c| c.id == category.id) {
            return Err(SpenderError::DuplicateId(category.id));
        }
        let id = category.id;
        self.categories.push(category);
        self.touch();
        Ok(id)
    }

    fn update_category(&mut self, category: Category) -> Result<()> {
        let existing = self
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or_else(|| SpenderError::CategoryNotFound(category.id))?;
        *existing = category;
        self.touch();
        Ok(())
    }

    fn category(&self, id: Uuid) -> Option<Category> {
        self.categories.iter().find(|c| c.id == id).cloned()
    }

    fn categories(&self) -> Vec<Category> {
        let mut categories = self.categories.clone();
        sort_categories(&mut categories);
        categories
    }

    fn upsert_budget(&mut self, budget: Budget) -> Result<Uuid> {
        if let Some(existing) = self
            .budgets
            .iter_mut()
            .find(|b| b.matches(budget.month_start, budget.category_id))
        {
            existing.amount = budget.amount;
            existing.sync_with_income = budget.sync_with_income;
            let id = existing.id;
            self.touch();
            return Ok(id);
        }
        let id = budget.id;
        self.budgets.push(budget);
        self.touch();
        Ok(id)
    }

    fn budget_for(&self, month: NaiveDate, category_id: Option<Uuid>) -> Option<Budget> {
        self.budgets
            .iter()
            .find(|b| b.matches(month, category_id))
            .cloned()
    }

    fn budgets(&self) -> Vec<Budget> {
        self.budgets.clone()
    }

    /// Validates every step before mutating, so a failed plan leaves the
    /// ledger unchanged.
    fn apply_regeneration(&mut self, plan: &TailRegeneration) -> Result<()> {
        self.position(plan.edited.id)?;
        for id in &plan.to_delete {
            self.position(*id)?;
        }
        let mut incoming = HashSet::new();
        for txn in &plan.to_create {
            let clashes_with_kept = self.transaction_ref(txn.id).is_some()
                && !plan.to_delete.contains(&txn.id);
            if clashes_with_kept || txn.id == plan.edited.id || !incoming.insert(txn.id) {
                return Err(SpenderError::DuplicateId(txn.id));
            }
        }

        let idx = self.position(plan.edited.id)?;
        self.transactions[idx] = plan.edited.clone();
        self.transactions
            .retain(|txn| !plan.to_delete.contains(&txn.id));
        self.transactions.extend(plan.to_create.iter().cloned());
        self.touch();

        info!(
            series = %plan.series_id,
            removed = plan.to_delete.len(),
            created = plan.to_create.len(),
            "regenerated series tail"
        );
        Ok(())
    }
}
