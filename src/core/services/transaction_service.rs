//! Creation and editing flows for transactions and recurring series.

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::core::services::{CategoryService, ServiceError, ServiceResult};
use crate::ledger::{RecurrenceEngine, RecurrenceRule, TailRegeneration, Transaction};
use crate::storage::{TransactionQuery, TransactionStore};

/// User input for a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub amount: f64,
    pub date: NaiveDate,
    pub note: String,
    pub category_id: Option<Uuid>,
    pub recurrence: Option<RecurrenceRule>,
}

impl TransactionDraft {
    pub fn new(amount: f64, date: NaiveDate) -> Self {
        Self {
            amount,
            date,
            note: String::new(),
            category_id: None,
            recurrence: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }
}

/// Field changes for an existing transaction. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionEdit {
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
    /// `Some(None)` clears the category.
    pub category_id: Option<Option<Uuid>>,
    pub recurrence: Option<RecurrenceRule>,
}

/// Which instances of a series an edit applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditScope {
    #[default]
    ThisOnly,
    ThisAndFuture,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTransaction {
    pub anchor: Uuid,
    pub followers: Vec<Uuid>,
}

impl CreatedTransaction {
    pub fn len(&self) -> usize {
        1 + self.followers.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    /// The edited instance as stored.
    pub transaction: Transaction,
    /// Present when the series tail was rebuilt.
    pub regenerated: Option<TailRegeneration>,
}

pub struct TransactionService;

impl TransactionService {
    /// Stores a new transaction. A recurring draft becomes the anchor of a
    /// new series and its followers are stored right after it.
    pub fn create<S: TransactionStore>(
        store: &mut S,
        draft: TransactionDraft,
        config: &Config,
    ) -> ServiceResult<CreatedTransaction> {
        let amount = Self::checked_amount(store, draft.category_id, draft.amount, config)?;
        let mut base = Transaction::new(amount, draft.date)
            .with_note(draft.note)
            .with_category(draft.category_id);

        let Some(rule) = draft.recurrence else {
            let anchor = store.insert(base)?;
            debug!(transaction = %anchor, "created single transaction");
            return Ok(CreatedTransaction {
                anchor,
                followers: Vec::new(),
            });
        };

        base.series_id = Some(base.id);
        base.set_recurrence(Some(rule.clone()));
        let followers: Vec<Transaction> = RecurrenceEngine::materialize(&base, &rule).collect();

        let anchor = base.id;
        let mut batch = Vec::with_capacity(followers.len() + 1);
        batch.push(base);
        batch.extend(followers);
        let follower_ids: Vec<Uuid> = store.insert_batch(batch)?.into_iter().skip(1).collect();

        info!(
            series = %anchor,
            frequency = rule.frequency.label(),
            interval = rule.interval(),
            followers = follower_ids.len(),
            "created recurring series"
        );
        Ok(CreatedTransaction {
            anchor,
            followers: follower_ids,
        })
    }

    /// Applies `changes` to the transaction `id`.
    ///
    /// With [`EditScope::ThisAndFuture`] on a recurring instance (or a plain
    /// one given a rule) every later instance of the series is replaced by
    /// followers regenerated from the edited one.
    pub fn edit<S: TransactionStore>(
        store: &mut S,
        id: Uuid,
        changes: TransactionEdit,
        scope: EditScope,
        config: &Config,
    ) -> ServiceResult<EditOutcome> {
        let mut txn = store.transaction(id)?;
        let category_id = changes.category_id.unwrap_or(txn.category_id);
        let amount = changes.amount.unwrap_or(txn.amount);
        txn.amount = Self::checked_amount(store, category_id, amount, config)?;
        txn.category_id = category_id;
        if let Some(date) = changes.date {
            txn.date = date;
        }
        if let Some(note) = changes.note {
            txn.note = note;
        }

        let rule = match scope {
            EditScope::ThisOnly => {
                if let Some(rule) = changes.recurrence {
                    if !txn.is_recurring {
                        return Err(ServiceError::Invalid(
                            "Start a series with the this-and-future scope".into(),
                        ));
                    }
                    txn.set_recurrence(Some(rule));
                }
                None
            }
            EditScope::ThisAndFuture => changes.recurrence.or_else(|| txn.recurrence.clone()),
        };

        let Some(rule) = rule else {
            store.update(txn.clone())?;
            debug!(transaction = %id, "updated single instance");
            return Ok(EditOutcome {
                transaction: txn,
                regenerated: None,
            });
        };

        let series = match txn.series_id {
            Some(series_id) => store.query(&TransactionQuery::series(series_id))?,
            None => Vec::new(),
        };
        let plan = RecurrenceEngine::regenerate_future_tail(&txn, &series, &rule);
        store.apply_regeneration(&plan)?;
        Ok(EditOutcome {
            transaction: plan.edited.clone(),
            regenerated: Some(plan),
        })
    }

    pub fn delete<S: TransactionStore>(store: &mut S, id: Uuid) -> ServiceResult<Transaction> {
        let removed = store.delete(id)?;
        info!(transaction = %id, "deleted transaction");
        Ok(removed)
    }

    /// Stores a copy of `id` under a fresh identifier. Series metadata is
    /// copied as well.
    pub fn duplicate<S: TransactionStore>(store: &mut S, id: Uuid) -> ServiceResult<Transaction> {
        let mut copy = store.transaction(id)?;
        copy.id = Uuid::new_v4();
        store.insert(copy.clone())?;
        Ok(copy)
    }

    pub fn list<S: TransactionStore>(
        store: &S,
        query: &TransactionQuery,
    ) -> ServiceResult<Vec<Transaction>> {
        Ok(store.query(query)?)
    }

    fn checked_amount<S: TransactionStore>(
        store: &S,
        category_id: Option<Uuid>,
        amount: f64,
        config: &Config,
    ) -> ServiceResult<f64> {
        if !amount.is_finite() {
            return Err(ServiceError::Invalid("Amount must be a finite number".into()));
        }
        CategoryService::normalize_amount(store, category_id, amount, config)
    }
}
