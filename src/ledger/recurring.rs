//! Recurrence engine: occurrence arithmetic, series materialization, and
//! regeneration of a series tail after an edit.
//!
//! Everything here is a pure function of its inputs. Persistence of the
//! produced instances is left to the caller.

use std::collections::{BTreeSet, HashSet};
use std::iter::FusedIterator;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use super::recurrence::{Frequency, RecurrenceRule};
use super::transaction::Transaction;

/// Hard ceiling on followers produced from a single request.
pub const MAX_GENERATED_OCCURRENCES: usize = 120;

const HORIZON_WEEKS: u32 = 52;
const HORIZON_MONTHS: u32 = 12;
const HORIZON_YEARS: u32 = 3;

/// Stateless entry point for recurrence calculations.
pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Advances `from` by one step of `rule` using calendar arithmetic.
    ///
    /// Returns `from` unchanged when the result cannot be represented; callers
    /// treat an unchanged date as "no further progress".
    pub fn next_occurrence(from: NaiveDate, rule: &RecurrenceRule) -> NaiveDate {
        match rule.frequency.checked_add(from, rule.interval()) {
            Some(next) => next,
            None => {
                warn!(
                    %from,
                    frequency = ?rule.frequency,
                    interval = rule.interval(),
                    "recurrence step out of calendar range; halting"
                );
                from
            }
        }
    }

    /// Default stop date when a rule has no explicit end.
    pub fn horizon_cap(start: NaiveDate, frequency: Frequency) -> NaiveDate {
        let units = match frequency {
            Frequency::Weekly => HORIZON_WEEKS,
            Frequency::Monthly => HORIZON_MONTHS,
            Frequency::Yearly => HORIZON_YEARS,
        };
        frequency.checked_add(start, units).unwrap_or(start)
    }

    /// Effective stop date for a series starting at `start`.
    pub fn stop_date(start: NaiveDate, rule: &RecurrenceRule) -> NaiveDate {
        rule.end_date
            .unwrap_or_else(|| Self::horizon_cap(start, rule.frequency))
    }

    /// Lazily produces the followers of `base` under `rule`.
    pub fn materialize<'a>(base: &'a Transaction, rule: &'a RecurrenceRule) -> Materialize<'a> {
        Materialize::new(base, rule)
    }

    /// Plans the delete-and-regenerate of a series from `edited` onward.
    ///
    /// `series` may contain unrelated transactions; only those sharing the
    /// edited instance's series id are considered. Instances dated before
    /// `edited.date` are never touched.
    pub fn regenerate_future_tail(
        edited: &Transaction,
        series: &[Transaction],
        new_rule: &RecurrenceRule,
    ) -> TailRegeneration {
        let mut anchor = edited.clone();
        if anchor.series_id.is_none() {
            debug!(transaction = %anchor.id, "assigning series to newly recurring transaction");
        }
        let series_id = anchor.recurrence_series();
        anchor.series_id = Some(series_id);
        anchor.set_recurrence(Some(new_rule.clone()));

        let to_delete: BTreeSet<Uuid> = series
            .iter()
            .filter(|txn| txn.series_id == Some(series_id))
            .filter(|txn| txn.id != anchor.id && txn.date >= anchor.date)
            .map(|txn| txn.id)
            .collect();

        // Instances that survive the edit keep their ids, even when a date
        // move left one holding the id a new follower would derive.
        let mut taken: HashSet<Uuid> = series
            .iter()
            .map(|txn| txn.id)
            .filter(|id| !to_delete.contains(id))
            .collect();
        taken.insert(anchor.id);
        let to_create: Vec<Transaction> = Self::materialize(&anchor, new_rule)
            .map(|mut follower| {
                if taken.contains(&follower.id) {
                    follower.id = Self::free_occurrence_id(anchor.id, follower.date, &taken);
                    debug!(%series_id, date = %follower.date, "re-derived clashing follower id");
                }
                taken.insert(follower.id);
                follower
            })
            .collect();

        debug!(
            %series_id,
            from = %anchor.date,
            deleted = to_delete.len(),
            created = to_create.len(),
            "planned series tail regeneration"
        );

        TailRegeneration {
            series_id,
            edited: anchor,
            to_delete,
            to_create,
        }
    }

    /// Stable identifier for the follower dated `date` generated from the
    /// instance `namespace`.
    pub fn occurrence_id(namespace: Uuid, date: NaiveDate) -> Uuid {
        Uuid::new_v5(&namespace, date.to_string().as_bytes())
    }

    /// First id of the salted sequence `<date>#1`, `<date>#2`, ... not in
    /// `taken`. Same inputs always give the same id.
    fn free_occurrence_id(namespace: Uuid, date: NaiveDate, taken: &HashSet<Uuid>) -> Uuid {
        (1u32..)
            .map(|attempt| Uuid::new_v5(&namespace, format!("{date}#{attempt}").as_bytes()))
            .find(|id| !taken.contains(id))
            .unwrap_or_else(Uuid::new_v4)
    }
}

/// Result of [`RecurrenceEngine::regenerate_future_tail`].
///
/// The caller updates `edited` in place, deletes `to_delete`, then inserts
/// `to_create`, all as one logical write.
#[derive(Debug, Clone, PartialEq)]
pub struct TailRegeneration {
    pub series_id: Uuid,
    pub edited: Transaction,
    pub to_delete: BTreeSet<Uuid>,
    pub to_create: Vec<Transaction>,
}

/// Iterator over the followers of a base transaction.
///
/// Finite and fused: it ends after the stop date, after
/// [`MAX_GENERATED_OCCURRENCES`] items, or when the calendar cannot advance.
#[derive(Debug, Clone)]
pub struct Materialize<'a> {
    base: &'a Transaction,
    rule: &'a RecurrenceRule,
    namespace: Uuid,
    current: NaiveDate,
    stop: NaiveDate,
    produced: usize,
    finished: bool,
}

impl<'a> Materialize<'a> {
    fn new(base: &'a Transaction, rule: &'a RecurrenceRule) -> Self {
        Self {
            base,
            rule,
            namespace: base.id,
            current: base.date,
            stop: RecurrenceEngine::stop_date(base.date, rule),
            produced: 0,
            finished: false,
        }
    }

    /// Date after which no follower is produced.
    pub fn stop_date(&self) -> NaiveDate {
        self.stop
    }
}

impl Iterator for Materialize<'_> {
    type Item = Transaction;

    fn next(&mut self) -> Option<Transaction> {
        if self.finished || self.produced >= MAX_GENERATED_OCCURRENCES {
            self.finished = true;
            return None;
        }
        let next = RecurrenceEngine::next_occurrence(self.current, self.rule);
        if next <= self.current || next > self.stop {
            self.finished = true;
            return None;
        }
        self.current = next;
        self.produced += 1;

        let mut follower = self.base.clone();
        follower.id = RecurrenceEngine::occurrence_id(self.namespace, next);
        follower.date = next;
        follower.set_recurrence(Some(self.rule.clone()));
        Some(follower)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            (0, Some(MAX_GENERATED_OCCURRENCES - self.produced))
        }
    }
}

impl FusedIterator for Materialize<'_> {}
