use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::ledger::{DateWindow, Transaction};
use crate::storage::{TransactionQuery, TransactionStore};

use super::ServiceResult;

/// Restricts a summary to some categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Uuid),
    AnyOf(HashSet<Uuid>),
}

impl CategoryFilter {
    fn apply(&self, query: TransactionQuery) -> TransactionQuery {
        match self {
            CategoryFilter::All => query,
            CategoryFilter::Only(id) => query.in_categories([*id]),
            CategoryFilter::AnyOf(ids) => query.in_categories(ids.iter().copied()),
        }
    }
}

/// Transactions of one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySection {
    pub date: NaiveDate,
    pub transactions: Vec<Transaction>,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub window: DateWindow,
    /// Newest first.
    pub transactions: Vec<Transaction>,
    pub net: f64,
    /// Spending as a positive number.
    pub expenses: f64,
    pub income: f64,
    /// Overall budget for the month, zero when none is set.
    pub budget: f64,
    pub remaining: f64,
    /// Share of the budget spent, within `[0, 1]`.
    pub progress: f64,
    /// Newest day first.
    pub days: Vec<DaySection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    /// `None` collects uncategorized spending.
    pub category_id: Option<Uuid>,
    pub name: String,
    pub spent: f64,
    pub budget: Option<f64>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn month_summary<S: TransactionStore>(
        store: &S,
        month: NaiveDate,
        filter: &CategoryFilter,
    ) -> ServiceResult<MonthSummary> {
        let window = DateWindow::month_of(month);
        let mut transactions = store.query(&filter.apply(TransactionQuery::window(window)))?;
        transactions.reverse();

        let income: f64 = transactions
            .iter()
            .filter(|txn| txn.is_income())
            .map(|txn| txn.amount)
            .sum();
        let expenses: f64 = transactions
            .iter()
            .filter(|txn| txn.is_expense())
            .map(|txn| -txn.amount)
            .sum();
        let budget = store
            .budget_for(window.start, None)
            .map(|b| b.amount)
            .unwrap_or(0.0);
        let progress = if budget > 0.0 {
            (expenses / budget).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(MonthSummary {
            window,
            net: income - expenses,
            expenses,
            income,
            budget,
            remaining: (budget - expenses).max(0.0),
            progress,
            days: group_by_day(&transactions),
            transactions,
        })
    }

    /// Spending per category for the month, largest first.
    pub fn category_spending<S: TransactionStore>(
        store: &S,
        month: NaiveDate,
    ) -> ServiceResult<Vec<CategorySpending>> {
        let window = DateWindow::month_of(month);
        let mut totals: BTreeMap<Option<Uuid>, f64> = BTreeMap::new();
        for txn in store
            .query(&TransactionQuery::window(window))?
            .iter()
            .filter(|txn| txn.is_expense())
        {
            *totals.entry(txn.category_id).or_default() -= txn.amount;
        }

        let mut rows: Vec<CategorySpending> = totals
            .into_iter()
            .map(|(category_id, spent)| {
                let name = category_id
                    .and_then(|id| store.category(id))
                    .map(|c| c.name)
                    .unwrap_or_else(|| "Uncategorized".to_string());
                let budget = category_id
                    .and_then(|id| store.budget_for(window.start, Some(id)))
                    .map(|b| b.amount);
                CategorySpending {
                    category_id,
                    name,
                    spent,
                    budget,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.spent.total_cmp(&a.spent).then_with(|| a.name.cmp(&b.name)));
        Ok(rows)
    }
}

fn group_by_day(newest_first: &[Transaction]) -> Vec<DaySection> {
    let mut days: Vec<DaySection> = Vec::new();
    for txn in newest_first {
        match days.last_mut() {
            Some(section) if section.date == txn.date => {
                section.net += txn.amount;
                section.transactions.push(txn.clone());
            }
            _ => days.push(DaySection {
                date: txn.date,
                transactions: vec![txn.clone()],
                net: txn.amount,
            }),
        }
    }
    days
}
