pub mod budget_service;
pub mod category_service;
pub mod summary_service;
pub mod transaction_service;

pub use budget_service::BudgetService;
pub use category_service::CategoryService;
pub use summary_service::{CategoryFilter, CategorySpending, DaySection, MonthSummary, SummaryService};
pub use transaction_service::{
    CreatedTransaction, EditOutcome, EditScope, TransactionDraft, TransactionEdit,
    TransactionService,
};

use crate::errors::SpenderError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] SpenderError),
    #[error("{0}")]
    Invalid(String),
}
