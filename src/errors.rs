use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Error type that captures common ledger, storage, and configuration failures.
#[derive(Debug, Error)]
pub enum SpenderError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("Duplicate identifier: {0}")]
    DuplicateId(Uuid),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, SpenderError>;

impl From<std::io::Error> for SpenderError {
    fn from(err: std::io::Error) -> Self {
        SpenderError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for SpenderError {
    fn from(err: serde_json::Error) -> Self {
        SpenderError::StorageError(err.to_string())
    }
}
