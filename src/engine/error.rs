use thiserror::Error;

use crate::domain::AccountId;
use crate::storage::StorageError;

/// Errors surfaced by the aggregation engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Predicate failed in partition {partition}: {message}")]
    PredicateFailure { partition: usize, message: String },

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::AccountNotFound(id) => Self::AccountNotFound(id),
            other => Self::Storage(other),
        }
    }
}
