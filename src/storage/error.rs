use thiserror::Error;

use crate::domain::{AccountId, DomainError};

/// Storage-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Phone already registered: {0}")]
    PhoneRegistered(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Favorite not found: {0}")]
    FavoriteNotFound(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}
