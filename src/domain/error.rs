use thiserror::Error;

/// Domain-level errors representing business rule violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Account does not have enough balance")]
    InsufficientFunds,

    #[error("Arithmetic overflow")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            DomainError::InvalidAmount.to_string(),
            "Amount must be greater than zero"
        );
        assert_eq!(
            DomainError::InsufficientFunds.to_string(),
            "Account does not have enough balance"
        );
        assert_eq!(DomainError::Overflow.to_string(), "Arithmetic overflow");
    }

    #[test]
    fn error_comparison_works() {
        assert_eq!(DomainError::InvalidAmount, DomainError::InvalidAmount);
        assert_ne!(DomainError::InvalidAmount, DomainError::InsufficientFunds);
    }
}
