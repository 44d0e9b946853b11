pub mod account;
pub mod error;
pub mod favorite;
pub mod money;
pub mod operations;
pub mod payment;

// Re-export commonly used types
pub use account::Account;
pub use error::DomainError;
pub use favorite::Favorite;
pub use money::Money;
pub use operations::{apply_charge, apply_deposit, apply_refund};
pub use payment::{AccountId, Payment, PaymentId, PaymentStatus};
