pub mod error;
pub mod ledger;
pub mod traits;

// Re-export commonly used types
pub use error::StorageError;
pub use ledger::InMemoryLedger;
pub use traits::{LedgerStore, PaymentSnapshot};
