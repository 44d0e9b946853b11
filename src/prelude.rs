//! Prelude module for convenient imports
//!
//! Import everything you need with: `use ledger_agg::prelude::*;`

// Domain types
pub use crate::domain::{Account, AccountId, DomainError, Favorite, Money, Payment, PaymentStatus};

// Storage types
pub use crate::storage::{InMemoryLedger, LedgerStore, PaymentSnapshot, StorageError};

// Engine types
pub use crate::engine::{
    AggregationEngine, EngineError, Partition, ProgressRecord, ProgressStream, partition,
};

// IO types
pub use crate::io::{IoError, write_payments, write_progress, write_total};

// App types
pub use crate::app::{AppError, CliApp, CliArgs, Command, DEFAULT_PROGRESS_UNIT, seed_ledger};
pub use crate::telemetry::setup_logging;
