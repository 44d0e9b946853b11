#![allow(dead_code)]

use std::sync::Arc;

use ledger_agg::prelude::*;
use tokio::runtime::{Builder, Runtime};

/// Ledger sizes exercised by every benchmark group
pub const LEDGER_SIZES: [usize; 3] = [10_000, 100_000, 1_000_000];

/// Build a shared ledger with `payments` payments spread over 8 accounts
pub fn shared_ledger(payments: usize) -> Arc<InMemoryLedger> {
    Arc::new(seed_ledger(8, payments).expect("Failed to seed ledger"))
}

/// Multi-threaded runtime with a fixed number of worker threads
pub fn runtime(worker_threads: usize) -> Runtime {
    Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}
