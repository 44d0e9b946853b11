use std::sync::Arc;

use super::error::StorageError;
use crate::domain::{Account, AccountId, Payment};

/// Immutable view of the payment sequence, stable for as long as it is held
pub type PaymentSnapshot = Arc<Vec<Payment>>;

/// Read side of a ledger consumed by the aggregation engine
///
/// Implementations must hand out snapshots whose length and content cannot
/// change while the snapshot is alive, regardless of concurrent writers.
pub trait LedgerStore: Send + Sync {
    /// Ordered snapshot of every payment in the ledger
    fn read_all_payments(&self) -> PaymentSnapshot;

    /// Look up an account by ID (returns clone, not reference)
    fn find_account(&self, account_id: AccountId) -> Result<Account, StorageError>;
}

impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn read_all_payments(&self) -> PaymentSnapshot {
        (**self).read_all_payments()
    }

    fn find_account(&self, account_id: AccountId) -> Result<Account, StorageError> {
        (**self).find_account(account_id)
    }
}
