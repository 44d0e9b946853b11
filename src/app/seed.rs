use tracing::info;

use crate::domain::Money;
use crate::storage::{InMemoryLedger, StorageError};

/// Build a ledger with `accounts` funded accounts and `payments` payments
///
/// Payment `i` (1-based) has amount `i` and belongs to account
/// `(i - 1) % accounts + 1`. Every account is funded with enough to cover all
/// of them. Zero accounts is treated as one.
pub fn seed_ledger(accounts: usize, payments: usize) -> Result<InMemoryLedger, StorageError> {
    let ledger = InMemoryLedger::new();
    let accounts = accounts.max(1);
    let count = payments as i64;
    let funding = Money::from_minor(count.saturating_mul(count.saturating_add(1)) / 2);

    let ids = (0..accounts)
        .map(|i| {
            let account = ledger.register_account(&format!("+992{i:09}"))?;
            if funding.is_positive() {
                ledger.deposit(account.id(), funding)?;
            }
            Ok::<_, StorageError>(account.id())
        })
        .collect::<Result<Vec<_>, StorageError>>()?;

    for i in 0..payments {
        ledger.pay(ids[i % accounts], Money::from_minor(i as i64 + 1), "seed")?;
    }

    info!(accounts, payments, "Seeded ledger");
    Ok(ledger)
}
