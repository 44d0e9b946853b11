use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::{DashMap, Entry};
use parking_lot::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::StorageError;
use super::traits::{LedgerStore, PaymentSnapshot};
use crate::domain::{
    Account, AccountId, DomainError, Favorite, Money, Payment, PaymentStatus, apply_charge,
    apply_deposit, apply_refund,
};

/// In-memory ledger of accounts, payments and favorites
///
/// Accounts and favorites live in `DashMap`s. Payments are kept behind a
/// copy-on-write `Arc<Vec<_>>`: readers take an O(1) snapshot, and a writer
/// only clones the vector when a snapshot is still outstanding.
pub struct InMemoryLedger {
    next_account_id: AtomicU64,
    accounts: DashMap<AccountId, Account>,
    phones: DashMap<String, AccountId>,
    payments: RwLock<Arc<Vec<Payment>>>,
    favorites: DashMap<String, Favorite>,
}

impl InMemoryLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self {
            next_account_id: AtomicU64::new(1),
            accounts: DashMap::new(),
            phones: DashMap::new(),
            payments: RwLock::new(Arc::new(Vec::new())),
            favorites: DashMap::new(),
        }
    }

    /// Register a new account; phone numbers are unique
    pub fn register_account(&self, phone: &str) -> Result<Account, StorageError> {
        match self.phones.entry(phone.to_string()) {
            Entry::Occupied(_) => Err(StorageError::PhoneRegistered(phone.to_string())),
            Entry::Vacant(e) => {
                let id = self.next_account_id.fetch_add(1, Ordering::Relaxed);
                let account = Account::new(id, phone);
                self.accounts.insert(id, account.clone());
                e.insert(id);
                debug!(account_id = id, "Registered account");
                Ok(account)
            }
        }
    }

    /// Credit an account
    pub fn deposit(&self, account_id: AccountId, amount: Money) -> Result<(), StorageError> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount.into());
        }

        let mut account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(StorageError::AccountNotFound(account_id))?;
        apply_deposit(&mut account, amount)?;

        debug!(account_id, amount = amount.minor(), "Deposited");
        Ok(())
    }

    /// Debit an account and append a new in-progress payment
    pub fn pay(
        &self,
        account_id: AccountId,
        amount: Money,
        category: &str,
    ) -> Result<Payment, StorageError> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidAmount.into());
        }

        {
            let mut account = self
                .accounts
                .get_mut(&account_id)
                .ok_or(StorageError::AccountNotFound(account_id))?;
            apply_charge(&mut account, amount)?;
        }

        let payment = Payment::new(Uuid::new_v4().to_string(), account_id, amount, category);
        Arc::make_mut(&mut self.payments.write()).push(payment.clone());

        debug!(account_id, payment_id = %payment.id, amount = amount.minor(), "Payment recorded");
        Ok(payment)
    }

    /// Look up a payment by ID (returns clone, not reference)
    pub fn find_payment(&self, payment_id: &str) -> Result<Payment, StorageError> {
        self.payments
            .read()
            .iter()
            .find(|p| p.id == payment_id)
            .cloned()
            .ok_or_else(|| StorageError::PaymentNotFound(payment_id.to_string()))
    }

    /// Mark a payment as failed and refund its amount
    ///
    /// Rejecting an already failed payment is a no-op, so a payment is
    /// refunded at most once.
    pub fn reject(&self, payment_id: &str) -> Result<(), StorageError> {
        let mut guard = self.payments.write();

        let index = guard
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or_else(|| StorageError::PaymentNotFound(payment_id.to_string()))?;

        let (account_id, amount, status) = {
            let payment = &guard[index];
            (payment.account_id, payment.amount, payment.status)
        };

        if status == PaymentStatus::Failed {
            warn!(payment_id, "Payment already rejected");
            return Ok(());
        }

        let mut account = self
            .accounts
            .get_mut(&account_id)
            .ok_or(StorageError::AccountNotFound(account_id))?;
        apply_refund(&mut account, amount)?;

        Arc::make_mut(&mut guard)[index].status = PaymentStatus::Failed;

        debug!(account_id, payment_id, "Payment rejected");
        Ok(())
    }

    /// Execute a new payment with the same account, amount and category
    pub fn repeat(&self, payment_id: &str) -> Result<Payment, StorageError> {
        let original = self.find_payment(payment_id)?;
        self.pay(original.account_id, original.amount, &original.category)
    }

    /// Save an existing payment as a named favorite
    pub fn favorite_payment(&self, payment_id: &str, name: &str) -> Result<Favorite, StorageError> {
        let payment = self.find_payment(payment_id)?;
        let favorite = Favorite::from_payment(Uuid::new_v4().to_string(), name, &payment);
        self.favorites.insert(favorite.id.clone(), favorite.clone());

        debug!(payment_id, favorite_id = %favorite.id, "Favorite saved");
        Ok(favorite)
    }

    /// Look up a favorite by ID (returns clone, not reference)
    pub fn find_favorite(&self, favorite_id: &str) -> Result<Favorite, StorageError> {
        self.favorites
            .get(favorite_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| StorageError::FavoriteNotFound(favorite_id.to_string()))
    }

    /// Execute a payment from a saved favorite
    pub fn pay_from_favorite(&self, favorite_id: &str) -> Result<Payment, StorageError> {
        let favorite = self.find_favorite(favorite_id)?;
        self.pay(favorite.account_id, favorite.amount, &favorite.category)
    }

    /// Sequential history of one account's payments, in ledger order
    pub fn account_payments(&self, account_id: AccountId) -> Result<Vec<Payment>, StorageError> {
        self.find_account(account_id)?;

        Ok(self
            .payments
            .read()
            .iter()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect())
    }

    /// Number of payments currently recorded
    pub fn payment_count(&self) -> usize {
        self.payments.read().len()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedger {
    fn read_all_payments(&self) -> PaymentSnapshot {
        Arc::clone(&self.payments.read())
    }

    fn find_account(&self, account_id: AccountId) -> Result<Account, StorageError> {
        self.accounts
            .get(&account_id)
            .map(|r| r.value().clone())
            .ok_or(StorageError::AccountNotFound(account_id))
    }
}
