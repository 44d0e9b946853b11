use serde::Serialize;

use super::money::Money;
use super::payment::AccountId;

/// Ledger account with private fields; balance changes go through `operations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: AccountId,
    phone: String,
    balance: Money,
}

impl Account {
    /// Create a new account with zero balance
    pub fn new(id: AccountId, phone: impl Into<String>) -> Self {
        Self {
            id,
            phone: phone.into(),
            balance: Money::zero(),
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub(crate) fn set_balance(&mut self, balance: Money) {
        self.balance = balance;
    }
}
