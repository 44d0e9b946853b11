use std::fmt;

use serde::{Deserialize, Serialize};

use super::money::Money;

/// Account identifier, assigned sequentially from 1 by the ledger
pub type AccountId = u64;

/// Payment identifier (UUID v4 string)
pub type PaymentId = String;

/// Lifecycle state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "INPROGRESS")]
    InProgress,
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "FAIL")]
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "INPROGRESS",
            Self::Ok => "OK",
            Self::Failed => "FAIL",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single payment recorded by the ledger
///
/// Payments are never deleted. The only mutation after creation is a
/// status flip to [`PaymentStatus::Failed`] when the payment is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub account_id: AccountId,
    pub amount: Money,
    pub category: String,
    pub status: PaymentStatus,
}

impl Payment {
    /// Create a new in-progress payment
    pub fn new(
        id: impl Into<PaymentId>,
        account_id: AccountId,
        amount: Money,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id,
            amount,
            category: category.into(),
            status: PaymentStatus::InProgress,
        }
    }
}
