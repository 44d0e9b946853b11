use serde::Serialize;

use super::money::Money;
use super::payment::{AccountId, Payment};

/// A saved payment template that can be replayed with `pay_from_favorite`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub id: String,
    pub account_id: AccountId,
    pub name: String,
    pub amount: Money,
    pub category: String,
}

impl Favorite {
    /// Capture the account, amount and category of an existing payment
    pub fn from_payment(id: impl Into<String>, name: impl Into<String>, payment: &Payment) -> Self {
        Self {
            id: id.into(),
            account_id: payment.account_id,
            name: name.into(),
            amount: payment.amount,
            category: payment.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_payment_template() {
        let payment = Payment::new("p-9", 4, Money::from_minor(1_500), "phone");
        let favorite = Favorite::from_payment("f-1", "mobile top-up", &payment);

        assert_eq!(favorite.id, "f-1");
        assert_eq!(favorite.account_id, 4);
        assert_eq!(favorite.name, "mobile top-up");
        assert_eq!(favorite.amount, Money::from_minor(1_500));
        assert_eq!(favorite.category, "phone");
    }
}
