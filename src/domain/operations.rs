use super::account::Account;
use super::error::DomainError;
use super::money::Money;

/// Credit a deposit to an account
pub fn apply_deposit(account: &mut Account, amount: Money) -> Result<(), DomainError> {
    if !amount.is_positive() {
        return Err(DomainError::InvalidAmount);
    }

    let new_balance = account
        .balance()
        .checked_add(amount)
        .ok_or(DomainError::Overflow)?;

    account.set_balance(new_balance);
    Ok(())
}

/// Debit a payment from an account
pub fn apply_charge(account: &mut Account, amount: Money) -> Result<(), DomainError> {
    if !amount.is_positive() {
        return Err(DomainError::InvalidAmount);
    }

    if account.balance() < amount {
        return Err(DomainError::InsufficientFunds);
    }

    let new_balance = account
        .balance()
        .checked_sub(amount)
        .ok_or(DomainError::Overflow)?;

    account.set_balance(new_balance);
    Ok(())
}

/// Return the amount of a rejected payment to its account
pub fn apply_refund(account: &mut Account, amount: Money) -> Result<(), DomainError> {
    let new_balance = account
        .balance()
        .checked_add(amount)
        .ok_or(DomainError::Overflow)?;

    account.set_balance(new_balance);
    Ok(())
}
