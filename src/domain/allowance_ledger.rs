//! Per-account native-value credit.
//!
//! Entries are created implicitly on first credit and never removed; a
//! balance may return to zero.

use std::collections::HashMap;

use super::Address;
use crate::error::LedgerError;

/// Credit balances denominated in native value units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowanceLedger {
    balances: HashMap<Address, u128>,
}

impl AllowanceLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `account`, zero if it was never credited.
    #[must_use]
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Adds `amount` to the balance of `account` and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAmount`] for a zero credit and
    /// [`LedgerError::ArithmeticOverflow`] if the balance would overflow.
    pub fn credit(&mut self, account: &Address, amount: u128) -> Result<u128, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let next = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        self.balances.insert(account.clone(), next);
        Ok(next)
    }

    /// Subtracts `amount` from the balance of `account` and returns the new
    /// balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientAllowance`] if `amount` exceeds
    /// the current balance.
    pub fn debit(&mut self, account: &Address, amount: u128) -> Result<u128, LedgerError> {
        let available = self.balance_of(account);
        let next = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                requested: amount,
                available,
            })?;
        if let Some(balance) = self.balances.get_mut(account) {
            *balance = next;
        }
        Ok(next)
    }

    /// Raw entry for `account`, distinguishing "never credited" from zero.
    pub(crate) fn entry(&self, account: &Address) -> Option<u128> {
        self.balances.get(account).copied()
    }

    /// Puts an entry back to a previously observed state. Used only by
    /// transaction rollback.
    pub(crate) fn restore(&mut self, account: Address, entry: Option<u128>) {
        match entry {
            Some(balance) => {
                self.balances.insert(account, balance);
            }
            None => {
                self.balances.remove(&account);
            }
        }
    }
}
