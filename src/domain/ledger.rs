//! Ledger state context and all-or-nothing transactions over it.
//!
//! [`Ledger`] bundles the two keyed tables (pools by name, allowances by
//! account). It is passed explicitly into every trade engine operation.
//!
//! `LedgerTransaction` (crate-internal) stages mutations against a borrowed
//! ledger and journals the prior value of everything it touches. Unless
//! `commit` is called, dropping the transaction replays the journal in
//! reverse and the ledger is left exactly as it was.

use super::pool_registry::SizeDelta;
use super::{Address, AllowanceLedger, Pool, PoolRegistry};
use crate::error::LedgerError;

/// In-memory ledger state: `pools: name -> Pool`, `allowances: account -> u128`.
///
/// Outside this crate the ledger is read-only; every mutation goes through
/// [`crate::service::TradeEngine`]. Neither the transaction type nor the
/// size delta is reachable:
///
/// ```compile_fail
/// use poola_gateway::domain::LedgerTransaction;
/// ```
///
/// ```compile_fail
/// use poola_gateway::domain::ledger::LedgerTransaction;
/// ```
///
/// ```compile_fail
/// use poola_gateway::domain::pool_registry::SizeDelta;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    pools: PoolRegistry,
    allowances: AllowanceLedger,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the pool table.
    #[must_use]
    pub fn pools(&self) -> &PoolRegistry {
        &self.pools
    }

    /// Read access to the allowance table.
    #[must_use]
    pub fn allowances(&self) -> &AllowanceLedger {
        &self.allowances
    }

    /// Mutable access to the pool table, for operations with no external
    /// effect (pool creation).
    pub(crate) fn pools_mut(&mut self) -> &mut PoolRegistry {
        &mut self.pools
    }
}

#[derive(Debug)]
enum Undo {
    Pool(Pool),
    Allowance(Address, Option<u128>),
}

/// Journaled mutation scope over a [`Ledger`].
///
/// Crate-internal: only the trade engine opens one, after its guards pass.
#[derive(Debug)]
pub(crate) struct LedgerTransaction<'a> {
    ledger: &'a mut Ledger,
    journal: Vec<Undo>,
    committed: bool,
}

impl<'a> LedgerTransaction<'a> {
    /// Opens a transaction on `ledger`.
    pub(crate) fn begin(ledger: &'a mut Ledger) -> Self {
        Self {
            ledger,
            journal: Vec::new(),
            committed: false,
        }
    }

    /// Credits `account` inside the transaction.
    ///
    /// # Errors
    ///
    /// See [`AllowanceLedger::credit`].
    pub(crate) fn credit(&mut self, account: &Address, amount: u128) -> Result<u128, LedgerError> {
        let prior = self.ledger.allowances.entry(account);
        let balance = self.ledger.allowances.credit(account, amount)?;
        self.journal.push(Undo::Allowance(account.clone(), prior));
        Ok(balance)
    }

    /// Debits `account` inside the transaction.
    ///
    /// # Errors
    ///
    /// See [`AllowanceLedger::debit`].
    pub(crate) fn debit(&mut self, account: &Address, amount: u128) -> Result<u128, LedgerError> {
        let prior = self.ledger.allowances.entry(account);
        let balance = self.ledger.allowances.debit(account, amount)?;
        self.journal.push(Undo::Allowance(account.clone(), prior));
        Ok(balance)
    }

    /// Adjusts a pool's size inside the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PoolNotFound`], [`LedgerError::ExceedsPoolSize`]
    /// or [`LedgerError::ArithmeticOverflow`].
    pub(crate) fn adjust_size(&mut self, pool: &str, delta: SizeDelta) -> Result<u128, LedgerError> {
        self.snapshot_pool(pool)?;
        self.ledger.pools.adjust_size(pool, delta)
    }

    /// Records a completed sale on a pool inside the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PoolNotFound`] if the pool is absent.
    pub(crate) fn record_sale(&mut self, pool: &str, amount: u128) -> Result<(), LedgerError> {
        self.snapshot_pool(pool)?;
        self.ledger.pools.record_sale(pool, amount)
    }

    /// Makes every staged mutation permanent.
    pub(crate) fn commit(mut self) {
        self.committed = true;
        self.journal.clear();
    }

    fn snapshot_pool(&mut self, name: &str) -> Result<(), LedgerError> {
        let pool = self
            .ledger
            .pools
            .get(name)
            .cloned()
            .ok_or_else(|| LedgerError::PoolNotFound(name.to_string()))?;
        self.journal.push(Undo::Pool(pool));
        Ok(())
    }
}

impl Drop for LedgerTransaction<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        while let Some(undo) = self.journal.pop() {
            match undo {
                Undo::Pool(pool) => self.ledger.pools.restore(pool),
                Undo::Allowance(account, entry) => self.ledger.allowances.restore(account, entry),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::PoolName;

    fn addr(s: &str) -> Address {
        let Ok(a) = Address::parse(s) else {
            panic!("valid address");
        };
        a
    }

    fn ledger_with_pool() -> Ledger {
        let mut ledger = Ledger::new();
        let Ok(name) = PoolName::new("p") else {
            panic!("valid name");
        };
        let created = ledger
            .pools_mut()
            .create(name, addr("0xt"), addr("0xa"), 100);
        assert!(created.is_ok());
        ledger
    }

    #[test]
    fn commit_keeps_mutations() {
        let mut ledger = ledger_with_pool();
        let mut tx = LedgerTransaction::begin(&mut ledger);
        assert_eq!(tx.adjust_size("p", SizeDelta::Increase(1000)), Ok(1000));
        assert_eq!(tx.credit(&addr("0xa"), 10), Ok(10));
        tx.commit();

        assert_eq!(ledger.pools().get("p").map(|p| p.size), Some(1000));
        assert_eq!(ledger.allowances().balance_of(&addr("0xa")), 10);
    }

    #[test]
    fn drop_rolls_back_everything() {
        let mut ledger = ledger_with_pool();
        let before = ledger.clone();
        {
            let mut tx = LedgerTransaction::begin(&mut ledger);
            let _ = tx.adjust_size("p", SizeDelta::Increase(1000));
            let _ = tx.record_sale("p", 100);
            let _ = tx.credit(&addr("0xa"), 10);
            let _ = tx.credit(&addr("0xa"), 5);
            let _ = tx.debit(&addr("0xa"), 15);
        }
        assert_eq!(ledger, before);
    }

    #[test]
    fn rollback_restores_existing_balance() {
        let mut ledger = ledger_with_pool();
        {
            let mut tx = LedgerTransaction::begin(&mut ledger);
            let _ = tx.credit(&addr("0xa"), 20);
            tx.commit();
        }
        let before = ledger.clone();

        let mut tx = LedgerTransaction::begin(&mut ledger);
        assert_eq!(tx.debit(&addr("0xa"), 20), Ok(0));
        drop(tx);

        assert_eq!(ledger.allowances().balance_of(&addr("0xa")), 20);
        assert_eq!(ledger, before);
    }

    #[test]
    fn failed_step_is_not_journaled() {
        let mut ledger = ledger_with_pool();
        let before = ledger.clone();
        let mut tx = LedgerTransaction::begin(&mut ledger);
        assert!(tx.debit(&addr("0xb"), 1).is_err());
        assert!(tx.adjust_size("missing", SizeDelta::Increase(1)).is_err());
        drop(tx);
        assert_eq!(ledger, before);
    }
}
