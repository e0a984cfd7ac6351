//! In-memory collaborators for tests and the sandbox server.
//!
//! Both types keep their books behind a `std::sync::Mutex` and can be
//! switched into a failing mode to exercise rollback paths. A poisoned
//! lock is reported as a failed transfer.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{AssetGateway, ValueTransfer};
use crate::domain::Address;

/// Asset balances keyed by `(asset, holder)`.
#[derive(Debug)]
pub struct InMemoryAssetGateway {
    custodian: Address,
    initial_balance: u128,
    balances: Mutex<HashMap<(Address, Address), u128>>,
    failing: AtomicBool,
}

impl InMemoryAssetGateway {
    /// Creates a gateway whose `transfer` draws from `custodian`.
    #[must_use]
    pub fn new(custodian: Address) -> Self {
        Self::with_initial_balance(custodian, 0)
    }

    /// Creates a gateway where every holder other than the custodian
    /// starts with `initial_balance` units of every asset.
    #[must_use]
    pub fn with_initial_balance(custodian: Address, initial_balance: u128) -> Self {
        Self {
            custodian,
            initial_balance,
            balances: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Adds `amount` units of `asset` to `holder`.
    pub fn mint(&self, asset: &Address, holder: &Address, amount: u128) {
        let Ok(mut balances) = self.balances.lock() else {
            return;
        };
        let current = self.current(&balances, asset, holder);
        balances.insert(
            (asset.clone(), holder.clone()),
            current.saturating_add(amount),
        );
    }

    /// Returns the balance of `holder` in `asset`.
    #[must_use]
    pub fn balance(&self, asset: &Address, holder: &Address) -> u128 {
        self.balances
            .lock()
            .map(|balances| self.current(&balances, asset, holder))
            .unwrap_or(0)
    }

    /// Makes every subsequent transfer fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn current(
        &self,
        balances: &HashMap<(Address, Address), u128>,
        asset: &Address,
        holder: &Address,
    ) -> u128 {
        match balances.get(&(asset.clone(), holder.clone())) {
            Some(balance) => *balance,
            None if *holder == self.custodian => 0,
            None => self.initial_balance,
        }
    }

    fn move_units(&self, asset: &Address, from: &Address, to: &Address, amount: u128) -> bool {
        if self.failing.load(Ordering::SeqCst) {
            return false;
        }
        let Ok(mut balances) = self.balances.lock() else {
            return false;
        };
        let from_balance = self.current(&balances, asset, from);
        let Some(from_next) = from_balance.checked_sub(amount) else {
            return false;
        };
        if from == to {
            return true;
        }
        let Some(to_next) = self.current(&balances, asset, to).checked_add(amount) else {
            return false;
        };
        balances.insert((asset.clone(), from.clone()), from_next);
        balances.insert((asset.clone(), to.clone()), to_next);
        true
    }
}

impl AssetGateway for InMemoryAssetGateway {
    fn transfer(&self, asset: &Address, to: &Address, amount: u128) -> bool {
        let custodian = self.custodian.clone();
        self.move_units(asset, &custodian, to, amount)
    }

    fn transfer_from(&self, asset: &Address, from: &Address, to: &Address, amount: u128) -> bool {
        self.move_units(asset, from, to, amount)
    }
}

/// Records native-value payouts per recipient.
#[derive(Debug, Default)]
pub struct InMemoryValueTransfer {
    sent: Mutex<HashMap<Address, u128>>,
    failing: AtomicBool,
}

impl InMemoryValueTransfer {
    /// Creates an empty payout book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total native value sent to `account` so far.
    #[must_use]
    pub fn received(&self, account: &Address) -> u128 {
        self.sent
            .lock()
            .map(|sent| sent.get(account).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Makes every subsequent send fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ValueTransfer for InMemoryValueTransfer {
    fn send(&self, to: &Address, amount: u128) -> bool {
        if self.failing.load(Ordering::SeqCst) {
            return false;
        }
        let Ok(mut sent) = self.sent.lock() else {
            return false;
        };
        let entry = sent.entry(to.clone()).or_insert(0);
        match entry.checked_add(amount) {
            Some(next) => {
                *entry = next;
                true
            }
            None => false,
        }
    }
}
