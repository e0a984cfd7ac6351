//! Name-keyed pool storage.
//!
//! [`PoolRegistry`] owns every [`Pool`] record. Name uniqueness is
//! enforced at insert time; pools are never removed. Size mutation is
//! crate-internal and reserved for the trade engine, which performs its
//! own precondition checks first.

use std::collections::HashMap;

use super::{Address, Pool, PoolName};
use crate::error::LedgerError;

/// Signed change applied to a pool's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SizeDelta {
    /// Asset units added by a deposit.
    Increase(u128),
    /// Asset units removed by a purchase.
    Decrease(u128),
}

/// Central store for all pools, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolRegistry {
    pools: HashMap<PoolName, Pool>,
}

impl PoolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateName`] if the name is taken and
    /// [`LedgerError::InvalidPrice`] if `price_per_unit` is zero.
    pub fn create(
        &mut self,
        name: PoolName,
        asset: Address,
        owner: Address,
        price_per_unit: u128,
    ) -> Result<Pool, LedgerError> {
        if self.pools.contains_key(&name) {
            return Err(LedgerError::DuplicateName(name));
        }
        if price_per_unit == 0 {
            return Err(LedgerError::InvalidPrice);
        }
        let pool = Pool::new(name.clone(), asset, owner, price_per_unit);
        self.pools.insert(name, pool.clone());
        Ok(pool)
    }

    /// Looks up a pool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Pool> {
        self.pools.get(name)
    }

    /// Returns all pools ordered by name.
    #[must_use]
    pub fn list(&self) -> Vec<&Pool> {
        let mut pools: Vec<&Pool> = self.pools.values().collect();
        pools.sort_by(|a, b| a.name.cmp(&b.name));
        pools
    }

    /// Returns the number of pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns `true` if no pool has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Applies `delta` to the pool size and returns the new size.
    ///
    /// Callers must have validated that a decrease does not exceed the
    /// current size; the check here only guards the `size >= 0` invariant.
    pub(crate) fn adjust_size(&mut self, name: &str, delta: SizeDelta) -> Result<u128, LedgerError> {
        let pool = self
            .pools
            .get_mut(name)
            .ok_or_else(|| LedgerError::PoolNotFound(name.to_string()))?;
        pool.size = match delta {
            SizeDelta::Increase(amount) => pool
                .size
                .checked_add(amount)
                .ok_or(LedgerError::ArithmeticOverflow)?,
            SizeDelta::Decrease(amount) => {
                pool.size
                    .checked_sub(amount)
                    .ok_or(LedgerError::ExceedsPoolSize {
                        requested: amount,
                        available: pool.size,
                    })?
            }
        };
        pool.last_modified_at = chrono::Utc::now();
        Ok(pool.size)
    }

    /// Bumps the sale counters of a pool.
    pub(crate) fn record_sale(&mut self, name: &str, amount: u128) -> Result<(), LedgerError> {
        let pool = self
            .pools
            .get_mut(name)
            .ok_or_else(|| LedgerError::PoolNotFound(name.to_string()))?;
        pool.purchase_count = pool.purchase_count.saturating_add(1);
        pool.total_sold = pool.total_sold.saturating_add(amount);
        Ok(())
    }

    /// Replaces a pool record wholesale. Used only by transaction rollback.
    pub(crate) fn restore(&mut self, pool: Pool) {
        self.pools.insert(pool.name.clone(), pool);
    }
}
