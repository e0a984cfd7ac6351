//! Pool record: fixed-price asset inventory owned by one account.

use chrono::{DateTime, Utc};

use super::{Address, PoolName};

/// A named pool pairing an asset contract, an owner, a fixed price, and
/// the quantity of asset units currently held.
///
/// `name`, `asset`, `owner` and `price_per_unit` are immutable after
/// creation. `size` only moves through [`super::PoolRegistry::adjust_size`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    /// Unique pool name.
    pub name: PoolName,

    /// Fungible-asset contract held by the pool.
    pub asset: Address,

    /// Account that created the pool.
    pub owner: Address,

    /// Smallest asset units obtainable per one unit of native value.
    pub price_per_unit: u128,

    /// Asset units currently held.
    pub size: u128,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last size change.
    pub last_modified_at: DateTime<Utc>,

    /// Number of completed purchases.
    pub purchase_count: u64,

    /// Cumulative asset units sold.
    pub total_sold: u128,
}

impl Pool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new(name: PoolName, asset: Address, owner: Address, price_per_unit: u128) -> Self {
        let now = Utc::now();
        Self {
            name,
            asset,
            owner,
            price_per_unit,
            size: 0,
            created_at: now,
            last_modified_at: now,
            purchase_count: 0,
            total_sold: 0,
        }
    }

    /// Native value that `amount` asset units cost in this pool, if
    /// `amount` is a whole multiple of the price.
    #[must_use]
    pub fn value_of(&self, amount: u128) -> Option<u128> {
        if self.price_per_unit == 0 || amount % self.price_per_unit != 0 {
            return None;
        }
        Some(amount / self.price_per_unit)
    }
}
