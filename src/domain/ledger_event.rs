//! Domain events reflecting committed ledger mutations.
//!
//! Every successful operation emits a [`LedgerEvent`] through the
//! [`super::EventBus`]. Failed operations emit nothing. Events are
//! broadcast to WebSocket subscribers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Address, PaymentMode, PoolName};

/// Domain event emitted after every committed state mutation.
///
/// All `u128` amounts are stored as `String` to preserve precision when
/// serialized to JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Emitted when a new pool is created.
    PoolCreated {
        /// Pool name.
        pool: PoolName,
        /// Asset contract address.
        asset: Address,
        /// Pool owner.
        owner: Address,
        /// Asset units per unit of native value.
        price_per_unit: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after an owner deposit.
    Deposited {
        /// Pool name.
        pool: PoolName,
        /// Depositing owner.
        owner: Address,
        /// Asset units deposited.
        amount: String,
        /// Native value credited to the owner.
        credited: String,
        /// Pool size after the deposit.
        new_size: String,
        /// Deposit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a purchase.
    Purchased {
        /// Pool name.
        pool: PoolName,
        /// Buying account.
        buyer: Address,
        /// Asset units bought.
        amount: String,
        /// Native value charged and credited to the pool owner.
        cost: String,
        /// How the purchase was paid.
        payment_mode: PaymentMode,
        /// Pool size after the purchase.
        new_size: String,
        /// Purchase timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after an allowance withdrawal.
    Withdrawn {
        /// Withdrawing account.
        account: Address,
        /// Native value sent.
        amount: String,
        /// Allowance remaining after the withdrawal.
        remaining: String,
        /// Withdrawal timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Returns the pool this event concerns, if any.
    ///
    /// Withdrawals are account-level and carry no pool.
    #[must_use]
    pub fn pool(&self) -> Option<&PoolName> {
        match self {
            Self::PoolCreated { pool, .. }
            | Self::Deposited { pool, .. }
            | Self::Purchased { pool, .. } => Some(pool),
            Self::Withdrawn { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "pool_created",
            Self::Deposited { .. } => "deposited",
            Self::Purchased { .. } => "purchased",
            Self::Withdrawn { .. } => "withdrawn",
        }
    }
}
