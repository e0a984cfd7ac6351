//! External collaborators consumed by the trade engine.
//!
//! [`AssetGateway`] moves fungible-asset units; [`ValueTransfer`] pays out
//! native value. Both report plain success or failure and never partially
//! complete. The engine treats a `false` result as a failed operation and
//! rolls back every ledger change made in the same call.

pub mod memory;

pub use memory::{InMemoryAssetGateway, InMemoryValueTransfer};

use crate::domain::Address;

/// Fungible-asset transfer capability.
pub trait AssetGateway: Send + Sync + std::fmt::Debug {
    /// Sends `amount` units of `asset` from the ledger's custody to `to`.
    fn transfer(&self, asset: &Address, to: &Address, amount: u128) -> bool;

    /// Moves `amount` units of `asset` from `from` to `to`.
    fn transfer_from(&self, asset: &Address, from: &Address, to: &Address, amount: u128) -> bool;
}

/// Outbound native-value transfer capability.
pub trait ValueTransfer: Send + Sync + std::fmt::Debug {
    /// Sends `amount` native value units to `to`.
    fn send(&self, to: &Address, amount: u128) -> bool;
}
