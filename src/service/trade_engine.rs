//! Trade engine: the transactional state-transition rules of the ledger.
//!
//! Every operation takes the [`Ledger`] explicitly, checks its guard
//! clauses in a fixed order, stages ledger mutations inside a
//! journaled ledger transaction, and only then invokes the external collaborator.
//! A failed collaborator call drops the transaction, which rolls back every
//! staged mutation. The `&mut Ledger` borrow spans the collaborator call, so
//! no other operation can observe the staged state.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{
    Address, Ledger, LedgerTransaction, Payment, PaymentMode, Pool, PoolName, SizeDelta,
};
use crate::error::LedgerError;
use crate::gateway::{AssetGateway, ValueTransfer};

/// Outcome of a committed deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    /// Pool size after the deposit.
    pub new_size: u128,
    /// Native value credited to the owner.
    pub credited: u128,
    /// Owner allowance after the credit.
    pub owner_allowance: u128,
}

/// Outcome of a committed purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Native value charged and credited to the pool owner.
    pub cost: u128,
    /// Pool size after the purchase.
    pub new_size: u128,
    /// How the purchase was paid.
    pub payment_mode: PaymentMode,
}

/// Outcome of a committed withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawReceipt {
    /// Native value sent to the caller.
    pub amount: u128,
    /// Allowance left after the withdrawal.
    pub remaining: u128,
}

/// Price of a prospective purchase, read from a single ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Native value the purchase would cost.
    pub cost: u128,
    /// Pool size at the time of the quote.
    pub available: u128,
}

/// Stateless orchestrator for `create_pool`, `deposit`, `buy_from_pool`
/// and `withdraw`.
#[derive(Debug, Clone)]
pub struct TradeEngine {
    custody: Address,
    assets: Arc<dyn AssetGateway>,
    value: Arc<dyn ValueTransfer>,
    allowed_assets: Option<HashSet<Address>>,
}

impl TradeEngine {
    /// Creates an engine. `custody` is the ledger's own account: the
    /// destination of deposits and the source of purchased asset units.
    #[must_use]
    pub fn new(
        custody: Address,
        assets: Arc<dyn AssetGateway>,
        value: Arc<dyn ValueTransfer>,
    ) -> Self {
        Self {
            custody,
            assets,
            value,
            allowed_assets: None,
        }
    }

    /// Restricts pool creation to the given asset contracts.
    #[must_use]
    pub fn with_allowed_assets(mut self, assets: impl IntoIterator<Item = Address>) -> Self {
        self.allowed_assets = Some(assets.into_iter().collect());
        self
    }

    /// The ledger's custody account.
    #[must_use]
    pub fn custody(&self) -> &Address {
        &self.custody
    }

    /// Registers a pool owned by `caller`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnsupportedAsset`] when an allow-list is configured
    /// and `asset` is not on it, then [`LedgerError::DuplicateName`] or
    /// [`LedgerError::InvalidPrice`].
    pub fn create_pool(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        name: PoolName,
        asset: Address,
        price_per_unit: u128,
    ) -> Result<Pool, LedgerError> {
        if let Some(allowed) = &self.allowed_assets
            && !allowed.contains(&asset)
        {
            return Err(LedgerError::UnsupportedAsset(asset));
        }
        ledger
            .pools_mut()
            .create(name, asset, caller.clone(), price_per_unit)
    }

    /// Moves `amount` asset units from the pool owner into the pool and
    /// credits the owner with `paid_value`.
    ///
    /// # Errors
    ///
    /// In check order: [`LedgerError::PoolNotFound`],
    /// [`LedgerError::NotPoolOwner`], [`LedgerError::BelowMinimumUnit`],
    /// [`LedgerError::NotDivisibleByPrice`], [`LedgerError::PaymentMismatch`];
    /// then [`LedgerError::AssetTransferFailed`] if the gateway refuses.
    pub fn deposit(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        pool_name: &str,
        amount: u128,
        paid_value: u128,
    ) -> Result<DepositReceipt, LedgerError> {
        let pool = find_pool(ledger, pool_name)?;
        if pool.owner != *caller {
            return Err(LedgerError::NotPoolOwner {
                pool: pool.name.clone(),
                caller: caller.clone(),
            });
        }
        if amount < pool.price_per_unit {
            return Err(LedgerError::BelowMinimumUnit {
                amount,
                price_per_unit: pool.price_per_unit,
            });
        }
        let expected = pool
            .value_of(amount)
            .ok_or(LedgerError::NotDivisibleByPrice {
                amount,
                price_per_unit: pool.price_per_unit,
            })?;
        if paid_value != expected {
            return Err(LedgerError::PaymentMismatch {
                expected,
                paid: paid_value,
            });
        }
        let asset = pool.asset.clone();

        let mut tx = LedgerTransaction::begin(ledger);
        let new_size = tx.adjust_size(pool_name, SizeDelta::Increase(amount))?;
        let owner_allowance = tx.credit(caller, paid_value)?;

        if !self
            .assets
            .transfer_from(&asset, caller, &self.custody, amount)
        {
            tracing::warn!(pool = pool_name, %caller, amount = %amount, "deposit transfer refused, rolling back");
            return Err(LedgerError::AssetTransferFailed);
        }
        tx.commit();

        Ok(DepositReceipt {
            new_size,
            credited: paid_value,
            owner_allowance,
        })
    }

    /// Sells `amount` asset units from the pool to `caller`, crediting the
    /// pool owner with the cost.
    ///
    /// # Errors
    ///
    /// In check order: [`LedgerError::PoolNotFound`],
    /// [`LedgerError::ZeroAmount`], [`LedgerError::ExceedsPoolSize`],
    /// [`LedgerError::NotDivisibleByPrice`], then
    /// [`LedgerError::PaymentMismatch`] (value mode) or
    /// [`LedgerError::InsufficientAllowance`] (allowance mode); finally
    /// [`LedgerError::AssetTransferFailed`] if the gateway refuses.
    pub fn buy_from_pool(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        pool_name: &str,
        amount: u128,
        payment: Payment,
    ) -> Result<PurchaseReceipt, LedgerError> {
        let pool = find_pool(ledger, pool_name)?;
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if amount > pool.size {
            return Err(LedgerError::ExceedsPoolSize {
                requested: amount,
                available: pool.size,
            });
        }
        let expected = pool
            .value_of(amount)
            .ok_or(LedgerError::NotDivisibleByPrice {
                amount,
                price_per_unit: pool.price_per_unit,
            })?;
        match payment {
            Payment::Value(paid) if paid != expected => {
                return Err(LedgerError::PaymentMismatch { expected, paid });
            }
            Payment::Value(_) => {}
            Payment::Allowance => {
                let available = ledger.allowances().balance_of(caller);
                if available < expected {
                    return Err(LedgerError::InsufficientAllowance {
                        requested: expected,
                        available,
                    });
                }
            }
        }
        let asset = pool.asset.clone();
        let owner = pool.owner.clone();

        let mut tx = LedgerTransaction::begin(ledger);
        if payment == Payment::Allowance {
            tx.debit(caller, expected)?;
        }
        let new_size = tx.adjust_size(pool_name, SizeDelta::Decrease(amount))?;
        tx.record_sale(pool_name, amount)?;
        tx.credit(&owner, expected)?;

        if !self.assets.transfer(&asset, caller, amount) {
            tracing::warn!(pool = pool_name, %caller, amount = %amount, "purchase transfer refused, rolling back");
            return Err(LedgerError::AssetTransferFailed);
        }
        tx.commit();

        Ok(PurchaseReceipt {
            cost: expected,
            new_size,
            payment_mode: payment.mode(),
        })
    }

    /// Pays `amount` of the caller's allowance out as native value.
    ///
    /// The allowance is debited before the transfer is issued and the debit
    /// is rolled back if the transfer fails.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ZeroAmount`], [`LedgerError::InsufficientAllowance`],
    /// or [`LedgerError::ValueTransferFailed`].
    pub fn withdraw(
        &self,
        ledger: &mut Ledger,
        caller: &Address,
        amount: u128,
    ) -> Result<WithdrawReceipt, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let mut tx = LedgerTransaction::begin(ledger);
        let remaining = tx.debit(caller, amount)?;

        if !self.value.send(caller, amount) {
            tracing::warn!(%caller, amount = %amount, "value transfer refused, rolling back");
            return Err(LedgerError::ValueTransferFailed);
        }
        tx.commit();

        Ok(WithdrawReceipt { amount, remaining })
    }

    /// Native value a purchase of `amount` units from `pool_name` would
    /// cost, alongside the pool's current size. Pool size is reported, not
    /// checked.
    ///
    /// # Errors
    ///
    /// [`LedgerError::PoolNotFound`], [`LedgerError::ZeroAmount`] or
    /// [`LedgerError::NotDivisibleByPrice`].
    pub fn quote(&self, ledger: &Ledger, pool_name: &str, amount: u128) -> Result<Quote, LedgerError> {
        let pool = find_pool(ledger, pool_name)?;
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let cost = pool.value_of(amount).ok_or(LedgerError::NotDivisibleByPrice {
            amount,
            price_per_unit: pool.price_per_unit,
        })?;
        Ok(Quote {
            cost,
            available: pool.size,
        })
    }
}

fn find_pool<'a>(ledger: &'a Ledger, name: &str) -> Result<&'a Pool, LedgerError> {
    ledger
        .pools()
        .get(name)
        .ok_or_else(|| LedgerError::PoolNotFound(name.to_string()))
}
