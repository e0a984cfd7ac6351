//! Ledger service: serializes operations, drives the trade engine, and
//! emits events.

use chrono::Utc;
use tokio::sync::Mutex;

use super::trade_engine::{DepositReceipt, PurchaseReceipt, Quote, TradeEngine, WithdrawReceipt};
use crate::domain::{Address, EventBus, Ledger, LedgerEvent, Payment, Pool, PoolName};
use crate::error::{GatewayError, LedgerError};

/// Orchestration layer for all ledger operations.
///
/// Owns the single [`Ledger`] behind one async mutex, so every operation
/// runs to completion before the next one starts. Every mutation method
/// follows the pattern: acquire lock → run the trade engine → release →
/// emit event → return result. Failed operations emit nothing.
#[derive(Debug)]
pub struct LedgerService {
    ledger: Mutex<Ledger>,
    engine: TradeEngine,
    event_bus: EventBus,
}

impl LedgerService {
    /// Creates a service over an empty ledger.
    #[must_use]
    pub fn new(engine: TradeEngine, event_bus: EventBus) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            engine,
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`TradeEngine`].
    #[must_use]
    pub fn engine(&self) -> &TradeEngine {
        &self.engine
    }

    /// Copy of the full ledger state.
    pub async fn snapshot(&self) -> Ledger {
        self.ledger.lock().await.clone()
    }

    /// Registers a new pool owned by `caller`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] wrapping the ledger rejection.
    pub async fn create_pool(
        &self,
        caller: &Address,
        name: PoolName,
        asset: Address,
        price_per_unit: u128,
    ) -> Result<Pool, GatewayError> {
        let result = {
            let mut ledger = self.ledger.lock().await;
            self.engine
                .create_pool(&mut ledger, caller, name, asset, price_per_unit)
        };
        let pool = result.map_err(|e| rejected("create_pool", caller, e))?;

        let _ = self.event_bus.publish(LedgerEvent::PoolCreated {
            pool: pool.name.clone(),
            asset: pool.asset.clone(),
            owner: pool.owner.clone(),
            price_per_unit: pool.price_per_unit.to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(pool = %pool.name, owner = %pool.owner, price_per_unit = %pool.price_per_unit, "pool created");
        Ok(pool)
    }

    /// Deposits asset units into a pool owned by `caller`.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] wrapping the ledger rejection.
    pub async fn deposit(
        &self,
        caller: &Address,
        pool_name: &PoolName,
        amount: u128,
        paid_value: u128,
    ) -> Result<DepositReceipt, GatewayError> {
        let result = {
            let mut ledger = self.ledger.lock().await;
            self.engine
                .deposit(&mut ledger, caller, pool_name.as_str(), amount, paid_value)
        };
        let receipt = result.map_err(|e| rejected("deposit", caller, e))?;

        let _ = self.event_bus.publish(LedgerEvent::Deposited {
            pool: pool_name.clone(),
            owner: caller.clone(),
            amount: amount.to_string(),
            credited: receipt.credited.to_string(),
            new_size: receipt.new_size.to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(pool = %pool_name, %caller, amount = %amount, new_size = %receipt.new_size, "deposit committed");
        Ok(receipt)
    }

    /// Buys asset units from a pool.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] wrapping the ledger rejection.
    pub async fn buy_from_pool(
        &self,
        caller: &Address,
        pool_name: &PoolName,
        amount: u128,
        payment: Payment,
    ) -> Result<PurchaseReceipt, GatewayError> {
        let result = {
            let mut ledger = self.ledger.lock().await;
            self.engine
                .buy_from_pool(&mut ledger, caller, pool_name.as_str(), amount, payment)
        };
        let receipt = result.map_err(|e| rejected("buy_from_pool", caller, e))?;

        let _ = self.event_bus.publish(LedgerEvent::Purchased {
            pool: pool_name.clone(),
            buyer: caller.clone(),
            amount: amount.to_string(),
            cost: receipt.cost.to_string(),
            payment_mode: receipt.payment_mode,
            new_size: receipt.new_size.to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(pool = %pool_name, %caller, amount = %amount, cost = %receipt.cost, "purchase committed");
        Ok(receipt)
    }

    /// Withdraws allowance as native value.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] wrapping the ledger rejection.
    pub async fn withdraw(
        &self,
        caller: &Address,
        amount: u128,
    ) -> Result<WithdrawReceipt, GatewayError> {
        let result = {
            let mut ledger = self.ledger.lock().await;
            self.engine.withdraw(&mut ledger, caller, amount)
        };
        let receipt = result.map_err(|e| rejected("withdraw", caller, e))?;

        let _ = self.event_bus.publish(LedgerEvent::Withdrawn {
            account: caller.clone(),
            amount: receipt.amount.to_string(),
            remaining: receipt.remaining.to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(%caller, amount = %amount, remaining = %receipt.remaining, "withdrawal committed");
        Ok(receipt)
    }

    /// Native value a purchase of `amount` units would cost, with the pool
    /// size taken under the same lock.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] wrapping the ledger rejection.
    pub async fn quote(&self, pool_name: &PoolName, amount: u128) -> Result<Quote, GatewayError> {
        let ledger = self.ledger.lock().await;
        Ok(self.engine.quote(&ledger, pool_name.as_str(), amount)?)
    }

    /// Returns a copy of the pool, if it exists.
    pub async fn get_pool(&self, name: &str) -> Option<Pool> {
        self.ledger.lock().await.pools().get(name).cloned()
    }

    /// Returns the allowance balance of `account`.
    pub async fn get_allowance(&self, account: &Address) -> u128 {
        self.ledger.lock().await.allowances().balance_of(account)
    }

    /// Returns all pools ordered by name.
    pub async fn list_pools(&self) -> Vec<Pool> {
        self.ledger
            .lock()
            .await
            .pools()
            .list()
            .into_iter()
            .cloned()
            .collect()
    }
}

/// Logs a rejected operation and lifts it into a [`GatewayError`].
fn rejected(operation: &'static str, caller: &Address, err: LedgerError) -> GatewayError {
    match err {
        LedgerError::AssetTransferFailed | LedgerError::ValueTransferFailed => {
            tracing::warn!(operation, %caller, error = %err, "operation aborted by collaborator");
        }
        _ => tracing::debug!(operation, %caller, error = %err, "operation rejected"),
    }
    GatewayError::Ledger(err)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::domain::PaymentMode;
    use crate::gateway::{AssetGateway, InMemoryAssetGateway, InMemoryValueTransfer, ValueTransfer};

    fn addr(s: &str) -> Address {
        let Ok(a) = Address::parse(s) else {
            panic!("valid address");
        };
        a
    }

    fn name(s: &str) -> PoolName {
        let Ok(n) = PoolName::new(s) else {
            panic!("valid name");
        };
        n
    }

    fn make_service() -> (LedgerService, Arc<InMemoryAssetGateway>, Arc<InMemoryValueTransfer>) {
        let custody = addr("0xledger");
        let assets = Arc::new(InMemoryAssetGateway::new(custody.clone()));
        assets.mint(&addr("0xtoken"), &addr("0xa"), 10_000);
        let value = Arc::new(InMemoryValueTransfer::new());
        let engine = TradeEngine::new(
            custody,
            Arc::clone(&assets) as Arc<dyn AssetGateway>,
            Arc::clone(&value) as Arc<dyn ValueTransfer>,
        );
        (
            LedgerService::new(engine, EventBus::new(1000)),
            assets,
            value,
        )
    }

    #[tokio::test]
    async fn create_pool_emits_event() {
        let (service, _, _) = make_service();
        let mut rx = service.event_bus().subscribe();

        let result = service
            .create_pool(&addr("0xa"), name("tokenPool"), addr("0xtoken"), 100)
            .await;
        assert!(result.is_ok());

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "pool_created");
        assert_eq!(event.pool(), Some(&name("tokenPool")));
    }

    #[tokio::test]
    async fn failed_operation_emits_nothing() {
        let (service, _, _) = make_service();
        let mut rx = service.event_bus().subscribe();

        let result = service
            .create_pool(&addr("0xa"), name("p"), addr("0xtoken"), 0)
            .await;
        let Err(GatewayError::Ledger(LedgerError::InvalidPrice)) = result else {
            panic!("expected InvalidPrice");
        };
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_trade_cycle() {
        let (service, assets, value) = make_service();
        let (a, b) = (addr("0xa"), addr("0xb"));
        let p = name("p");

        let _ = service.create_pool(&a, p.clone(), addr("0xtoken"), 100).await;
        let Ok(receipt) = service.deposit(&a, &p, 1000, 10).await else {
            panic!("deposit failed");
        };
        assert_eq!(receipt.new_size, 1000);
        assert_eq!(service.get_allowance(&a).await, 10);

        let Ok(receipt) = service.buy_from_pool(&b, &p, 500, Payment::Value(5)).await else {
            panic!("purchase failed");
        };
        assert_eq!(receipt.payment_mode, PaymentMode::Value);
        assert_eq!(service.get_pool("p").await.map(|p| p.size), Some(500));
        assert_eq!(service.get_allowance(&a).await, 15);
        assert_eq!(assets.balance(&addr("0xtoken"), &b), 500);

        let Err(GatewayError::Ledger(LedgerError::InsufficientAllowance { .. })) =
            service.withdraw(&b, 1).await
        else {
            panic!("expected InsufficientAllowance");
        };

        let Ok(receipt) = service.withdraw(&a, 5).await else {
            panic!("withdraw failed");
        };
        assert_eq!(receipt.remaining, 10);
        assert_eq!(value.received(&a), 5);
    }

    #[tokio::test]
    async fn rejected_withdraw_leaves_ledger_untouched() {
        let (service, _, value) = make_service();
        let a = addr("0xa");
        let p = name("p");
        let _ = service.create_pool(&a, p.clone(), addr("0xtoken"), 100).await;
        let _ = service.deposit(&a, &p, 1000, 10).await;

        let before = service.snapshot().await;
        value.set_failing(true);
        let result = service.withdraw(&a, 10).await;
        assert!(matches!(
            result,
            Err(GatewayError::Ledger(LedgerError::ValueTransferFailed))
        ));
        assert_eq!(service.snapshot().await, before);
    }

    #[tokio::test]
    async fn list_pools_sorted() {
        let (service, _, _) = make_service();
        let a = addr("0xa");
        let _ = service.create_pool(&a, name("zeta"), addr("0xt"), 1).await;
        let _ = service.create_pool(&a, name("alpha"), addr("0xt"), 1).await;

        let names: Vec<String> = service
            .list_pools()
            .await
            .into_iter()
            .map(|p| p.name.to_string())
            .collect();
        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_purchases_never_oversell() {
        let (service, _, _) = make_service();
        let service = Arc::new(service);
        let a = addr("0xa");
        let p = name("p");
        let _ = service.create_pool(&a, p.clone(), addr("0xtoken"), 100).await;
        let _ = service.deposit(&a, &p, 1000, 10).await;

        let mut handles = Vec::new();
        for i in 0..20 {
            let service = Arc::clone(&service);
            let p = p.clone();
            handles.push(tokio::spawn(async move {
                let buyer = addr(&format!("0xbuyer{i}"));
                service
                    .buy_from_pool(&buyer, &p, 100, Payment::Value(1))
                    .await
                    .is_ok()
            }));
        }
        let mut successes = 0;
        for handle in handles {
            if matches!(handle.await, Ok(true)) {
                successes += 1;
            }
        }
        assert_eq!(successes, 10);
        assert_eq!(service.get_pool("p").await.map(|p| p.size), Some(0));
        assert_eq!(service.get_allowance(&a).await, 20);
    }

    #[tokio::test]
    async fn quote_reports_cost_and_validates() {
        let (service, _, _) = make_service();
        let a = addr("0xa");
        let p = name("p");
        assert_ok!(service.create_pool(&a, p.clone(), addr("0xtoken"), 100).await);

        let quote = assert_ok!(service.quote(&p, 5000).await);
        assert_eq!(quote.cost, 50);
        assert_eq!(quote.available, 0);
        assert_err!(service.quote(&p, 0).await);
        assert_err!(service.quote(&p, 150).await);
        assert_err!(service.quote(&name("missing"), 100).await);
    }
}
