//! Shared harness for integration tests.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::routing::get;
use serde_json::Value;
use tower::ServiceExt;

use poola_gateway::api;
use poola_gateway::app_state::AppState;
use poola_gateway::domain::{Address, EventBus};
use poola_gateway::gateway::{
    AssetGateway, InMemoryAssetGateway, InMemoryValueTransfer, ValueTransfer,
};
use poola_gateway::service::{LedgerService, TradeEngine};
use poola_gateway::ws::handler::ws_handler;

pub const LEDGER: &str = "0xledger";
pub const TOKEN: &str = "0xtoken";
pub const OWNER: &str = "0xa";
pub const BUYER: &str = "0xb";

/// Router plus handles on the in-memory collaborators behind it.
pub struct Harness {
    pub app: Router,
    pub assets: Arc<InMemoryAssetGateway>,
    pub value: Arc<InMemoryValueTransfer>,
}

pub fn addr(s: &str) -> Address {
    let Ok(a) = Address::parse(s) else {
        panic!("valid address: {s}");
    };
    a
}

impl Harness {
    pub fn new() -> Self {
        let assets = Arc::new(InMemoryAssetGateway::new(addr(LEDGER)));
        let value = Arc::new(InMemoryValueTransfer::new());
        let engine = TradeEngine::new(
            addr(LEDGER),
            Arc::clone(&assets) as Arc<dyn AssetGateway>,
            Arc::clone(&value) as Arc<dyn ValueTransfer>,
        );
        let service = Arc::new(LedgerService::new(engine, EventBus::new(64)));
        let app = Router::new()
            .merge(api::build_router())
            .route("/ws", get(ws_handler))
            .with_state(AppState::new(service));
        Self { app, assets, value }
    }

    /// Gives `holder` asset units to deposit.
    pub fn mint(&self, holder: &str, amount: u128) {
        self.assets.mint(&addr(TOKEN), &addr(holder), amount);
    }

    pub fn asset_balance(&self, holder: &str) -> u128 {
        self.assets.balance(&addr(TOKEN), &addr(holder))
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        caller: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(caller) = caller {
            builder = builder.header("x-account-id", caller);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        };
        let Ok(request) = request else {
            panic!("valid request");
        };
        let Ok(response) = self.app.clone().oneshot(request).await;
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("readable body");
        };
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn create_pool(&self, caller: &str, name: &str, price: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/v1/pools",
            Some(caller),
            Some(serde_json::json!({ "name": name, "asset": TOKEN, "price_per_unit": price })),
        )
        .await
    }

    pub async fn deposit(
        &self,
        caller: &str,
        pool: &str,
        amount: &str,
        paid_value: &str,
    ) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            &format!("/api/v1/pools/{pool}/deposit"),
            Some(caller),
            Some(serde_json::json!({ "amount": amount, "paid_value": paid_value })),
        )
        .await
    }

    pub async fn buy(&self, caller: &str, pool: &str, amount: &str, payment: Value) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            &format!("/api/v1/pools/{pool}/buy"),
            Some(caller),
            Some(serde_json::json!({ "amount": amount, "payment": payment })),
        )
        .await
    }

    pub async fn withdraw(&self, caller: &str, amount: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/v1/withdraw",
            Some(caller),
            Some(serde_json::json!({ "amount": amount })),
        )
        .await
    }

    pub async fn allowance(&self, account: &str) -> String {
        let (status, body) = self
            .send(Method::GET, &format!("/api/v1/allowances/{account}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body["allowance"].as_str().unwrap_or_default().to_string()
    }

    pub async fn pool(&self, name: &str) -> (StatusCode, Value) {
        self.send(Method::GET, &format!("/api/v1/pools/{name}"), None, None)
            .await
    }
}

/// Extracts the numeric error code from an error response.
pub fn error_code(body: &Value) -> u64 {
    body["error"]["code"].as_u64().unwrap_or_default()
}
