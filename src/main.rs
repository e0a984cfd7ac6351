//! poola-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints over an
//! in-memory sandbox of asset and value collaborators.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use poola_gateway::api;
use poola_gateway::app_state::AppState;
use poola_gateway::config::{GatewayConfig, LogFormat};
use poola_gateway::domain::EventBus;
use poola_gateway::gateway::{InMemoryAssetGateway, InMemoryValueTransfer};
use poola_gateway::service::{LedgerService, TradeEngine};
use poola_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        ledger = %config.ledger_account,
        "starting poola-gateway"
    );

    // Sandbox collaborators
    let assets = Arc::new(InMemoryAssetGateway::with_initial_balance(
        config.ledger_account.clone(),
        config.sandbox_initial_balance,
    ));
    let value = Arc::new(InMemoryValueTransfer::new());

    // Build service layer
    let mut engine = TradeEngine::new(config.ledger_account.clone(), assets, value);
    if let Some(allowed) = config.allowed_assets.clone() {
        tracing::info!(count = allowed.len(), "asset allow-list enabled");
        engine = engine.with_allowed_assets(allowed);
    }
    let event_bus = EventBus::new(config.event_bus_capacity);
    let ledger_service = Arc::new(LedgerService::new(engine, event_bus));

    let app_state = AppState::new(ledger_service);

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.request_timeout_secs),
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
