//! # poola-gateway
//!
//! REST API and WebSocket gateway for a named-pool, fixed-price exchange
//! ledger.
//!
//! Owners register pools that sell units of an external asset for native
//! value at a fixed price. Deposits and purchases credit the pool owner's
//! allowance, a per-account balance of native value that can be withdrawn
//! or spent on purchases from any pool. Every operation either fully
//! commits or leaves no trace: [`service::TradeEngine`] stages state in a
//! journaled transaction that rolls back unless committed.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── LedgerService (service/)      ── EventBus (domain/)
//!     ├── TradeEngine (service/)
//!     │
//!     ├── Ledger: PoolRegistry + AllowanceLedger (domain/)
//!     └── AssetGateway / ValueTransfer (gateway/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod service;
pub mod ws;
