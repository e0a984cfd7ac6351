//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams committed ledger events to
//! subscribed clients and answers read-only queries.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
