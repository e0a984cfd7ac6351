//! Service layer: business logic orchestration.
//!
//! [`TradeEngine`] holds the ledger's state-transition rules and runs
//! synchronously against an explicit [`crate::domain::Ledger`].
//! [`LedgerService`] owns the ledger, serializes access to it, and emits
//! events through the [`super::domain::EventBus`].

pub mod ledger_service;
pub mod trade_engine;

pub use ledger_service::LedgerService;
pub use trade_engine::{DepositReceipt, PurchaseReceipt, Quote, TradeEngine, WithdrawReceipt};
