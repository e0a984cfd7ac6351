//! Domain layer: identifiers, ledger tables, transactions, and events.
//!
//! This module contains the exchange ledger state model: pool records and
//! their registry, the allowance ledger, the journaled transaction used to
//! make every operation all-or-nothing, and the event system for
//! broadcasting committed changes.

pub mod address;
pub mod allowance_ledger;
pub mod event_bus;
pub mod ledger;
pub mod ledger_event;
pub mod payment;
pub mod pool;
pub mod pool_name;
pub mod pool_registry;

pub use address::Address;
pub use allowance_ledger::AllowanceLedger;
pub use event_bus::EventBus;
pub use ledger::Ledger;
pub(crate) use ledger::LedgerTransaction;
pub use ledger_event::LedgerEvent;
pub use payment::{Payment, PaymentMode};
pub use pool::Pool;
pub use pool_name::PoolName;
pub use pool_registry::PoolRegistry;
pub(crate) use pool_registry::SizeDelta;
