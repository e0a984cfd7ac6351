//! Data Transfer Objects for REST request/response serialization.
//!
//! All numeric amounts are serialized as JSON strings to prevent
//! precision loss on u128 values.

pub mod common_dto;
pub mod pool_dto;
pub mod trade_dto;

pub use common_dto::*;
pub use pool_dto::*;
pub use trade_dto::*;
