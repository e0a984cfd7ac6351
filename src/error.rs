//! Ledger and gateway error types with HTTP status code mapping.
//!
//! [`LedgerError`] is the closed taxonomy of failures produced by the
//! exchange ledger core. Every variant aborts the operation that raised it
//! with no observable state change.
//!
//! [`GatewayError`] is the central error type for the service and REST
//! layers. Each variant maps to a specific HTTP status code and structured
//! JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Address, PoolName};

/// Failures raised by the pool registry, the allowance ledger, and the
/// trade engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A pool with this name already exists.
    #[error("pool name already taken: {0}")]
    DuplicateName(PoolName),

    /// Price per unit must be strictly positive.
    #[error("invalid price: price per unit must be positive")]
    InvalidPrice,

    /// No pool is registered under this name.
    #[error("pool not found: {0}")]
    PoolNotFound(String),

    /// Only the pool owner may deposit into a pool.
    #[error("account {caller} is not the owner of pool {pool}")]
    NotPoolOwner {
        /// Target pool.
        pool: PoolName,
        /// Account that attempted the operation.
        caller: Address,
    },

    /// Deposit is smaller than one priced unit.
    #[error("amount {amount} is below the minimum unit of {price_per_unit}")]
    BelowMinimumUnit {
        /// Requested asset amount.
        amount: u128,
        /// Pool price per unit of native value.
        price_per_unit: u128,
    },

    /// Amount is not a whole multiple of the pool price.
    #[error("amount {amount} is not divisible by price {price_per_unit}")]
    NotDivisibleByPrice {
        /// Requested asset amount.
        amount: u128,
        /// Pool price per unit of native value.
        price_per_unit: u128,
    },

    /// Attached native value differs from the computed cost.
    #[error("payment mismatch: expected {expected}, got {paid}")]
    PaymentMismatch {
        /// Native value the operation costs.
        expected: u128,
        /// Native value attached to the call.
        paid: u128,
    },

    /// Zero-sized purchases and withdrawals are rejected.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// Purchase exceeds what the pool holds.
    #[error("requested {requested} exceeds pool size {available}")]
    ExceedsPoolSize {
        /// Requested asset amount.
        requested: u128,
        /// Current pool size.
        available: u128,
    },

    /// Allowance balance is too small.
    #[error("insufficient allowance: requested {requested}, available {available}")]
    InsufficientAllowance {
        /// Amount that was to be debited.
        requested: u128,
        /// Current allowance balance.
        available: u128,
    },

    /// The asset gateway reported a failed transfer.
    #[error("asset transfer failed")]
    AssetTransferFailed,

    /// The outbound native-value transfer failed.
    #[error("native value transfer failed")]
    ValueTransferFailed,

    /// A balance or pool size would leave the `u128` range.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// Asset is not on the configured allow-list.
    #[error("unsupported asset: {0}")]
    UnsupportedAsset(Address),

    /// Pool name failed validation.
    #[error("invalid pool name: {0:?}")]
    InvalidPoolName(String),

    /// Address failed validation.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
}

impl LedgerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidPrice => 1002,
            Self::InvalidPoolName(_) => 1003,
            Self::InvalidAddress(_) => 1004,
            Self::ZeroAmount => 1005,
            Self::BelowMinimumUnit { .. } => 1006,
            Self::NotDivisibleByPrice { .. } => 1007,
            Self::PaymentMismatch { .. } => 1008,
            Self::UnsupportedAsset(_) => 1009,
            Self::PoolNotFound(_) => 2001,
            Self::DuplicateName(_) => 2002,
            Self::NotPoolOwner { .. } => 2003,
            Self::ExceedsPoolSize { .. } => 4001,
            Self::InsufficientAllowance { .. } => 4002,
            Self::AssetTransferFailed => 4003,
            Self::ValueTransferFailed => 4004,
            Self::ArithmeticOverflow => 4005,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPrice
            | Self::InvalidPoolName(_)
            | Self::InvalidAddress(_)
            | Self::ZeroAmount
            | Self::BelowMinimumUnit { .. }
            | Self::NotDivisibleByPrice { .. }
            | Self::PaymentMismatch { .. }
            | Self::UnsupportedAsset(_) => StatusCode::BAD_REQUEST,
            Self::PoolNotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateName(_) => StatusCode::CONFLICT,
            Self::NotPoolOwner { .. } => StatusCode::FORBIDDEN,
            Self::ExceedsPoolSize { .. }
            | Self::InsufficientAllowance { .. }
            | Self::AssetTransferFailed
            | Self::ValueTransferFailed
            | Self::ArithmeticOverflow => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4002,
///     "message": "insufficient allowance: requested 10, available 5",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                          |
/// |-----------|-------------------|--------------------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request                      |
/// | 2000–2999 | State / Access    | 404 Not Found / 409 Conflict / 403   |
/// | 3000–3999 | Server            | 500 Internal Server Error            |
/// | 4000–4999 | Balance / Transfer| 422 Unprocessable Entity             |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Error propagated from the ledger core.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Request validation failed before reaching the ledger.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The `x-account-id` header was absent.
    #[error("missing caller: set the x-account-id header")]
    MissingCaller,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Ledger(e) => e.error_code(),
            Self::InvalidRequest(_) => 1000,
            Self::MissingCaller => 1001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Ledger(e) => e.status_code(),
            Self::InvalidRequest(_) | Self::MissingCaller => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
