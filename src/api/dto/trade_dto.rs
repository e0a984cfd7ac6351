//! Deposit, purchase, withdrawal and allowance DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::parse_amount;
use crate::domain::{Payment, PaymentMode};
use crate::error::GatewayError;

/// Request body for `POST /pools/{name}/deposit`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DepositRequest {
    /// Asset units to deposit (string-encoded u128).
    pub amount: String,
    /// Native value attached to the deposit (string-encoded u128).
    pub paid_value: String,
}

/// Response body for `POST /pools/{name}/deposit`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DepositResponse {
    /// Pool name.
    pub pool: String,
    /// Asset units deposited.
    pub amount: String,
    /// Native value credited to the owner.
    pub credited: String,
    /// Pool size after the deposit.
    pub new_size: String,
    /// Owner allowance after the deposit.
    pub owner_allowance: String,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
}

/// Explicit payment mode for a purchase.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PaymentDto {
    /// Native value attached to the call.
    Value {
        /// Attached native value (string-encoded u128).
        paid_value: String,
    },
    /// Debit the buyer's allowance.
    Allowance,
}

impl PaymentDto {
    /// Converts into the domain payment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `paid_value` is malformed.
    pub fn to_payment(&self) -> Result<Payment, GatewayError> {
        match self {
            Self::Value { paid_value } => Ok(Payment::Value(parse_amount("paid_value", paid_value)?)),
            Self::Allowance => Ok(Payment::Allowance),
        }
    }
}

/// Request body for `POST /pools/{name}/buy`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BuyRequest {
    /// Asset units to buy (string-encoded u128).
    pub amount: String,
    /// How the purchase is paid.
    pub payment: PaymentDto,
}

/// Response body for `POST /pools/{name}/buy`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BuyResponse {
    /// Pool name.
    pub pool: String,
    /// Asset units bought.
    pub amount: String,
    /// Native value charged.
    pub cost: String,
    /// Payment mode used.
    #[schema(value_type = String)]
    pub payment_mode: PaymentMode,
    /// Pool size after the purchase.
    pub new_size: String,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
}

/// Request body for `POST /withdraw`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    /// Native value to withdraw (string-encoded u128).
    pub amount: String,
}

/// Response body for `POST /withdraw`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawResponse {
    /// Withdrawing account.
    pub account: String,
    /// Native value sent.
    pub amount: String,
    /// Allowance remaining.
    pub remaining: String,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
}

/// Response body for `GET /allowances/{account}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AllowanceResponse {
    /// Account address.
    pub account: String,
    /// Allowance balance (string-encoded u128).
    pub allowance: String,
}
