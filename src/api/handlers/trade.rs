//! Trade handlers: deposit, buy, withdraw, allowance lookup.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::caller::Caller;
use crate::api::dto::{
    AllowanceResponse, BuyRequest, BuyResponse, DepositRequest, DepositResponse, WithdrawRequest,
    WithdrawResponse, parse_amount,
};
use crate::app_state::AppState;
use crate::domain::{Address, PoolName};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /pools/{name}/deposit` — Owner deposits asset units.
///
/// # Errors
///
/// Returns [`GatewayError`] if the caller is not the owner, the amount is
/// not a whole number of priced units, the attached value does not match,
/// or the asset transfer fails.
#[utoipa::path(
    post,
    path = "/api/v1/pools/{name}/deposit",
    tag = "Trading",
    summary = "Deposit into a pool",
    description = "Moves `amount` asset units from the owner into the pool and credits the owner's allowance with `paid_value`, which must equal `amount / price_per_unit`.",
    params(
        ("name" = String, Path, description = "Pool name"),
        ("x-account-id" = String, Header, description = "Calling account (must own the pool)"),
    ),
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Deposit committed", body = DepositResponse),
        (status = 400, description = "Invalid amount or payment", body = ErrorResponse),
        (status = 403, description = "Caller does not own the pool", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
        (status = 422, description = "Asset transfer failed", body = ErrorResponse),
    )
)]
pub async fn deposit(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(name): Path<String>,
    Json(req): Json<DepositRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let pool_name = PoolName::new(name)?;
    let amount = parse_amount("amount", &req.amount)?;
    let paid_value = parse_amount("paid_value", &req.paid_value)?;

    let receipt = state
        .ledger_service
        .deposit(&caller, &pool_name, amount, paid_value)
        .await?;

    Ok(Json(DepositResponse {
        pool: pool_name.to_string(),
        amount: amount.to_string(),
        credited: receipt.credited.to_string(),
        new_size: receipt.new_size.to_string(),
        owner_allowance: receipt.owner_allowance.to_string(),
        executed_at: Utc::now(),
    }))
}

/// `POST /pools/{name}/buy` — Buy asset units from a pool.
///
/// # Errors
///
/// Returns [`GatewayError`] if the amount is zero, exceeds the pool, is not
/// a whole number of priced units, the payment is wrong, or the asset
/// transfer fails.
#[utoipa::path(
    post,
    path = "/api/v1/pools/{name}/buy",
    tag = "Trading",
    summary = "Buy from a pool",
    description = "Buys `amount` asset units. `payment.mode` is `value` (attach `paid_value` equal to the cost) or `allowance` (cost is debited from the caller's allowance). The cost is credited to the pool owner.",
    params(
        ("name" = String, Path, description = "Pool name"),
        ("x-account-id" = String, Header, description = "Calling account"),
    ),
    request_body = BuyRequest,
    responses(
        (status = 200, description = "Purchase committed", body = BuyResponse),
        (status = 400, description = "Invalid amount or payment", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
        (status = 422, description = "Exceeds pool size, insufficient allowance, or transfer failed", body = ErrorResponse),
    )
)]
pub async fn buy(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(name): Path<String>,
    Json(req): Json<BuyRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let pool_name = PoolName::new(name)?;
    let amount = parse_amount("amount", &req.amount)?;
    let payment = req.payment.to_payment()?;

    let receipt = state
        .ledger_service
        .buy_from_pool(&caller, &pool_name, amount, payment)
        .await?;

    Ok(Json(BuyResponse {
        pool: pool_name.to_string(),
        amount: amount.to_string(),
        cost: receipt.cost.to_string(),
        payment_mode: receipt.payment_mode,
        new_size: receipt.new_size.to_string(),
        executed_at: Utc::now(),
    }))
}

/// `POST /withdraw` — Withdraw allowance as native value.
///
/// # Errors
///
/// Returns [`GatewayError`] if the amount is zero, exceeds the caller's
/// allowance, or the value transfer fails.
#[utoipa::path(
    post,
    path = "/api/v1/withdraw",
    tag = "Trading",
    summary = "Withdraw allowance",
    description = "Debits the caller's allowance and sends the same amount of native value. The debit is reverted if the transfer fails.",
    params(
        ("x-account-id" = String, Header, description = "Calling account"),
    ),
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal committed", body = WithdrawResponse),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 422, description = "Insufficient allowance or transfer failed", body = ErrorResponse),
    )
)]
pub async fn withdraw(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<WithdrawRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let amount = parse_amount("amount", &req.amount)?;
    let receipt = state.ledger_service.withdraw(&caller, amount).await?;

    Ok(Json(WithdrawResponse {
        account: caller.to_string(),
        amount: receipt.amount.to_string(),
        remaining: receipt.remaining.to_string(),
        executed_at: Utc::now(),
    }))
}

/// `GET /allowances/{account}` — Allowance balance of an account.
///
/// # Errors
///
/// Returns [`GatewayError`] if the account address is invalid.
#[utoipa::path(
    get,
    path = "/api/v1/allowances/{account}",
    tag = "Trading",
    summary = "Get allowance",
    description = "Returns the native-value credit held by an account. Unknown accounts have zero.",
    params(
        ("account" = String, Path, description = "Account address"),
    ),
    responses(
        (status = 200, description = "Allowance balance", body = AllowanceResponse),
        (status = 400, description = "Invalid address", body = ErrorResponse),
    )
)]
pub async fn get_allowance(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let account = Address::parse(&account)?;
    let allowance = state.ledger_service.get_allowance(&account).await;

    Ok(Json(AllowanceResponse {
        account: account.to_string(),
        allowance: allowance.to_string(),
    }))
}

/// Trading routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools/{name}/deposit", post(deposit))
        .route("/pools/{name}/buy", post(buy))
        .route("/withdraw", post(withdraw))
        .route("/allowances/{account}", get(get_allowance))
}
