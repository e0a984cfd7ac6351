//! Pool handlers: create, list, get, quote.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::{
    CreatePoolRequest, PaginationMeta, PaginationParams, PoolListResponse, PoolResponse,
    QuoteParams, QuoteResponse, parse_amount,
};
use crate::app_state::AppState;
use crate::domain::{Address, PoolName};
use crate::error::{ErrorResponse, GatewayError, LedgerError};

/// `POST /pools` — Create a new pool owned by the caller.
///
/// # Errors
///
/// Returns [`GatewayError`] on invalid input, a taken name, or a zero price.
#[utoipa::path(
    post,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "Create a pool",
    description = "Registers a named pool for an asset at a fixed price per unit of native value. The caller becomes the owner.",
    params(
        ("x-account-id" = String, Header, description = "Calling account"),
    ),
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool created", body = PoolResponse),
        (status = 400, description = "Invalid name, address or price", body = ErrorResponse),
        (status = 409, description = "Pool name already taken", body = ErrorResponse),
    )
)]
pub async fn create_pool(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<CreatePoolRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let name = PoolName::new(req.name)?;
    let asset = Address::parse(&req.asset)?;
    let price_per_unit = parse_amount("price_per_unit", &req.price_per_unit)?;

    let pool = state
        .ledger_service
        .create_pool(&caller, name, asset, price_per_unit)
        .await?;

    Ok((StatusCode::CREATED, Json(PoolResponse::from(&pool))))
}

/// `GET /pools` — List pools with pagination.
///
/// # Errors
///
/// Returns [`GatewayError`] on internal failures.
#[utoipa::path(
    get,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "List pools",
    description = "Returns a paginated list of all pools ordered by name.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated pool list", body = PoolListResponse),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let params = params.clamped();
    let pools = state.ledger_service.list_pools().await;

    let total = u32::try_from(pools.len())
        .map_err(|_| GatewayError::Internal("pool count exceeds u32".to_string()))?;
    let per_page = params.per_page;
    let page = params.page;
    let total_pages = total.div_ceil(per_page);

    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page as usize);
    let data: Vec<PoolResponse> = pools
        .iter()
        .skip(start)
        .take(per_page as usize)
        .map(PoolResponse::from)
        .collect();

    Ok(Json(PoolListResponse {
        data,
        pagination: PaginationMeta {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

/// `GET /pools/{name}` — Get pool details.
///
/// # Errors
///
/// Returns [`GatewayError`] wrapping [`LedgerError::PoolNotFound`] if the
/// pool does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{name}",
    tag = "Pools",
    summary = "Get pool details",
    description = "Returns the full record of a single pool.",
    params(
        ("name" = String, Path, description = "Pool name"),
    ),
    responses(
        (status = 200, description = "Pool details", body = PoolResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let pool = state
        .ledger_service
        .get_pool(&name)
        .await
        .ok_or(LedgerError::PoolNotFound(name))?;
    Ok(Json(PoolResponse::from(&pool)))
}

/// `GET /pools/{name}/quote` — Price a purchase without executing it.
///
/// # Errors
///
/// Returns [`GatewayError`] if the pool is missing or the amount is zero
/// or not a multiple of the price.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{name}/quote",
    tag = "Pools",
    summary = "Quote a purchase",
    description = "Returns the native value a purchase of `amount` asset units would cost. Pool size is reported but not enforced.",
    params(
        ("name" = String, Path, description = "Pool name"),
        QuoteParams,
    ),
    responses(
        (status = 200, description = "Quote", body = QuoteResponse),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn quote(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<QuoteParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let pool_name = PoolName::new(name)?;
    let amount = parse_amount("amount", &params.amount)?;
    let quote = state.ledger_service.quote(&pool_name, amount).await?;

    Ok(Json(QuoteResponse {
        pool: pool_name.to_string(),
        amount: amount.to_string(),
        cost: quote.cost.to_string(),
        available: quote.available.to_string(),
    }))
}

/// Pool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", post(create_pool).get(list_pools))
        .route("/pools/{name}", get(get_pool))
        .route("/pools/{name}/quote", get(quote))
}
