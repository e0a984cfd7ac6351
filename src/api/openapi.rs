//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    AllowanceResponse, BuyRequest, BuyResponse, CreatePoolRequest, DepositRequest,
    DepositResponse, PaginationMeta, PoolListResponse, PoolResponse, PaymentDto, QuoteResponse,
    WithdrawRequest, WithdrawResponse,
};
use super::handlers::{pool, system, trade};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "poola-gateway",
        description = "Named-pool fixed-price exchange ledger: pools, deposits, purchases and allowance withdrawals."
    ),
    paths(
        system::health_handler,
        pool::create_pool,
        pool::list_pools,
        pool::get_pool,
        pool::quote,
        trade::deposit,
        trade::buy,
        trade::withdraw,
        trade::get_allowance,
    ),
    components(schemas(
        system::HealthResponse,
        CreatePoolRequest,
        PoolResponse,
        PoolListResponse,
        PaginationMeta,
        QuoteResponse,
        DepositRequest,
        DepositResponse,
        PaymentDto,
        BuyRequest,
        BuyResponse,
        WithdrawRequest,
        WithdrawResponse,
        AllowanceResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Service health"),
        (name = "Pools", description = "Pool registry"),
        (name = "Trading", description = "Deposits, purchases and allowance withdrawals"),
    )
)]
pub struct ApiDoc;
