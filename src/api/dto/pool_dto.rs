//! Pool-related DTOs for create, get, list and quote operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::PaginationMeta;
use crate::domain::Pool;

/// Request body for `POST /pools`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePoolRequest {
    /// Unique pool name (max 100 chars).
    pub name: String,
    /// Address of the fungible-asset contract.
    pub asset: String,
    /// Asset units per unit of native value (string-encoded u128, > 0).
    pub price_per_unit: String,
}

/// Full pool state returned by create, get and list endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolResponse {
    /// Pool name.
    pub name: String,
    /// Asset contract address.
    pub asset: String,
    /// Owning account.
    pub owner: String,
    /// Asset units per unit of native value (string-encoded).
    pub price_per_unit: String,
    /// Asset units held (string-encoded).
    pub size: String,
    /// Number of purchases executed.
    pub purchase_count: u64,
    /// Cumulative asset units sold (string-encoded).
    pub total_sold: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last size change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Pool> for PoolResponse {
    fn from(pool: &Pool) -> Self {
        Self {
            name: pool.name.to_string(),
            asset: pool.asset.to_string(),
            owner: pool.owner.to_string(),
            price_per_unit: pool.price_per_unit.to_string(),
            size: pool.size.to_string(),
            purchase_count: pool.purchase_count,
            total_sold: pool.total_sold.to_string(),
            created_at: pool.created_at,
            updated_at: pool.last_modified_at,
        }
    }
}

/// Paginated list response for `GET /pools`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolListResponse {
    /// Pools on this page.
    pub data: Vec<PoolResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Query parameters for `GET /pools/{name}/quote`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuoteParams {
    /// Asset units to price (string-encoded u128).
    pub amount: String,
}

/// Response body for `GET /pools/{name}/quote`.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    /// Pool name.
    pub pool: String,
    /// Asset units priced (string-encoded).
    pub amount: String,
    /// Native value the purchase would cost (string-encoded).
    pub cost: String,
    /// Asset units currently available (string-encoded).
    pub available: String,
}
