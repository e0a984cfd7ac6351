//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::GatewayError;

/// Pagination query parameters for list endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl PaginationParams {
    /// Clamps `per_page` to the allowed maximum of 100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }
}

/// Parses a string-encoded `u128` request field.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] naming `field` if `raw` is not
/// a non-negative integer.
pub fn parse_amount(field: &str, raw: &str) -> Result<u128, GatewayError> {
    raw.trim()
        .parse()
        .map_err(|_| GatewayError::InvalidRequest(format!("invalid {field}: {raw}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn clamped_bounds_page_and_size() {
        let params = PaginationParams {
            page: 0,
            per_page: 500,
        }
        .clamped();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn parse_amount_accepts_large_values() {
        assert_eq!(
            parse_amount("amount", "340282366920938463463374607431768211455").ok(),
            Some(u128::MAX)
        );
        assert_eq!(parse_amount("amount", " 42 ").ok(), Some(42));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        let Err(err) = parse_amount("paid_value", "-1") else {
            panic!("negative amount must be rejected");
        };
        assert_eq!(err.to_string(), "invalid request: invalid paid_value: -1");
        assert!(parse_amount("amount", "1.5").is_err());
    }
}
