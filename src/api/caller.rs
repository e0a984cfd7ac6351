//! Caller identity extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::Address;
use crate::error::GatewayError;

/// Header naming the account on whose behalf a request acts.
pub const CALLER_HEADER: &str = "x-account-id";

/// Account issuing the request, taken from the [`CALLER_HEADER`] header.
#[derive(Debug, Clone)]
pub struct Caller(pub Address);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or(GatewayError::MissingCaller)?;
        let raw = value.to_str().map_err(|_| {
            GatewayError::InvalidRequest(format!("{CALLER_HEADER} is not valid ASCII"))
        })?;
        Ok(Self(Address::parse(raw)?))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(header: Option<&str>) -> Result<Caller, GatewayError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(CALLER_HEADER, value);
        }
        let Ok(request) = builder.body(()) else {
            panic!("valid request");
        };
        let (mut parts, ()) = request.into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_and_normalizes_header() {
        let Ok(Caller(address)) = extract(Some("0xABC")).await else {
            panic!("caller expected");
        };
        assert_eq!(address.as_str(), "0xabc");
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        assert!(matches!(
            extract(None).await,
            Err(GatewayError::MissingCaller)
        ));
    }

    #[tokio::test]
    async fn blank_header_is_rejected() {
        assert!(matches!(
            extract(Some("  ")).await,
            Err(GatewayError::Ledger(_))
        ));
    }
}
