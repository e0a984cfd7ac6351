//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

use anyhow::Context;

use crate::domain::Address;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// The ledger's own account: deposit destination and purchase source.
    pub ledger_account: Address,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Per-request timeout applied by the HTTP stack.
    pub request_timeout_secs: u64,

    /// Asset contracts pools may be created for. `None` accepts any asset.
    pub allowed_assets: Option<Vec<Address>>,

    /// Starting balance of every asset for every non-custody holder in the
    /// in-memory asset gateway.
    pub sandbox_initial_balance: u128,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` cannot be parsed as a
    /// [`SocketAddr`], or if `LEDGER_ACCOUNT` or an `ALLOWED_ASSETS` entry
    /// is not a valid address.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("LISTEN_ADDR is not a socket address")?;

        let ledger_account = Address::parse(
            &std::env::var("LEDGER_ACCOUNT").unwrap_or_else(|_| "poola-ledger".to_string()),
        )
        .context("LEDGER_ACCOUNT is not a valid address")?;

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 10_000);
        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30);
        let sandbox_initial_balance = parse_env("SANDBOX_INITIAL_BALANCE", 0);

        let allowed_assets = match std::env::var("ALLOWED_ASSETS") {
            Ok(raw) => parse_address_list(&raw).context("ALLOWED_ASSETS holds an invalid address")?,
            Err(_) => None,
        };

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            ledger_account,
            event_bus_capacity,
            request_timeout_secs,
            allowed_assets,
            sandbox_initial_balance,
            log_format,
        })
    }
}

/// Parses a comma-separated address list. An empty or blank list means
/// "no restriction".
fn parse_address_list(raw: &str) -> Result<Option<Vec<Address>>, crate::error::LedgerError> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if entries.is_empty() {
        return Ok(None);
    }
    entries
        .into_iter()
        .map(Address::parse)
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
