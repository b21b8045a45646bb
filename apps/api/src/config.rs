//! API server configuration module.
//!
//! Configuration is loaded once at startup from environment variables (and
//! an optional `.env` file in development) with fallback to defaults. The
//! resulting [`ApiConfig`] is passed explicitly to the components that need
//! it; nothing reads the environment after startup.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

use tavola_core::{DEFAULT_SESSION_TTL_HOURS, RECENT_ORDERS_LIMIT};

/// Signing secret used when `JWT_SECRET` is not set. Development only.
pub const DEV_JWT_SECRET: &str = "tavola-dev-secret-change-in-production";

/// Where unit prices of a new order come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// Trust the price the terminal sent.
    Client,
    /// Re-read each price from the active menu item.
    Catalog,
}

impl FromStr for PricingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(PricingMode::Client),
            "catalog" => Ok(PricingMode::Catalog),
            _ => Err(ConfigError::InvalidValue("PRICING_MODE".to_string())),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Connection pool size
    pub db_max_connections: u32,

    /// HS256 secret for session tokens
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Session token lifetime in hours
    pub session_ttl_hours: i64,

    /// Whether POST /api/orders needs a valid session token
    pub orders_require_auth: bool,

    pub pricing_mode: PricingMode,

    /// Maximum rows returned by GET /api/orders
    pub order_list_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            port: 4000,
            database_path: PathBuf::from("./tavola.db"),
            db_max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            orders_require_auth: true,
            pricing_mode: PricingMode::Client,
            order_list_limit: RECENT_ORDERS_LIMIT,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("JWT_SECRET not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let config = ApiConfig {
            port: parse_or(&lookup, "PORT", defaults.port)?,

            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            db_max_connections: parse_or(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,

            jwt_secret,

            session_ttl_hours: parse_or(&lookup, "SESSION_TTL_HOURS", defaults.session_ttl_hours)?,

            orders_require_auth: parse_or(
                &lookup,
                "ORDERS_REQUIRE_AUTH",
                defaults.orders_require_auth,
            )?,

            pricing_mode: parse_or(&lookup, "PRICING_MODE", defaults.pricing_mode)?,

            order_list_limit: parse_or(&lookup, "ORDER_LIST_LIMIT", defaults.order_list_limit)?,
        };

        if config.session_ttl_hours <= 0 {
            return Err(ConfigError::InvalidValue("SESSION_TTL_HOURS".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if config.order_list_limit == 0 {
            return Err(ConfigError::InvalidValue("ORDER_LIST_LIMIT".to_string()));
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
