//! # Tavola API
//!
//! HTTP backend for restaurant order terminals.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Tavola API Server                             │
//! │                                                                         │
//! │  Terminal ───► axum (4000) ───► routes ───► services ───► tavola-db   │
//! │                     │                                       (SQLite)    │
//! │                     ▼                                                   │
//! │               AuthUser / SessionVerifier (Bearer JWT)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PORT` - HTTP port (default: 4000)
//! - `DATABASE_PATH` - SQLite file (default: ./tavola.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `JWT_SECRET` - secret for signing session tokens
//! - `SESSION_TTL_HOURS` - session token lifetime (default: 12)
//! - `ORDERS_REQUIRE_AUTH` - gate checkout behind a session (default: true)
//! - `PRICING_MODE` - `client` or `catalog` (default: client)
//! - `ORDER_LIST_LIMIT` - rows returned by GET /api/orders (default: 100)

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
