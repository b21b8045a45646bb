//! HTTP routes.
//!
//! ```text
//! GET  /health               liveness + database check
//! POST /api/login            username/password → session token
//! GET  /api/categories       menu sections
//! GET  /api/items            active menu items
//! POST /api/items            (auth) add a menu item
//! PUT  /api/items/{id}       (auth) partial update
//! POST /api/orders           (auth unless ORDERS_REQUIRE_AUTH=false) checkout
//! GET  /api/orders           recent orders, newest first
//! GET  /api/orders/{id}      one order with its lines
//! ```

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod auth;
pub mod catalog;
pub mod health;
pub mod orders;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/login", post(auth::login))
        .route("/categories", get(catalog::list_categories))
        .route("/items", get(catalog::list_items).post(catalog::create_item))
        .route("/items/{id}", put(catalog::update_item))
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route("/orders/{id}", get(orders::get_order));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Parses a path id. Anything that isn't a positive integer can't exist.
pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok().filter(|id| *id > 0)
}
