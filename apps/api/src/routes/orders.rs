//! Order handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use tavola_core::cart::lines_from_json;
use tavola_core::{Money, Order, OrderDetail, OrderReceipt};

use crate::error::{ApiError, ApiResult};
use crate::middleware::verify_headers;
use crate::routes::parse_id;
use crate::services::order_service::CreateOrder;
use crate::state::AppState;

/// Body of `POST /api/orders`.
///
/// `items` stays untyped so a missing or malformed cart is reported as an
/// empty cart instead of a JSON error.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub table_no: Option<Value>,
    #[serde(default)]
    pub items: Option<Value>,
    #[serde(default)]
    pub tax: Option<Money>,
    #[serde(default)]
    pub discount: Option<Money>,
}

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<Json<OrderReceipt>> {
    if state.config.orders_require_auth {
        let who = verify_headers(&state, &headers)?;
        debug!(user_id = who.user_id, "Checkout by authenticated user");
    }

    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let lines = lines_from_json(request.items.as_ref())?;

    let receipt = state
        .orders
        .create_order(CreateOrder {
            order_type: request.order_type,
            table_no: table_no_text(request.table_no)?,
            lines,
            tax: request.tax.unwrap_or_default(),
            discount: request.discount.unwrap_or_default(),
        })
        .await?;

    Ok(Json(receipt))
}

/// `GET /api/orders`
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    let orders = state
        .orders
        .list_recent(state.config.order_list_limit)
        .await?;

    Ok(Json(orders))
}

/// `GET /api/orders/{id}`
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OrderDetail>> {
    let id = parse_id(&id).ok_or(ApiError::NotFound)?;

    let detail = state.orders.get(id).await?.ok_or(ApiError::NotFound)?;

    Ok(Json(detail))
}

/// Terminals send table numbers as text ("T4") or bare numbers (4).
fn table_no_text(value: Option<Value>) -> ApiResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(ApiError::BadRequest(
            "table_no must be text or a number".to_string(),
        )),
    }
}
