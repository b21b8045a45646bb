//! Menu handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use tavola_core::validation::{validate_amount, validate_item_name};
use tavola_core::{Category, MenuItem, MenuItemPatch, NewMenuItem};
use tavola_db::DbError;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::routes::parse_id;
use crate::state::AppState;

/// `GET /api/categories`
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.catalog().list_categories().await?))
}

/// `GET /api/items`
pub async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.db.catalog().list_active_items().await?))
}

/// `POST /api/items`
pub async fn create_item(
    AuthUser(who): AuthUser,
    State(state): State<AppState>,
    body: Result<Json<NewMenuItem>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(item) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    validate_item_name(&item.name).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validate_amount("price", item.price).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let created = state
        .db
        .catalog()
        .create_item(&item)
        .await
        .map_err(write_error)?;

    info!(item_id = created.id, user_id = who.user_id, "Menu item created");
    Ok(Json(json!({ "id": created.id })))
}

/// `PUT /api/items/{id}`
pub async fn update_item(
    AuthUser(who): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<MenuItemPatch>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(&id).ok_or(ApiError::NotFound)?;
    let Json(patch) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if let Some(name) = &patch.name {
        validate_item_name(name).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    }
    if let Some(price) = patch.price {
        validate_amount("price", price).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    }

    let updated = state
        .db
        .catalog()
        .update_item(id, &patch)
        .await
        .map_err(write_error)?;

    if updated.is_none() {
        return Err(ApiError::NotFound);
    }

    info!(item_id = id, user_id = who.user_id, "Menu item updated");
    Ok(Json(json!({ "ok": true })))
}

/// The only foreign key on `items` is `category_id`.
fn write_error(err: DbError) -> ApiError {
    match err {
        DbError::ForeignKeyViolation { .. } => {
            ApiError::BadRequest("unknown category".to_string())
        }
        other => ApiError::from(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_write_error_only_maps_foreign_keys() {
        let fk = write_error(DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string(),
        });
        assert_eq!(fk.status(), StatusCode::BAD_REQUEST);
        assert_eq!(fk.public_message(), "unknown category");

        let check = write_error(DbError::ConstraintViolation {
            message: "CHECK constraint failed: price_cents >= 0".to_string(),
        });
        assert_eq!(check.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(check.public_message(), "unknown category");

        let dup = write_error(DbError::duplicate("items.name", "Fries"));
        assert_ne!(dup.public_message(), "unknown category");
    }
}
