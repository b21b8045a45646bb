//! # Catalog Repository
//!
//! Menu categories and items.
//!
//! ## Soft Delete
//! Items are never deleted: order_items keep referencing them. Taking an
//! item off the menu sets `active = 0`, which hides it from
//! [`CatalogRepository::list_active_items`] but keeps old orders intact.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use tavola_core::{Category, MenuItem, MenuItemPatch, NewMenuItem};

const ITEM_COLUMNS: &str = "id, name, description, price_cents, category_id, active";

/// Repository for the menu catalog.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Lists all categories in menu order.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, position FROM categories ORDER BY position, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Inserts a category and returns its id.
    pub async fn insert_category(&self, name: &str, position: i64) -> DbResult<i64> {
        debug!(name = %name, position, "Inserting category");

        let result = sqlx::query("INSERT INTO categories (name, position) VALUES (?1, ?2)")
            .bind(name)
            .bind(position)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Number of categories (used by the seed binary).
    pub async fn count_categories(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Lists items currently on the menu, alphabetically.
    pub async fn list_active_items(&self) -> DbResult<Vec<MenuItem>> {
        let sql = format!(
            "SELECT {} FROM items WHERE active = 1 ORDER BY name, id",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, MenuItem>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), "Listed active items");
        Ok(items)
    }

    /// Gets an item by id, active or not.
    pub async fn get_item(&self, id: i64) -> DbResult<Option<MenuItem>> {
        let sql = format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS);
        let item = sqlx::query_as::<_, MenuItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Gets every item whose id is in `ids`, active or not.
    ///
    /// Ids with no row are simply absent from the result.
    pub async fn items_by_ids(&self, ids: &[i64]) -> DbResult<Vec<MenuItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM items WHERE id IN (", ITEM_COLUMNS));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let items = builder
            .build_query_as::<MenuItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Adds an item to the menu. New items start active.
    pub async fn create_item(&self, item: &NewMenuItem) -> DbResult<MenuItem> {
        debug!(name = %item.name, price = %item.price, "Creating menu item");

        let result = sqlx::query(
            r#"
            INSERT INTO items (name, description, price_cents, category_id, active)
            VALUES (?1, ?2, ?3, ?4, 1)
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.category_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_item(id)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Applies a partial update.
    ///
    /// ## Returns
    /// * `Ok(Some(item))` - The item after the update
    /// * `Ok(None)` - No item with that id
    pub async fn update_item(&self, id: i64, patch: &MenuItemPatch) -> DbResult<Option<MenuItem>> {
        debug!(id, "Updating menu item");

        let result = sqlx::query(
            r#"
            UPDATE items SET
                name        = COALESCE(?1, name),
                description = COALESCE(?2, description),
                price_cents = COALESCE(?3, price_cents),
                category_id = COALESCE(?4, category_id),
                active      = COALESCE(?5, active)
            WHERE id = ?6
            "#,
        )
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.price)
        .bind(patch.category_id)
        .bind(patch.active)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_item(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
