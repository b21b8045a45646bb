//! # Order Repository
//!
//! The only write path into `orders` and `order_items`.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       create_order()                                    │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    │                                                                    │
//! │    ├── INSERT INTO orders (...)          → order_id = last_insert_rowid │
//! │    │                                                                    │
//! │    ├── INSERT INTO order_items (order_id, line 0)                      │
//! │    ├── INSERT INTO order_items (order_id, line 1)                      │
//! │    └── ...                                                              │
//! │    │                                                                    │
//! │    ├── all Ok  → COMMIT    → caller gets the Order                     │
//! │    └── any Err → ROLLBACK  → zero rows in both tables                  │
//! │                                                                         │
//! │  The order row is always inserted before its lines, and the lines      │
//! │  reuse the id SQLite assigned to it.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders are immutable once committed, so the read methods need no
//! coordination with in-flight checkouts.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, error, info};

use crate::error::{DbError, DbResult};
use tavola_core::{Money, Order, OrderDetail, OrderItem, OrderStatus, PricedCart};

const ORDER_COLUMNS: &str =
    "id, order_type, table_no, total_cents, tax_cents, discount_cents, status, created_at";

/// Everything needed to persist one checkout.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_type: Option<String>,
    pub table_no: Option<String>,
    /// Validated lines; `cart.total` becomes the order total.
    pub cart: PricedCart,
    /// Passed through unchanged.
    pub tax: Money,
    /// Passed through unchanged.
    pub discount: Money,
}

/// Repository for orders and their line items.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists an order and all of its lines atomically.
    ///
    /// ## Returns
    /// * `Ok(Order)` - Committed; every line is stored under `Order::id`
    /// * `Err(DbError)` - Rolled back; nothing was stored
    pub async fn create_order(&self, order: &NewOrder) -> DbResult<Order> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        match insert_order(&mut tx, order).await {
            Ok(created) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

                info!(
                    order_id = created.id,
                    lines = order.cart.lines.len(),
                    total = %created.total,
                    "Order committed"
                );
                Ok(created)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "Order rollback failed");
                }
                error!(error = %err, "Order rolled back");
                Err(err)
            }
        }
    }

    /// Lists the most recent orders, newest first.
    ///
    /// Ids are AUTOINCREMENT and assigned at insert time, so id order is
    /// creation order.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders ORDER BY id DESC LIMIT ?1",
            ORDER_COLUMNS
        );
        let orders = sqlx::query_as::<_, Order>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = orders.len(), limit, "Listed recent orders");
        Ok(orders)
    }

    /// Gets one order header.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS);
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Gets the lines of an order in the order they were submitted.
    pub async fn items_for_order(&self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, item_id, qty, price_cents, notes
            FROM order_items
            WHERE order_id = ?1
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets an order together with its lines.
    pub async fn get_detail(&self, id: i64) -> DbResult<Option<OrderDetail>> {
        let Some(order) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.items_for_order(id).await?;

        Ok(Some(OrderDetail { order, items }))
    }

    /// Number of orders stored.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of order lines stored, across all orders.
    pub async fn count_items(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Runs the inserts of [`OrderRepository::create_order`] on an open
/// transaction. Stops at the first failing statement.
async fn insert_order(tx: &mut Transaction<'_, Sqlite>, order: &NewOrder) -> DbResult<Order> {
    let created_at = Utc::now();
    let status = OrderStatus::Open;
    let total = order.cart.total;

    let result = sqlx::query(
        r#"
        INSERT INTO orders (
            order_type, table_no, total_cents, tax_cents, discount_cents, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&order.order_type)
    .bind(&order.table_no)
    .bind(total)
    .bind(order.tax)
    .bind(order.discount)
    .bind(status)
    .bind(created_at)
    .execute(&mut **tx)
    .await?;

    let order_id = result.last_insert_rowid();
    debug!(order_id, "Order row inserted");

    for line in &order.cart.lines {
        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, item_id, qty, price_cents, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(order_id)
        .bind(line.item_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(&line.notes)
        .execute(&mut **tx)
        .await?;
    }

    Ok(Order {
        id: order_id,
        order_type: order.order_type.clone(),
        table_no: order.table_no.clone(),
        total,
        tax: order.tax,
        discount: order.discount,
        status,
        created_at,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
