//! Order processing.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       OrderService::create_order                        │
//! │                                                                         │
//! │  CreateOrder { lines, tax, discount, ... }                             │
//! │       │                                                                 │
//! │       ├── PricingMode::Client   price_cart(lines)                      │
//! │       └── PricingMode::Catalog  items_by_ids → price_cart_from_catalog │
//! │       │                                                                 │
//! │       │  any rule violation → OrderError::Invalid  (nothing written)   │
//! │       ▼                                                                 │
//! │  OrderRepository::create_order (one transaction)                       │
//! │       │                                                                 │
//! │       ├── Ok  → OrderReceipt { orderId, total }                        │
//! │       └── Err → OrderError::Persistence (rolled back, logged)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{error, info};

use tavola_core::validation::validate_amount;
use tavola_core::{
    price_cart, price_cart_from_catalog, CartLine, CoreError, Money, Order, OrderDetail,
    OrderReceipt, PricedCart,
};
use tavola_db::{Database, DbError, NewOrder};

use crate::config::PricingMode;
use crate::error::ApiError;

/// Order processing errors.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// The cart broke a rule. Nothing was written.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// The store failed. The transaction was rolled back.
    #[error("order persistence failed: {0}")]
    Persistence(#[source] DbError),
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Invalid(core) => ApiError::from(core),
            OrderError::Persistence(db) => ApiError::OrderPersistenceFailure(db),
        }
    }
}

/// A checkout request after JSON intake.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub order_type: Option<String>,
    pub table_no: Option<String>,
    pub lines: Vec<CartLine>,
    pub tax: Money,
    pub discount: Money,
}

/// Validates carts and records orders.
pub struct OrderService {
    db: Database,
    pricing: PricingMode,
}

impl OrderService {
    /// Create a new order service.
    pub fn new(db: Database, pricing: PricingMode) -> Self {
        OrderService { db, pricing }
    }

    /// Validate, price, and persist one order.
    pub async fn create_order(&self, request: CreateOrder) -> Result<OrderReceipt, OrderError> {
        validate_amount("tax", request.tax).map_err(CoreError::from)?;
        validate_amount("discount", request.discount).map_err(CoreError::from)?;

        let cart = self.price(&request.lines).await?;

        let new_order = NewOrder {
            order_type: request.order_type,
            table_no: request.table_no,
            cart,
            tax: request.tax,
            discount: request.discount,
        };

        let order = self
            .db
            .orders()
            .create_order(&new_order)
            .await
            .map_err(|e| {
                error!(error = %e, lines = new_order.cart.lines.len(), "Could not create order");
                OrderError::Persistence(e)
            })?;

        info!(order_id = order.id, total = %order.total, "Order created");

        Ok(OrderReceipt {
            order_id: order.id,
            total: order.total,
        })
    }

    /// Most recent orders, newest first.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<Order>, DbError> {
        self.db.orders().list_recent(limit).await
    }

    /// One order with its lines.
    pub async fn get(&self, id: i64) -> Result<Option<OrderDetail>, DbError> {
        self.db.orders().get_detail(id).await
    }

    async fn price(&self, lines: &[CartLine]) -> Result<PricedCart, OrderError> {
        match self.pricing {
            PricingMode::Client => Ok(price_cart(lines)?),
            PricingMode::Catalog => {
                if lines.is_empty() {
                    return Err(CoreError::EmptyCart.into());
                }

                let mut ids: Vec<i64> = lines.iter().map(|line| line.item_id).collect();
                ids.sort_unstable();
                ids.dedup();

                let catalog = self
                    .db
                    .catalog()
                    .items_by_ids(&ids)
                    .await
                    .map_err(OrderError::Persistence)?;

                Ok(price_cart_from_catalog(lines, &catalog)?)
            }
        }
    }
}
