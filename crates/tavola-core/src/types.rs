//! # Domain Types
//!
//! Core domain types used throughout Tavola POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Order       │   │   OrderItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (store)     │   │  order_id (FK)  │       │
//! │  │  username       │   │  order_type     │   │  item_id  (FK)  │       │
//! │  │  password_hash  │   │  total (cents)  │   │  qty            │       │
//! │  │  role           │   │  status = open  │   │  price snapshot │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    MenuItem     │   │      Role       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  name, price    │   │  Manager        │       │
//! │  │  position       │   │  active         │   │  Cashier        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Ids are INTEGER keys assigned by the store. Order ids are monotonic
//! (AUTOINCREMENT) so terminals can use them as ticket numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// Staff role, carried in session token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can manage the menu and staff.
    Manager,
    /// Takes orders at the counter or table.
    Cashier,
}

impl Role {
    /// Returns the lowercase name stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Cashier => "cashier",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Cashier
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Role::Manager),
            "cashier" => Ok(Role::Cashier),
            other => Err(ValidationError::InvalidFormat {
                field: "role".to_string(),
                reason: format!("unknown role '{}'", other),
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A staff account. Read-only to the order core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    /// Display name shown on the terminal.
    pub name: String,
    pub username: String,
    /// PHC-format Argon2 hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Returns the public part of the account.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// What the terminal learns about the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub role: Role,
}

// =============================================================================
// Catalog
// =============================================================================

/// A menu section (Main, Sides, Drinks...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Sort key on the menu screen (ascending).
    pub position: i64,
}

/// A sellable menu item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    #[ts(type = "string")]
    pub price: Money,
    pub category_id: Option<i64>,
    /// Inactive items are hidden from the menu (soft delete).
    pub active: bool,
}

/// Fields for creating a menu item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMenuItem {
    pub name: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub price: Money,
    pub category_id: Option<i64>,
}

/// Partial update of a menu item. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[ts(type = "string | null")]
    pub price: Option<Money>,
    pub category_id: Option<i64>,
    pub active: Option<bool>,
}

impl MenuItemPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category_id.is_none()
            && self.active.is_none()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// Only `Open` is ever written by this system; later transitions belong to
/// payment/fulfillment, which live elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order taken, not yet settled.
    Open,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Open
    }
}

// =============================================================================
// Order
// =============================================================================

/// A durable order header.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    /// Free-form tag such as "dinein" or "takeaway".
    pub order_type: Option<String>,
    pub table_no: Option<String>,
    /// Σ price × qty over the order's items, computed server-side.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "total_cents"))]
    #[ts(type = "string")]
    pub total: Money,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "tax_cents"))]
    #[ts(type = "string")]
    pub tax: Money,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "discount_cents"))]
    #[ts(type = "string")]
    pub discount: Money,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item of an order.
/// Uses snapshot pattern: `price` is frozen at order time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub item_id: i64,
    #[serde(rename = "qty")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "qty"))]
    pub quantity: i64,
    /// Unit price at time of order (frozen).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    #[ts(type = "string")]
    pub price: Money,
    pub notes: Option<String>,
}

impl OrderItem {
    /// Returns price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// An order together with its line items.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// What a successful checkout returns to the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderReceipt {
    pub order_id: i64,
    #[ts(type = "string")]
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!(Role::Cashier.to_string(), "cashier");
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::default(), Role::Cashier);
    }

    #[test]
    fn test_order_status_default() {
        assert_eq!(OrderStatus::default(), OrderStatus::Open);
        assert_eq!(serde_json::to_string(&OrderStatus::Open).unwrap(), "\"open\"");
    }

    #[test]
    fn test_user_summary_hides_hash() {
        let user = User {
            id: 1,
            name: "Admin".to_string(),
            username: "admin".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Manager,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());

        let summary = user.summary();
        assert_eq!(summary.username, "admin");
        assert_eq!(summary.role, Role::Manager);
    }

    #[test]
    fn test_order_item_wire_names() {
        let item = OrderItem {
            id: 7,
            order_id: 3,
            item_id: 1,
            quantity: 2,
            price: Money::from_cents(9900),
            notes: None,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["qty"], 2);
        assert_eq!(json["price"], "99.00");
        assert_eq!(item.line_total(), Money::from_cents(19_800));
    }

    #[test]
    fn test_receipt_is_camel_case() {
        let receipt = OrderReceipt {
            order_id: 12,
            total: Money::from_cents(32_700),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["orderId"], 12);
        assert_eq!(json["total"], "327.00");
    }

    #[test]
    fn test_menu_item_patch_is_empty() {
        assert!(MenuItemPatch::default().is_empty());
        let patch = MenuItemPatch {
            active: Some(false),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
