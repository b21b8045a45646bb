//! # Cart Module
//!
//! Turns a client-submitted cart into priced lines and a server-computed
//! total.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Pricing                                    │
//! │                                                                         │
//! │  JSON body "items"                                                     │
//! │       │  lines_from_json()   not an array / empty → EmptyCart          │
//! │       ▼                                                                 │
//! │  Vec<CartLine>  (raw: qty may be absent, price is text)                │
//! │       │                                                                 │
//! │       ├── price_cart()            client price trusted verbatim        │
//! │       └── price_cart_from_catalog() price re-read from menu items      │
//! │       ▼                                                                 │
//! │  PricedCart { lines, total = Σ unit_price × quantity }                 │
//! │                                                                         │
//! │  All arithmetic is integer cents with overflow checks.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::MenuItem;
use crate::validation::{
    validate_amount, validate_cart_size, validate_item_id, validate_notes, validate_quantity,
};
use crate::MAX_CART_LINES;

// =============================================================================
// Cart Line
// =============================================================================

/// One line of a submitted cart, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: i64,
    /// `None` (or zero) means one unit.
    pub quantity: Option<i64>,
    /// Unit price exactly as the client sent it.
    pub unit_price: Option<String>,
    pub notes: Option<String>,
}

impl CartLine {
    /// Creates a line with a client-supplied price.
    pub fn new(item_id: i64, quantity: Option<i64>, unit_price: impl Into<String>) -> Self {
        Self {
            item_id,
            quantity,
            unit_price: Some(unit_price.into()),
            notes: None,
        }
    }

    /// Adds a kitchen note.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Quantity after defaulting: absent or zero becomes 1.
    pub fn effective_quantity(&self) -> i64 {
        match self.quantity {
            None | Some(0) => 1,
            Some(qty) => qty,
        }
    }
}

/// A validated line with its price fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    pub item_id: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
    pub notes: Option<String>,
}

/// A validated cart ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub total: Money,
}

// =============================================================================
// JSON Intake
// =============================================================================

/// Reads cart lines out of the `items` value of an order request.
///
/// Lenient the way terminals expect: `qty` may be missing, `null`, `false`
/// or `0` (all meaning one unit) and `price` may be a JSON string or number.
///
/// ## Errors
/// - `EmptyCart` when `items` is missing, not an array, or empty
/// - `InvalidLine` when an element is not an object or has a bad field
pub fn lines_from_json(items: Option<&Value>) -> CoreResult<Vec<CartLine>> {
    let array = match items {
        Some(Value::Array(array)) if !array.is_empty() => array,
        _ => return Err(CoreError::EmptyCart),
    };

    if array.len() > MAX_CART_LINES {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_LINES,
        });
    }

    array
        .iter()
        .enumerate()
        .map(|(index, value)| {
            line_from_json(value).map_err(|source| CoreError::InvalidLine { index, source })
        })
        .collect()
}

fn line_from_json(value: &Value) -> Result<CartLine, ValidationError> {
    let object = value.as_object().ok_or_else(|| ValidationError::InvalidFormat {
        field: "item".to_string(),
        reason: "expected an object".to_string(),
    })?;

    let item_id = match object.get("item_id") {
        Some(Value::Number(n)) => n.as_i64().ok_or_else(|| invalid("item_id", "not an integer"))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid("item_id", "not an integer"))?,
        None | Some(Value::Null) => {
            return Err(ValidationError::Required {
                field: "item_id".to_string(),
            })
        }
        Some(_) => return Err(invalid("item_id", "not an integer")),
    };

    let quantity = match object.get("qty") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::Number(n)) => Some(n.as_i64().ok_or_else(|| invalid("qty", "not an integer"))?),
        Some(_) => return Err(invalid("qty", "not an integer")),
    };

    let unit_price = match object.get("price") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(_) => return Err(invalid("price", "expected a decimal amount")),
    };

    let notes = match object.get("notes") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(invalid("notes", "expected text")),
    };

    Ok(CartLine {
        item_id,
        quantity,
        unit_price,
        notes,
    })
}

fn invalid(field: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices a cart using the unit prices the client submitted.
///
/// ## Example
/// ```rust
/// use tavola_core::cart::{price_cart, CartLine};
///
/// let priced = price_cart(&[CartLine::new(3, Some(3), "69.00")]).unwrap();
/// assert_eq!(priced.total.to_string(), "207.00");
/// ```
pub fn price_cart(lines: &[CartLine]) -> CoreResult<PricedCart> {
    price_lines(lines, |index, line| {
        let raw = line
            .unit_price
            .as_deref()
            .ok_or_else(|| CoreError::InvalidLine {
                index,
                source: ValidationError::Required {
                    field: "price".to_string(),
                },
            })?;
        Money::parse(raw).map_err(|source| CoreError::InvalidLine { index, source })
    })
}

/// Prices a cart from the menu, ignoring any client-sent price.
///
/// `catalog` must contain every item referenced by the cart. Items missing
/// from it fail with `UnknownItem`, inactive ones with `ItemUnavailable`.
pub fn price_cart_from_catalog(lines: &[CartLine], catalog: &[MenuItem]) -> CoreResult<PricedCart> {
    let by_id: HashMap<i64, &MenuItem> = catalog.iter().map(|item| (item.id, item)).collect();

    price_lines(lines, |_, line| match by_id.get(&line.item_id) {
        None => Err(CoreError::UnknownItem(line.item_id)),
        Some(item) if !item.active => Err(CoreError::ItemUnavailable(line.item_id)),
        Some(item) => Ok(item.price),
    })
}

fn price_lines<F>(lines: &[CartLine], mut unit_price: F) -> CoreResult<PricedCart>
where
    F: FnMut(usize, &CartLine) -> CoreResult<Money>,
{
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    if validate_cart_size(lines.len()).is_err() {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_LINES,
        });
    }

    let mut priced = Vec::with_capacity(lines.len());
    let mut total = Money::zero();

    for (index, line) in lines.iter().enumerate() {
        let at = |source| CoreError::InvalidLine { index, source };

        validate_item_id(line.item_id).map_err(at)?;
        let quantity = line.effective_quantity();
        validate_quantity(quantity).map_err(at)?;
        if let Some(notes) = &line.notes {
            validate_notes(notes).map_err(at)?;
        }

        let price = unit_price(index, line)?;
        validate_amount("price", price).map_err(at)?;

        let line_total = price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| at(overflow()))?;
        total = total.checked_add(line_total).ok_or_else(|| at(overflow()))?;

        priced.push(PricedLine {
            item_id: line.item_id,
            quantity,
            unit_price: price,
            line_total,
            notes: line.notes.clone(),
        });
    }

    Ok(PricedCart {
        lines: priced,
        total,
    })
}

fn overflow() -> ValidationError {
    ValidationError::OutOfRange {
        field: "total".to_string(),
        min: 0,
        max: i64::MAX,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
