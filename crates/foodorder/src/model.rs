//! Core record types for foodorder.
//!
//! These are the shapes persisted in the menu and orders documents and the
//! lines held in a session cart.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Case-insensitive key used for lookups.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unit price, never negative.
    #[serde(with = "amount")]
    pub price: f64,
}

impl MenuItem {
    /// Create a menu item.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// Whether this item's id matches `id`, ignoring case.
    #[must_use]
    pub fn matches_id(&self, id: &str) -> bool {
        self.id.to_lowercase() == id.to_lowercase()
    }
}

/// The menu written on first use.
#[must_use]
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new("M1", "Burger", 80.0),
        MenuItem::new("M2", "Pizza", 250.0),
        MenuItem::new("M3", "Pasta", 150.0),
    ]
}

/// One line in a cart, and later in an order.
///
/// Name and price are copied from the menu when the line is created and are
/// not refreshed afterwards. Persisted lines are read leniently: missing
/// fields default, and a zero or negative `qty` written by older tools is
/// kept as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartLine {
    /// Menu id of the item.
    pub id: String,
    /// Name at the time the line was added.
    pub name: String,
    /// Unit price at the time the line was added.
    #[serde(with = "amount")]
    pub price: f64,
    /// Quantity. Lines built by a cart always hold at least 1.
    pub qty: i64,
}

impl CartLine {
    /// Snapshot `item` into a new line.
    #[must_use]
    pub fn from_item(item: &MenuItem, qty: i64) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            qty,
        }
    }

    /// `price × qty`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn amount(&self) -> f64 {
        self.price * self.qty as f64
    }
}

/// Sum of line amounts.
#[must_use]
pub fn lines_total(lines: &[CartLine]) -> f64 {
    lines.iter().map(CartLine::amount).sum()
}

/// A placed order.
///
/// Missing fields in a persisted record fall back to empty values so a single
/// hand-edited entry doesn't make the whole ledger unreadable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// `O` followed by the checkout time at second resolution.
    pub order_id: String,
    /// Free-text customer name, may be empty.
    pub customer: String,
    /// Cart lines as they were at checkout.
    pub items: Vec<CartLine>,
    /// Sum of `price × qty` over `items`, fixed at checkout.
    #[serde(with = "amount")]
    pub total: f64,
    /// ISO-8601 local timestamp of the checkout.
    pub time: String,
}

/// Formats an amount the way it is persisted: integral values without a
/// fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(pub f64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match amount::as_integer(self.0) {
            Some(whole) => write!(f, "{whole}"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Serde adapter that writes whole amounts as JSON integers.
pub(crate) mod amount {
    use serde::{Deserialize, Deserializer, Serializer};

    // 2^53: beyond this not every integer is representable as f64.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub(crate) fn as_integer(value: f64) -> Option<i64> {
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
            Some(value as i64)
        } else {
            None
        }
    }

    pub(crate) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        match as_integer(*value) {
            Some(whole) => serializer.serialize_i64(whole),
            None => serializer.serialize_f64(*value),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        f64::deserialize(deserializer)
    }
}
