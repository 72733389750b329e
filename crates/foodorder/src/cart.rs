//! The session cart.

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::model::{lines_total, CartLine};
use crate::storage::Store;

/// Ordered lines picked during one session. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look `id` up in `catalog` and append a line for `qty` of it.
    ///
    /// Lines for the same item are kept separate.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ItemNotFound`] and leaves the cart unchanged if
    /// the id isn't on the menu.
    pub fn add_line<S: Store + ?Sized>(
        &mut self,
        catalog: &Catalog<'_, S>,
        id: &str,
        qty: i64,
    ) -> Result<&CartLine> {
        let item = catalog.find(id)?;
        let index = self.lines.len();
        self.lines.push(CartLine::from_item(&item, qty.max(1)));
        debug!("Added {} x{} to cart", item.id, qty);
        Ok(&self.lines[index])
    }

    /// Lines in the order they were added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of `price × qty`, or `None` for an empty cart.
    #[must_use]
    pub fn total(&self) -> Option<f64> {
        if self.lines.is_empty() {
            None
        } else {
            Some(lines_total(&self.lines))
        }
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Parse a quantity prompt.
///
/// Any positive whole number up to `i64::MAX` is taken as is. Blank,
/// non-numeric, zero, negative and out-of-range input all mean 1.
#[must_use]
pub fn parse_quantity(input: &str) -> i64 {
    match input.trim().parse::<i64>() {
        Ok(qty) if qty > 0 => qty,
        _ => 1,
    }
}
