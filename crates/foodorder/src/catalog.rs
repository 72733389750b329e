//! The menu catalog.
//!
//! Every call reloads the menu document, so admin changes are visible to the
//! next lookup without any cache to invalidate.

use tracing::info;

use crate::error::{Error, Result};
use crate::model::MenuItem;
use crate::storage::{Collection, Store, StoreExt};

/// Read and admin operations over the persisted menu.
#[derive(Debug)]
pub struct Catalog<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> Catalog<'a, S> {
    /// Create a catalog over `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The full menu in file order.
    #[must_use]
    pub fn view(&self) -> Vec<MenuItem> {
        self.store.load(Collection::Menu).into_records()
    }

    /// First item whose id matches `id`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ItemNotFound`] if no item matches.
    pub fn find(&self, id: &str) -> Result<MenuItem> {
        self.view()
            .into_iter()
            .find(|item| item.matches_id(id))
            .ok_or_else(|| Error::item_not_found(id))
    }

    /// Append `item` to the menu. Duplicate ids are not rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrice`] for a negative or non-finite price,
    /// [`Error::UnreadableRecords`] if the stored menu has entries that don't
    /// parse, or an error if the menu can't be saved.
    pub fn add(&self, item: MenuItem) -> Result<()> {
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(Error::invalid_price(item.price.to_string()));
        }

        let mut menu: Vec<MenuItem> = self.store.load_for_update(Collection::Menu)?;
        info!("Adding menu item {} ({})", item.id, item.name);
        menu.push(item);
        self.store.save(Collection::Menu, &menu)
    }

    /// Remove every item whose id matches `id`, ignoring case.
    ///
    /// Returns how many items were removed; zero is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnreadableRecords`] if the stored menu has entries
    /// that don't parse, or an error if the menu can't be saved.
    pub fn remove(&self, id: &str) -> Result<usize> {
        let menu: Vec<MenuItem> = self.store.load_for_update(Collection::Menu)?;
        let before = menu.len();
        let kept: Vec<MenuItem> = menu.into_iter().filter(|item| !item.matches_id(id)).collect();
        let removed = before - kept.len();

        self.store.save(Collection::Menu, &kept)?;
        if removed > 0 {
            info!("Removed {} menu item(s) with id {}", removed, id);
        }
        Ok(removed)
    }
}

/// Parse an admin-entered price.
///
/// # Errors
///
/// Returns [`Error::InvalidPrice`] unless `input` is a finite, non-negative
/// number.
pub fn parse_price(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(Error::invalid_price(trimmed)),
    }
}
