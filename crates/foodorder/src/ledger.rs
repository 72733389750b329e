//! The order ledger.
//!
//! Orders are only ever appended. Ids are `O` plus the checkout time to the
//! second, so two checkouts inside the same second share an id; the ledger
//! logs the collision and keeps both orders.

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::cart::Cart;
use crate::error::{Error, Result};
use crate::model::{lines_total, Order};
use crate::storage::{Collection, Store, StoreExt};

/// `strftime` pattern for the timestamp part of an order id.
pub const ORDER_ID_FORMAT: &str = "%Y%m%d%H%M%S";

/// `strftime` pattern for an order's `time` field.
pub const ORDER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Order id for a checkout at `at`.
#[must_use]
pub fn order_id(at: NaiveDateTime) -> String {
    format!("O{}", at.format(ORDER_ID_FORMAT))
}

/// Append and list operations over the persisted orders.
#[derive(Debug)]
pub struct Ledger<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> Ledger<'a, S> {
    /// Create a ledger over `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All orders, oldest first.
    #[must_use]
    pub fn list(&self) -> Vec<Order> {
        self.store.load(Collection::Orders).into_records()
    }

    /// Place an order for everything in `cart` at the current local time.
    ///
    /// # Errors
    ///
    /// See [`Ledger::checkout_at`].
    pub fn checkout(&self, cart: &mut Cart, customer: &str) -> Result<Order> {
        self.checkout_at(cart, customer, Local::now().naive_local())
    }

    /// Place an order for everything in `cart`, timestamped `at`.
    ///
    /// On success the order is appended to the ledger and the cart is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCart`] without touching storage if the cart is
    /// empty, [`Error::UnreadableRecords`] if the stored ledger has orders
    /// that don't parse, or a storage error if the ledger can't be saved.
    /// The cart is kept in every case.
    pub fn checkout_at(&self, cart: &mut Cart, customer: &str, at: NaiveDateTime) -> Result<Order> {
        if cart.is_empty() {
            return Err(Error::EmptyCart);
        }

        let mut orders: Vec<Order> = self.store.load_for_update(Collection::Orders)?;
        let items = cart.lines().to_vec();
        let order = Order {
            order_id: order_id(at),
            customer: customer.to_string(),
            total: lines_total(&items),
            items,
            time: at.format(ORDER_TIME_FORMAT).to_string(),
        };

        if orders.iter().any(|existing| existing.order_id == order.order_id) {
            warn!("Order id {} already exists in the ledger", order.order_id);
        }

        orders.push(order.clone());
        self.store.save(Collection::Orders, &orders)?;
        cart.clear();

        info!(
            "Placed order {} for {:?} ({} lines, total {})",
            order.order_id,
            order.customer,
            order.items.len(),
            order.total
        );
        Ok(order)
    }
}
