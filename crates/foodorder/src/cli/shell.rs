//! The interactive ordering loop.
//!
//! A [`Session`] owns the cart for as long as it runs. Every selection loads
//! what it needs from the store, so nothing else carries over between
//! selections.

use std::io::{BufRead, Write};

use tracing::{debug, error};

use crate::cart::{parse_quantity, Cart};
use crate::catalog::{parse_price, Catalog};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::model::{Amount, MenuItem};
use crate::report::{today, Reports};
use crate::storage::Store;

/// The numbered menu shown before every selection.
pub const MENU_TEXT: &str = "
Food Ordering System
1. View menu
2. Add to cart
3. View cart
4. Checkout
5. View orders
6. Daily sales
7. Admin add item
8. Admin remove item
9. Export orders CSV
10. Exit
Choose (1-10): ";

/// A selection from the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// 1
    ViewMenu,
    /// 2
    AddToCart,
    /// 3
    ViewCart,
    /// 4
    Checkout,
    /// 5
    ViewOrders,
    /// 6
    DailySales,
    /// 7
    AdminAddItem,
    /// 8
    AdminRemoveItem,
    /// 9
    ExportCsv,
    /// 10
    Exit,
}

impl MenuChoice {
    /// Parse a trimmed selection; anything other than `1`..=`10` is `None`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let choice = match input {
            "1" => Self::ViewMenu,
            "2" => Self::AddToCart,
            "3" => Self::ViewCart,
            "4" => Self::Checkout,
            "5" => Self::ViewOrders,
            "6" => Self::DailySales,
            "7" => Self::AdminAddItem,
            "8" => Self::AdminRemoveItem,
            "9" => Self::ExportCsv,
            "10" => Self::Exit,
            _ => return None,
        };
        Some(choice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// One interactive session over a store.
#[derive(Debug)]
pub struct Session<'a, S: Store + ?Sized, R, W> {
    store: &'a S,
    config: &'a Config,
    cart: Cart,
    input: R,
    output: W,
}

impl<'a, S, R, W> Session<'a, S, R, W>
where
    S: Store + ?Sized,
    R: BufRead,
    W: Write,
{
    /// Start a session with an empty cart.
    pub fn new(store: &'a S, config: &'a Config, input: R, output: W) -> Self {
        Self {
            store,
            config,
            cart: Cart::new(),
            input,
            output,
        }
    }

    /// The session's cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Consume the session, returning its output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the user picks Exit or input ends.
    ///
    /// Operation failures are reported to the user and the loop carries on.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input or writing output fails.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let Some(selection) = self.prompt(MENU_TEXT)? else {
                self.goodbye()?;
                return Ok(());
            };

            let Some(choice) = MenuChoice::parse(&selection) else {
                self.say("Invalid choice. Please try again.")?;
                continue;
            };

            debug!("Menu selection {:?}", choice);
            if self.dispatch(choice)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Flow> {
        match choice {
            MenuChoice::ViewMenu => self.view_menu(),
            MenuChoice::AddToCart => self.add_to_cart(),
            MenuChoice::ViewCart => self.view_cart(),
            MenuChoice::Checkout => self.checkout(),
            MenuChoice::ViewOrders => self.view_orders(),
            MenuChoice::DailySales => self.daily_sales(),
            MenuChoice::AdminAddItem => self.admin_add_item(),
            MenuChoice::AdminRemoveItem => self.admin_remove_item(),
            MenuChoice::ExportCsv => self.export_csv(),
            MenuChoice::Exit => self.goodbye(),
        }
    }

    fn view_menu(&mut self) -> Result<Flow> {
        let menu = Catalog::new(self.store).view();
        self.say("\n--- MENU ---")?;
        for item in &menu {
            let line = format!(
                "{}: {} - {} {}",
                item.id,
                item.name,
                self.currency(),
                Amount(item.price)
            );
            self.say(&line)?;
        }
        Ok(Flow::Continue)
    }

    fn add_to_cart(&mut self) -> Result<Flow> {
        let Some(id) = self.prompt("Enter item ID: ")? else {
            return self.goodbye();
        };
        let Some(qty) = self.prompt("Quantity: ")? else {
            return self.goodbye();
        };

        let catalog = Catalog::new(self.store);
        let added = self
            .cart
            .add_line(&catalog, &id, parse_quantity(&qty))
            .map(|_| ());
        match added {
            Ok(()) => self.say("Item added to cart!")?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn view_cart(&mut self) -> Result<Flow> {
        let Some(total) = self.cart.total() else {
            self.say("Your cart is empty.")?;
            return Ok(Flow::Continue);
        };

        let currency = self.currency().to_string();
        let rows: Vec<String> = self
            .cart
            .lines()
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                format!(
                    "{}. {} x{} = {} {}",
                    idx + 1,
                    line.name,
                    line.qty,
                    currency,
                    Amount(line.amount())
                )
            })
            .collect();

        self.say("\n--- YOUR CART ---")?;
        for row in &rows {
            self.say(row)?;
        }
        self.say(&format!("Total = {currency} {}", Amount(total)))?;
        Ok(Flow::Continue)
    }

    fn checkout(&mut self) -> Result<Flow> {
        let Some(customer) = self.prompt("Customer name: ")? else {
            return self.goodbye();
        };

        match Ledger::new(self.store).checkout(&mut self.cart, &customer) {
            Ok(order) => {
                let message = format!(
                    "Order placed! ID: {} | Total: {} {}",
                    order.order_id,
                    self.currency(),
                    Amount(order.total)
                );
                self.say(&message)?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn view_orders(&mut self) -> Result<Flow> {
        let orders = Ledger::new(self.store).list();
        if orders.is_empty() {
            self.say("No orders found.")?;
            return Ok(Flow::Continue);
        }

        for order in &orders {
            let line = format!(
                "{} | {} | {} {} | {}",
                order.order_id,
                order.customer,
                self.currency(),
                Amount(order.total),
                order.time
            );
            self.say(&line)?;
        }
        Ok(Flow::Continue)
    }

    fn daily_sales(&mut self) -> Result<Flow> {
        let total = Reports::new(self.store).daily_sales(&today());
        let line = format!("Today's sales: {} {}", self.currency(), Amount(total));
        self.say(&line)?;
        Ok(Flow::Continue)
    }

    fn admin_add_item(&mut self) -> Result<Flow> {
        let Some(id) = self.prompt("Enter new item ID (e.g., M4): ")? else {
            return self.goodbye();
        };
        let Some(name) = self.prompt("Enter item name: ")? else {
            return self.goodbye();
        };
        let Some(price) = self.prompt("Enter price: ")? else {
            return self.goodbye();
        };

        let catalog = Catalog::new(self.store);
        let added = parse_price(&price).and_then(|price| catalog.add(MenuItem::new(id, name, price)));
        match added {
            Ok(()) => self.say("Item added successfully!")?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn admin_remove_item(&mut self) -> Result<Flow> {
        let Some(id) = self.prompt("Enter item ID to remove: ")? else {
            return self.goodbye();
        };

        match Catalog::new(self.store).remove(&id) {
            Ok(_) => self.say("Item removed (if it existed).")?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn export_csv(&mut self) -> Result<Flow> {
        let path = self.config.export.path.clone();
        match Reports::new(self.store).export_csv(&path) {
            Ok(_) => self.say(&format!("Orders exported to {}", path.display()))?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    /// Tell the user an operation failed.
    fn report(&mut self, err: &Error) -> Result<()> {
        let message = match err {
            Error::ItemNotFound { .. } => "Item not found!".to_string(),
            Error::InvalidPrice { .. } => "Invalid price!".to_string(),
            Error::EmptyCart => "Cart is empty!".to_string(),
            Error::Export { source, .. } => format!("Failed to export CSV: {source}"),
            other => {
                error!("Operation failed: {}", other);
                format!("Error: {other}")
            }
        };
        self.say(&message)
    }

    /// Sign off. Running out of input at any prompt ends up here too.
    fn goodbye(&mut self) -> Result<Flow> {
        self.say("Goodbye!")?;
        Ok(Flow::Exit)
    }

    fn currency(&self) -> &str {
        &self.config.display.currency
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Show `text` and read one trimmed line; `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Collection, MemoryStore};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn run_session(store: &MemoryStore, config: &Config, script: &str) -> String {
        let mut session = Session::new(store, config, Cursor::new(script.to_string()), Vec::new());
        session.run().unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::ViewMenu));
        assert_eq!(MenuChoice::parse("9"), Some(MenuChoice::ExportCsv));
        assert_eq!(MenuChoice::parse("10"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("11"), None);
        assert_eq!(MenuChoice::parse("menu"), None);
    }

    #[test]
    fn test_exit() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "10\n");
        assert!(out.contains("Choose (1-10): "));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "");
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_end_of_input_inside_prompts_says_goodbye() {
        let store = MemoryStore::seeded().unwrap();
        for script in ["2\n", "2\nM1\n", "4\n", "7\nM4\n", "7\nM4\nSalad\n", "8\n"] {
            let out = run_session(&store, &Config::default(), script);
            assert!(out.ends_with("Goodbye!\n"), "script {script:?} ended with {out:?}");
            assert_eq!(out.matches("Goodbye!").count(), 1);
        }
    }

    #[test]
    fn test_admin_add_keeps_menu_with_unreadable_entry() {
        let menu = r#"[{"id": "M1", "name": "Burger", "price": 80}, {"id": "M2", "name": "Pizza"}]"#;
        let store = MemoryStore::seeded().unwrap().with_document(Collection::Menu, menu);

        let out = run_session(&store, &Config::default(), "7\nM4\nSalad\n10\n1\n10\n");

        assert!(out.contains("Error: menu document has 1 unreadable record(s)"));
        assert!(!out.contains("Item added successfully!"));
        assert!(out.contains("M1: Burger - Rs 80"));
        assert_eq!(store.document(Collection::Menu).unwrap(), menu);
    }

    #[test]
    fn test_invalid_choice_redisplays_menu() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "42\n10\n");
        assert!(out.contains("Invalid choice. Please try again."));
        assert_eq!(out.matches("Food Ordering System").count(), 2);
    }

    #[test]
    fn test_view_menu() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "1\n10\n");
        assert!(out.contains("--- MENU ---"));
        assert!(out.contains("M1: Burger - Rs 80"));
        assert!(out.contains("M2: Pizza - Rs 250"));
        assert!(out.contains("M3: Pasta - Rs 150"));
    }

    #[test]
    fn test_add_view_and_checkout() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(
            &store,
            &Config::default(),
            "2\nm1\n2\n3\n4\nAlice\n3\n10\n",
        );

        assert!(out.contains("Item added to cart!"));
        assert!(out.contains("1. Burger x2 = Rs 160"));
        assert!(out.contains("Total = Rs 160"));
        assert!(out.contains("| Total: Rs 160"));
        assert!(out.contains("Your cart is empty."));

        let orders = Ledger::new(&store).list();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].customer, "Alice");
    }

    #[test]
    fn test_add_unknown_item() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "2\nZ9\n1\n3\n10\n");
        assert!(out.contains("Item not found!"));
        assert!(out.contains("Your cart is empty."));
    }

    #[test]
    fn test_bad_quantity_defaults_to_one() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "2\nM2\nlots\n3\n10\n");
        assert!(out.contains("1. Pizza x1 = Rs 250"));
    }

    #[test]
    fn test_checkout_empty_cart() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "4\nBob\n10\n");
        assert!(out.contains("Cart is empty!"));
        assert_eq!(store.document(Collection::Orders).unwrap(), "[]");
    }

    #[test]
    fn test_view_orders() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "5\n10\n");
        assert!(out.contains("No orders found."));

        let store = MemoryStore::seeded().unwrap().with_document(
            Collection::Orders,
            r#"[{"order_id":"O1","customer":"Ann","items":[],"total":100,"time":"2024-01-01T10:00:00"}]"#,
        );
        let out = run_session(&store, &Config::default(), "5\n10\n");
        assert!(out.contains("O1 | Ann | Rs 100 | 2024-01-01T10:00:00"));
    }

    #[test]
    fn test_daily_sales_includes_todays_order() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "2\nM3\n\n4\n\n6\n10\n");
        assert!(out.contains("Today's sales: Rs 150"));
    }

    #[test]
    fn test_admin_add_and_remove() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(
            &store,
            &Config::default(),
            "7\nM4\nSalad\n99.5\n1\n8\nm4\n10\n",
        );
        assert!(out.contains("Item added successfully!"));
        assert!(out.contains("M4: Salad - Rs 99.5"));
        assert!(out.contains("Item removed (if it existed)."));
        assert_eq!(Catalog::new(&store).view().len(), 3);
    }

    #[test]
    fn test_admin_add_invalid_price() {
        let store = MemoryStore::seeded().unwrap();
        let out = run_session(&store, &Config::default(), "7\nM4\nSalad\ncheap\n10\n");
        assert!(out.contains("Invalid price!"));
        assert_eq!(Catalog::new(&store).view().len(), 3);
    }

    #[test]
    fn test_export_csv() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.export.path = tmp.path().join("orders_export.csv");
        let store = MemoryStore::seeded().unwrap();

        let out = run_session(&store, &config, "9\n10\n");

        assert!(out.contains("Orders exported to"));
        let text = std::fs::read_to_string(&config.export.path).unwrap();
        assert_eq!(text, "order_id,customer,total,time\n");
    }

    #[test]
    fn test_export_failure_is_reported() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.export.path = tmp.path().join("missing").join("out.csv");
        let store = MemoryStore::seeded().unwrap();

        let out = run_session(&store, &config, "9\n10\n");
        assert!(out.contains("Failed to export CSV:"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_save_failure_keeps_cart() {
        let store = MemoryStore::seeded().unwrap();
        let config = Config::default();
        let mut session = Session::new(
            &store,
            &config,
            Cursor::new("2\nM1\n1\n4\nAlice\n10\n".to_string()),
            Vec::new(),
        );
        store.set_fail_writes(true);

        session.run().unwrap();
        assert_eq!(session.cart().len(), 1);
        let out = String::from_utf8(session.into_output()).unwrap();
        assert!(out.contains("Error: I/O error"));
    }

    #[test]
    fn test_custom_currency() {
        let store = MemoryStore::seeded().unwrap();
        let mut config = Config::default();
        config.display.currency = "USD".to_string();

        let out = run_session(&store, &config, "1\n10\n");
        assert!(out.contains("M1: Burger - USD 80"));
    }
}
