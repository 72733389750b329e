//! `foodorder` - single-user food ordering over plain JSON files
//!
//! This library provides the menu catalog, session cart, order ledger and
//! reports behind the `foodorder` binary. All persistence goes through a
//! [`Store`], so every component runs equally against files or memory.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod report;
pub mod storage;

pub use cart::Cart;
pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use logging::init_logging;
pub use model::{CartLine, MenuItem, Order};
pub use report::Reports;
pub use storage::{Collection, JsonStore, Loaded, MemoryStore, Store, StoreExt};
