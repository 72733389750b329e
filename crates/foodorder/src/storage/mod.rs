//! Storage layer for foodorder.
//!
//! Menu and orders are kept as whole-collection JSON documents. A [`Store`]
//! only knows how to read and write the raw text of a named [`Collection`];
//! [`StoreExt`] layers typed, fail-soft loading and pretty-printed saving on
//! top of any store.
//!
//! Two stores are provided:
//! - [`JsonStore`]: one file per collection in a data directory
//! - [`MemoryStore`]: documents held in memory, for tests

mod file;
mod memory;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{default_menu, Order};

pub use file::JsonStore;
pub use memory::MemoryStore;

/// A persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// The menu document.
    Menu,
    /// The orders document.
    Orders,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Menu => write!(f, "menu"),
            Self::Orders => write!(f, "orders"),
        }
    }
}

/// Outcome of loading a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// The document was read and every record parsed.
    Records(Vec<T>),
    /// The document is a JSON array, but some of its records don't fit the
    /// record type. `records` holds the ones that do, in document order.
    Partial {
        /// Records that parsed.
        records: Vec<T>,
        /// One message per record that didn't.
        rejected: Vec<String>,
    },
    /// No document exists yet.
    Missing,
    /// The document exists but couldn't be read or isn't a JSON array.
    Unreadable {
        /// What went wrong.
        reason: String,
    },
}

impl<T> Loaded<T> {
    /// The records that could be parsed. Missing and unreadable documents
    /// give an empty collection.
    #[must_use]
    pub fn into_records(self) -> Vec<T> {
        match self {
            Self::Records(records) | Self::Partial { records, .. } => records,
            Self::Missing | Self::Unreadable { .. } => Vec::new(),
        }
    }

    /// Whether the document exists but couldn't be used.
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }

    /// Whether some records were left out of the result.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}

/// Raw document access by collection.
pub trait Store {
    /// Read the document for `collection`.
    ///
    /// Returns `Ok(None)` if the document doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but can't be read.
    fn read(&self, collection: Collection) -> Result<Option<String>>;

    /// Replace the document for `collection` with `contents`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document can't be written.
    fn write(&self, collection: Collection, contents: &str) -> Result<()>;
}

/// Typed operations available on every [`Store`].
pub trait StoreExt: Store {
    /// Load and parse a collection.
    ///
    /// Never fails. Each array element is parsed on its own, so one
    /// off-schema record doesn't hide the rest; read errors and documents
    /// that aren't a JSON array become [`Loaded::Unreadable`].
    fn load<T: DeserializeOwned>(&self, collection: Collection) -> Loaded<T> {
        let loaded = match self.read(collection) {
            Ok(Some(text)) => parse_records(&text),
            Ok(None) => Loaded::Missing,
            Err(err) => Loaded::Unreadable {
                reason: err.to_string(),
            },
        };

        log_loaded(collection, &loaded);
        loaded
    }

    /// Load a collection that is about to be rewritten.
    ///
    /// A missing document, or one that isn't a JSON array, gives an empty
    /// collection, the same as [`StoreExt::load`].
    ///
    /// # Errors
    ///
    /// Returns an error if the document can't be read, or
    /// [`Error::UnreadableRecords`] if it holds records that didn't parse,
    /// since saving the rest would drop them.
    fn load_for_update<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let loaded = match self.read(collection)? {
            Some(text) => parse_records(&text),
            None => Loaded::Missing,
        };
        log_loaded(collection, &loaded);

        match loaded {
            Loaded::Partial { rejected, .. } => Err(Error::UnreadableRecords {
                collection: collection.to_string(),
                count: rejected.len(),
            }),
            loaded => Ok(loaded.into_records()),
        }
    }

    /// Serialize `records` as pretty-printed JSON and overwrite the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        let text = serde_json::to_string_pretty(records)?;
        self.write(collection, &text)?;
        debug!("Saved {} {} records", records.len(), collection);
        Ok(())
    }

    /// Write the default menu and an empty orders list where no document
    /// exists yet. Existing documents are left alone, even unreadable ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a seed document can't be written.
    fn seed_defaults(&self) -> Result<()> {
        if matches!(self.read(Collection::Menu), Ok(None)) {
            self.save(Collection::Menu, &default_menu())?;
            info!("Seeded default menu");
        }
        if matches!(self.read(Collection::Orders), Ok(None)) {
            self.save::<Order>(Collection::Orders, &[])?;
            info!("Seeded empty orders document");
        }
        Ok(())
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

fn log_loaded<T>(collection: Collection, loaded: &Loaded<T>) {
    match loaded {
        Loaded::Records(records) => {
            debug!("Loaded {} {} records", records.len(), collection);
        }
        Loaded::Partial { records, rejected } => {
            warn!(
                "Skipped {} of {} {} records: {}",
                rejected.len(),
                records.len() + rejected.len(),
                collection,
                rejected.join("; ")
            );
        }
        Loaded::Missing => debug!("No {} document, treating as empty", collection),
        Loaded::Unreadable { reason } => {
            warn!("Unreadable {} document, treating as empty: {}", collection, reason);
        }
    }
}

fn parse_records<T: DeserializeOwned>(text: &str) -> Loaded<T> {
    let values = match serde_json::from_str::<Vec<Value>>(text) {
        Ok(values) => values,
        Err(err) => {
            return Loaded::Unreadable {
                reason: err.to_string(),
            }
        }
    };

    let mut records = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        match T::deserialize(value) {
            Ok(record) => records.push(record),
            Err(err) => rejected.push(format!("record {index}: {err}")),
        }
    }

    if rejected.is_empty() {
        Loaded::Records(records)
    } else {
        Loaded::Partial { records, rejected }
    }
}
