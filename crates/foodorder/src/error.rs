//! Error types for foodorder.
//!
//! This module defines all error types used throughout the foodorder crate.
//! Every operation error is recoverable: the interactive shell reports it and
//! keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for foodorder operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Domain Errors ===
    /// No menu item has the requested id.
    #[error("item not found: {id}")]
    ItemNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A price entered by the admin is not a usable number.
    #[error("invalid price: {input:?}")]
    InvalidPrice {
        /// The raw input.
        input: String,
    },

    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    // === Storage Errors ===
    /// A document holds records that couldn't be parsed, so rewriting it
    /// would lose them.
    #[error("{collection} document has {count} unreadable record(s); not overwriting it")]
    UnreadableRecords {
        /// The collection that was about to be written.
        collection: String,
        /// How many records didn't parse.
        count: usize,
    },

    // === Export Errors ===
    /// Writing the CSV export failed.
    #[error("failed to export to {path}: {source}")]
    Export {
        /// Destination of the export.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for foodorder operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an item-not-found error.
    #[must_use]
    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::ItemNotFound { id: id.into() }
    }

    /// Create an invalid-price error.
    #[must_use]
    pub fn invalid_price(input: impl Into<String>) -> Self {
        Self::InvalidPrice {
            input: input.into(),
        }
    }

    /// Check if this error is a failed menu lookup.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound { .. })
    }

    /// Check if this error was caused by bad user input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidPrice { .. })
    }
}
