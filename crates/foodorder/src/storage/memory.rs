//! In-memory document store for tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::{Collection, Store, StoreExt};
use crate::error::{Error, Result};

/// Keeps documents in memory. Single-threaded, like the rest of the crate.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<HashMap<Collection, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    /// An empty store with no documents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the default menu and an empty orders list.
    ///
    /// # Errors
    ///
    /// Returns an error if the default documents can't be serialized.
    pub fn seeded() -> Result<Self> {
        let store = Self::new();
        store.seed_defaults()?;
        Ok(store)
    }

    /// Replace the raw document for `collection`.
    #[must_use]
    pub fn with_document(self, collection: Collection, contents: impl Into<String>) -> Self {
        self.documents
            .borrow_mut()
            .insert(collection, contents.into());
        self
    }

    /// The raw document for `collection`, if any.
    #[must_use]
    pub fn document(&self, collection: Collection) -> Option<String> {
        self.documents.borrow().get(&collection).cloned()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl Store for MemoryStore {
    fn read(&self, collection: Collection) -> Result<Option<String>> {
        Ok(self.document(collection))
    }

    fn write(&self, collection: Collection, contents: &str) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("{collection} document is read-only"),
            )));
        }
        self.documents
            .borrow_mut()
            .insert(collection, contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let store = MemoryStore::new();
        assert!(store.document(Collection::Menu).is_none());
        assert!(store.document(Collection::Orders).is_none());
    }

    #[test]
    fn test_seeded_has_documents() {
        let store = MemoryStore::seeded().unwrap();
        assert!(store.document(Collection::Menu).is_some());
        assert_eq!(store.document(Collection::Orders).unwrap(), "[]");
    }

    #[test]
    fn test_fail_writes() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(store.write(Collection::Menu, "[]").is_err());
        assert!(store.document(Collection::Menu).is_none());

        store.set_fail_writes(false);
        assert!(store.write(Collection::Menu, "[]").is_ok());
    }
}
