//! File-backed document store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Collection, Store, StoreExt};
use crate::config::Config;
use crate::error::{Error, Result};

/// Stores each collection as a JSON file inside one data directory.
///
/// Writes overwrite the whole file in place; there is no locking, so the last
/// writer wins if two processes share a directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
    menu_file: String,
    orders_file: String,
}

impl JsonStore {
    /// Open a store in `dir`, creating the directory and seeding the default
    /// documents if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory can't be created or a seed document
    /// can't be written.
    pub fn open(
        dir: impl AsRef<Path>,
        menu_file: impl Into<String>,
        orders_file: impl Into<String>,
    ) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
            info!("Created data directory {}", dir.display());
        }

        let store = Self {
            dir,
            menu_file: menu_file.into(),
            orders_file: orders_file.into(),
        };
        store.seed_defaults()?;

        debug!("Opened JSON store at {}", store.dir.display());
        Ok(store)
    }

    /// Open the store described by `config`.
    ///
    /// # Errors
    ///
    /// See [`JsonStore::open`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(
            &config.storage.data_dir,
            config.storage.menu_file.as_str(),
            config.storage.orders_file.as_str(),
        )
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `collection`.
    #[must_use]
    pub fn path(&self, collection: Collection) -> PathBuf {
        match collection {
            Collection::Menu => self.dir.join(&self.menu_file),
            Collection::Orders => self.dir.join(&self.orders_file),
        }
    }
}

impl Store for JsonStore {
    fn read(&self, collection: Collection) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(collection)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, collection: Collection, contents: &str) -> Result<()> {
        std::fs::write(self.path(collection), contents)?;
        Ok(())
    }
}
