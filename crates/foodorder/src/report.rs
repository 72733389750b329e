//! Sales figures and CSV export over the order ledger.

use std::path::Path;

use chrono::Local;
use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};
use crate::model::Order;
use crate::storage::{Collection, Store, StoreExt};

/// Columns written by [`Reports::export_csv`], in order.
pub const EXPORT_COLUMNS: [&str; 4] = ["order_id", "customer", "total", "time"];

/// Today's local date as `YYYY-MM-DD`.
#[must_use]
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Read-only reports over the persisted orders.
#[derive(Debug)]
pub struct Reports<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> Reports<'a, S> {
    /// Create reports over `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Sum of `total` over orders whose `time` starts with `date`.
    ///
    /// This is a plain string prefix match; an order stamped in another
    /// format or timezone simply doesn't count.
    #[must_use]
    pub fn daily_sales(&self, date: &str) -> f64 {
        self.store
            .load::<Order>(Collection::Orders)
            .into_records()
            .iter()
            .filter(|order| order.time.starts_with(date))
            .map(|order| order.total)
            .sum()
    }

    /// Write the ledger to `path` as CSV, one row per order in ledger order.
    ///
    /// Fields missing from a stored order are written as empty strings.
    /// Returns the number of rows written, not counting the header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Export`] if the file can't be created or written. A
    /// partially written file is left in place.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let records: Vec<Value> = self.store.load(Collection::Orders).into_records();

        let rows = write_rows(path, &records).map_err(|source| Error::Export {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Exported {} orders to {}", rows, path.display());
        Ok(rows)
    }
}

fn write_rows(path: &Path, records: &[Value]) -> std::result::Result<usize, csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(EXPORT_COLUMNS)?;

    for record in records {
        writer.write_record(EXPORT_COLUMNS.iter().map(|column| cell(record, column)))?;
    }

    writer.flush()?;
    Ok(records.len())
}

fn cell(record: &Value, column: &str) -> String {
    match record.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
