//! The sink contract.

use std::time::Duration;

use csvload_model::{TableRef, TypedRow};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One row of the sink's column catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogColumn {
    pub ordinal: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Declared length; `-1` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl CatalogColumn {
    pub fn new(ordinal: u32, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            ordinal,
            name: name.into(),
            type_name: type_name.into(),
            max_length: None,
            precision: None,
            scale: None,
        }
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: i32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    #[must_use]
    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }
}

/// Caller-controlled bulk insert settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOptions {
    pub batch_size: usize,
    pub timeout: Duration,
    pub table_lock: bool,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            batch_size: 5000,
            timeout: Duration::from_secs(600),
            table_lock: true,
        }
    }
}

/// A single bulk insert: ordered column mapping plus rows in that order.
#[derive(Debug, Clone, Copy)]
pub struct BulkInsert<'a> {
    pub table: &'a TableRef,
    pub columns: &'a [String],
    pub rows: &'a [TypedRow],
    pub options: BulkOptions,
}

/// A relational destination.
pub trait Sink {
    /// Column catalog for `table`, in ordinal order. Unknown tables yield an
    /// empty list.
    fn query_columns(&self, table: &TableRef) -> Result<Vec<CatalogColumn>>;

    /// Runs the truncate procedure for `table`. Unknown tables are rejected.
    fn truncate(&mut self, table: &TableRef) -> Result<()>;

    /// Inserts every row in batches of `options.batch_size`. Returns the
    /// number of rows written.
    fn bulk_insert(&mut self, insert: &BulkInsert<'_>) -> Result<u64>;
}
