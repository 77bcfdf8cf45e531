//! Destination side of the loader.
//!
//! A [`Sink`] exposes three primitives: a column catalog query, a truncate
//! procedure and a bulk insert. [`fetch_schema`] turns catalog rows into a
//! [`TableSchema`](csvload_model::TableSchema), and [`SchemaCache`] memoizes
//! it for a run.

pub mod catalog;
pub mod error;
pub mod file;
pub mod memory;
pub mod sink;

pub use catalog::{RESERVED_COLUMNS, SchemaCache, fetch_schema, is_reserved};
pub use error::{Result, SinkError};
pub use file::FileSink;
pub use memory::MemorySink;
pub use sink::{BulkInsert, BulkOptions, CatalogColumn, Sink};
