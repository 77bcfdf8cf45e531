//! Extract ingestion for csvload.
//!
//! This crate turns an input directory into a list of CSV files ready to
//! load, and reads each CSV file into a lazy sequence of [`RawRow`]s.
//!
//! # Features
//!
//! - **CSV Reading**: strict and tolerant readers with BOM detection
//! - **Discovery**: list loose CSV files and ZIP archives in the input folder
//! - **Archives**: extract CSV entries from ZIP archives into a staging folder
//! - **Table Resolution**: map file names to allow-listed destination tables
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use csvload_ingest::{CsvOptions, discover_inputs, read_rows};
//!
//! for input in discover_inputs(Path::new("incoming"))? {
//!     for row in read_rows(&input.path, &CsvOptions::default())? {
//!         let row = row?;
//!         println!("line {}: {:?}", row.line(), row.get("Id"));
//!     }
//! }
//! ```
//!
//! [`RawRow`]: csvload_model::RawRow

mod archive;
mod csv_file;
mod discovery;
mod error;
mod resolve;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv_file::{CsvMode, CsvOptions, CsvRows, Delimiter, detect_delimiter, read_rows};

// === Discovery ===
pub use archive::extract_csv_entries;
pub use discovery::{InputFile, InputKind, discover_inputs};

// === Table Resolution ===
pub use resolve::{TableResolver, TableRule};
