//! CSV reading with strict and tolerant variants.

mod header;
mod options;
mod reader;

pub use header::detect_delimiter;
pub use options::{CsvMode, CsvOptions, Delimiter};
pub use reader::{CsvRows, read_rows};
