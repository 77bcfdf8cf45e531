//! Load orchestration.
//!
//! [`load_file`] takes one CSV file through schema fetch, parsing and
//! coercion, the once-per-run truncate and the batched bulk insert.
//! [`run`] drives it over an input directory, extracting archives and
//! resolving each file to its destination table.

pub mod context;
pub mod error;
pub mod loader;
pub mod options;
pub mod pipeline;
pub mod report;

pub use context::{RunContext, TruncatedSet};
pub use error::{ErrorKind, LoadError, Result};
pub use loader::load_file;
pub use options::{DEFAULT_BATCH_SIZE, LoadOptions, effective_batch_size};
pub use pipeline::{RunRequest, run};
pub use report::{FileReport, FileStage, RunSummary};
