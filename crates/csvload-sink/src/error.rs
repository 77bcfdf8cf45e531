use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by sinks and the catalog reader.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("table {table} has no columns in the sink catalog")]
    SchemaNotFound { table: String },

    #[error("table {table} is not known to the sink")]
    UnknownTable { table: String },

    #[error("sink unavailable: {message}")]
    Unavailable { message: String },

    #[error("bulk insert into {table} timed out after {elapsed:?}")]
    Timeout { table: String, elapsed: Duration },

    #[error("bulk insert into {table} expects {expected} values per row, found {found}")]
    ColumnMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid sink catalog {path}: {message}")]
    InvalidCatalog { path: PathBuf, message: String },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode row for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SinkError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors that mean the sink itself could not be used.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::Timeout { .. } | Self::Io { .. } | Self::Toml { .. }
        )
    }
}

/// Result type for sink operations.
pub type Result<T> = std::result::Result<T, SinkError>;
