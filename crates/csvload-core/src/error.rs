use std::fmt;
use std::path::PathBuf;

use csvload_coerce::{CoerceError, ConversionError};
use csvload_ingest::IngestError;
use csvload_sink::SinkError;
use thiserror::Error;

/// Failure of a file load or of the run itself.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("table {table} has no columns in the sink catalog")]
    SchemaNotFound { table: String },

    #[error("CSV is missing schema columns: {}", missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    /// The CSV content could not be parsed.
    #[error(transparent)]
    MalformedCsv(IngestError),

    /// The file is missing or cannot be read.
    #[error(transparent)]
    FileUnreadable(IngestError),

    #[error(transparent)]
    ValueConversion(Box<ConversionError>),

    #[error("sink unavailable: {0}")]
    SinkUnavailable(#[source] SinkError),

    /// The sink is reachable but refused the request.
    #[error("sink rejected the load: {0}")]
    SinkRejected(#[source] SinkError),

    #[error("archive extraction failed: {0}")]
    Archive(#[source] IngestError),

    #[error("cannot read input directory: {0}")]
    Input(#[source] IngestError),

    #[error("cannot prepare staging directory {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse error category, used in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SchemaNotFound,
    MissingColumns,
    MalformedCsv,
    FileUnreadable,
    ValueConversion,
    SinkUnavailable,
    SinkRejected,
    Archive,
    Startup,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SchemaNotFound => "SchemaNotFound",
            Self::MissingColumns => "MissingColumns",
            Self::MalformedCsv => "MalformedCsv",
            Self::FileUnreadable => "FileUnreadable",
            Self::ValueConversion => "ValueConversion",
            Self::SinkUnavailable => "SinkUnavailable",
            Self::SinkRejected => "SinkRejected",
            Self::Archive => "Archive",
            Self::Startup => "Startup",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SchemaNotFound { .. } => ErrorKind::SchemaNotFound,
            Self::MissingColumns { .. } => ErrorKind::MissingColumns,
            Self::MalformedCsv(_) => ErrorKind::MalformedCsv,
            Self::FileUnreadable(_) => ErrorKind::FileUnreadable,
            Self::ValueConversion(_) => ErrorKind::ValueConversion,
            Self::SinkUnavailable(_) => ErrorKind::SinkUnavailable,
            Self::SinkRejected(_) => ErrorKind::SinkRejected,
            Self::Archive(_) => ErrorKind::Archive,
            Self::Input(_) | Self::Staging { .. } => ErrorKind::Startup,
        }
    }

    /// The offending value, for conversion failures.
    pub fn conversion(&self) -> Option<&ConversionError> {
        match self {
            Self::ValueConversion(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl From<SinkError> for LoadError {
    fn from(error: SinkError) -> Self {
        match error {
            SinkError::SchemaNotFound { table } => Self::SchemaNotFound { table },
            other if other.is_unavailable() => Self::SinkUnavailable(other),
            other => Self::SinkRejected(other),
        }
    }
}

impl From<CoerceError> for LoadError {
    fn from(error: CoerceError) -> Self {
        match error {
            CoerceError::MissingColumns { missing, extra } => {
                Self::MissingColumns { missing, extra }
            }
            CoerceError::ValueConversion(error) => Self::ValueConversion(error),
        }
    }
}

impl From<IngestError> for LoadError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::FileNotFound { .. } | IngestError::FileRead { .. } => {
                Self::FileUnreadable(error)
            }
            other => Self::MalformedCsv(other),
        }
    }
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
