//! Error types for reconciliation and coercion.

use std::fmt;

use csvload_model::{ColumnMeta, SemanticType};
use thiserror::Error;

/// A raw field that cannot be converted to its column's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    pub column: String,
    /// Declared sink type, e.g. `decimal(10,2)`.
    pub declared_type: String,
    pub semantic_type: SemanticType,
    pub raw_value: String,
    /// Source line, when known.
    pub line: Option<u64>,
    pub reason: String,
}

impl ConversionError {
    pub fn new(column: &ColumnMeta, raw_value: &str, reason: impl Into<String>) -> Self {
        Self {
            column: column.name.clone(),
            declared_type: column.declared_type(),
            semantic_type: column.semantic_type,
            raw_value: raw_value.to_string(),
            line: None,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn at_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot convert '{}' in column '{}' to {} ({})",
            self.raw_value, self.column, self.semantic_type, self.declared_type
        )?;
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        write!(f, ": {}", self.reason)
    }
}

impl std::error::Error for ConversionError {}

/// Errors raised while reconciling or coercing a file.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// Schema columns absent from the CSV header.
    #[error("CSV is missing schema columns: {}", missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        /// CSV columns unknown to the schema (reported, never fatal on their own).
        extra: Vec<String>,
    },

    /// A field failed to convert.
    #[error(transparent)]
    ValueConversion(Box<ConversionError>),
}

impl From<ConversionError> for CoerceError {
    fn from(error: ConversionError) -> Self {
        Self::ValueConversion(Box::new(error))
    }
}

/// Result type for coercion operations.
pub type Result<T> = std::result::Result<T, CoerceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_display() {
        let column = ColumnMeta::new(1, "Id", "int");
        let error = ConversionError::new(&column, "x", "not an integer").at_line(2);
        assert_eq!(
            error.to_string(),
            "cannot convert 'x' in column 'Id' to Int32 (int) at line 2: not an integer"
        );
    }

    #[test]
    fn missing_columns_display() {
        let error = CoerceError::MissingColumns {
            missing: vec!["C".into(), "E".into()],
            extra: vec!["D".into()],
        };
        assert_eq!(error.to_string(), "CSV is missing schema columns: C, E");
    }
}
