//! Binding CSV header columns to schema columns.

use csvload_model::{CaseInsensitiveIndex, TableSchema};
use tracing::warn;

use crate::error::{CoerceError, Result};

/// CSV position for every schema column, plus the ignored CSV columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    bindings: Vec<usize>,
    extra: Vec<String>,
}

impl ColumnPlan {
    /// CSV column position feeding schema column `schema_position`.
    pub fn source_position(&self, schema_position: usize) -> Option<usize> {
        self.bindings.get(schema_position).copied()
    }

    pub fn bindings(&self) -> &[usize] {
        &self.bindings
    }

    /// CSV columns with no schema counterpart.
    pub fn extra(&self) -> &[String] {
        &self.extra
    }
}

/// Matches CSV header names against `schema` (case-insensitive).
///
/// Every schema column must be present in the CSV; otherwise the result is
/// [`CoerceError::MissingColumns`]. CSV columns unknown to the schema are
/// logged and ignored.
pub fn reconcile<S: AsRef<str>>(csv_columns: &[S], schema: &TableSchema) -> Result<ColumnPlan> {
    let csv_index = CaseInsensitiveIndex::new(csv_columns);

    let mut bindings = Vec::with_capacity(schema.len());
    let mut missing = Vec::new();
    for column in schema.columns() {
        match csv_index.position(&column.name) {
            Some(position) => bindings.push(position),
            None => missing.push(column.name.clone()),
        }
    }

    let extra: Vec<String> = csv_columns
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| schema.column(name).is_none())
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(CoerceError::MissingColumns { missing, extra });
    }
    if !extra.is_empty() {
        warn!(
            table = %schema.table(),
            columns = %extra.join(", "),
            "ignoring CSV columns not present in the table"
        );
    }
    Ok(ColumnPlan { bindings, extra })
}
