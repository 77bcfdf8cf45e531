//! Schema catalog reader.

use std::collections::HashMap;
use std::sync::Arc;

use csvload_model::{ColumnMeta, TableRef, TableSchema};
use tracing::debug;

use crate::error::{Result, SinkError};
use crate::sink::{CatalogColumn, Sink};

/// System-managed columns never populated from CSV.
pub const RESERVED_COLUMNS: [&str; 2] = ["RowId", "LoadedAt"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_COLUMNS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name.trim()))
}

/// Reads the column list of `table` from `sink`.
///
/// Reserved columns are dropped and the rest ordered by ordinal. A table with
/// no columns at all is [`SinkError::SchemaNotFound`].
pub fn fetch_schema(sink: &dyn Sink, table: &TableRef) -> Result<TableSchema> {
    let columns: Vec<ColumnMeta> = sink
        .query_columns(table)?
        .into_iter()
        .filter(|column| !is_reserved(&column.name))
        .map(to_column_meta)
        .collect();
    if columns.is_empty() {
        return Err(SinkError::SchemaNotFound {
            table: table.to_string(),
        });
    }
    debug!(table = %table, columns = columns.len(), "fetched table schema");
    Ok(TableSchema::new(table.clone(), columns))
}

fn to_column_meta(column: CatalogColumn) -> ColumnMeta {
    let mut meta = ColumnMeta::new(column.ordinal, column.name, column.type_name);
    if let Some(length) = column.max_length.filter(|length| *length > 0) {
        meta = meta.with_max_length(length as usize);
    }
    if let Some(precision) = column.precision {
        meta = meta.with_precision(precision, column.scale.unwrap_or(0));
    }
    meta
}

/// Run-scoped memo of fetched schemas, keyed case-insensitively.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: HashMap<String, Arc<TableSchema>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached schema or fetches it. Failures are not cached.
    pub fn get_or_fetch(&mut self, sink: &dyn Sink, table: &TableRef) -> Result<Arc<TableSchema>> {
        let key = table.key();
        if let Some(schema) = self.entries.get(&key) {
            return Ok(Arc::clone(schema));
        }
        let schema = Arc::new(fetch_schema(sink, table)?);
        self.entries.insert(key, Arc::clone(&schema));
        Ok(schema)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySink;
    use csvload_model::SemanticType;

    fn sink() -> MemorySink {
        let mut sink = MemorySink::new();
        sink.add_table(
            TableRef::new("dbo", "Customers"),
            vec![
                CatalogColumn::new(3, "Amount", "decimal").with_precision(10, 2),
                CatalogColumn::new(1, "rowid", "bigint"),
                CatalogColumn::new(2, "Name", "nvarchar").with_max_length(50),
                CatalogColumn::new(4, "Notes", "nvarchar").with_max_length(-1),
                CatalogColumn::new(5, "LOADEDAT", "datetime2"),
            ],
        );
        sink
    }

    #[test]
    fn test_reserved_columns_are_excluded() {
        let schema = fetch_schema(&sink(), &TableRef::new("dbo", "Customers")).unwrap();
        assert_eq!(schema.column_names(), vec!["Name", "Amount", "Notes"]);
        let amount = schema.column("amount").unwrap();
        assert_eq!(amount.semantic_type, SemanticType::Decimal);
        assert_eq!((amount.precision, amount.scale), (Some(10), Some(2)));
        assert_eq!(schema.column("Name").unwrap().max_length, Some(50));
        assert_eq!(schema.column("Notes").unwrap().max_length, None);
    }

    #[test]
    fn test_unknown_table_is_schema_not_found() {
        let result = fetch_schema(&sink(), &TableRef::new("dbo", "Missing"));
        assert!(matches!(result, Err(SinkError::SchemaNotFound { .. })));
    }

    #[test]
    fn test_table_with_only_reserved_columns_is_schema_not_found() {
        let mut sink = sink();
        sink.add_table(
            TableRef::new("dbo", "Audit"),
            vec![
                CatalogColumn::new(1, "RowId", "bigint"),
                CatalogColumn::new(2, "LoadedAt", "datetime2"),
            ],
        );
        let result = fetch_schema(&sink, &TableRef::new("dbo", "Audit"));
        assert!(matches!(result, Err(SinkError::SchemaNotFound { .. })));
    }

    #[test]
    fn test_cache_is_case_insensitive() {
        let sink = sink();
        let mut cache = SchemaCache::new();
        cache
            .get_or_fetch(&sink, &TableRef::new("dbo", "Customers"))
            .unwrap();
        cache
            .get_or_fetch(&sink, &TableRef::new("DBO", "customers"))
            .unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(sink.schema_queries(), 1);
    }
}
