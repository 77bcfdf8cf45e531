//! In-memory sink used by tests and dry runs.

use std::cell::Cell;
use std::collections::HashMap;

use csvload_model::{TableRef, TypedRow};

use crate::error::{Result, SinkError};
use crate::sink::{BulkInsert, BulkOptions, CatalogColumn, Sink};

#[derive(Debug, Clone)]
struct MemoryTable {
    table: TableRef,
    columns: Vec<CatalogColumn>,
    rows: Vec<TypedRow>,
}

/// Records every truncate and batch it receives.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: HashMap<String, MemoryTable>,
    truncates: Vec<TableRef>,
    batches: Vec<(TableRef, usize)>,
    last_options: Option<BulkOptions>,
    schema_queries: Cell<usize>,
    unavailable: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: TableRef, columns: Vec<CatalogColumn>) {
        self.tables.insert(
            table.key(),
            MemoryTable {
                table,
                columns,
                rows: Vec::new(),
            },
        );
    }

    #[must_use]
    pub fn with_table(mut self, table: TableRef, columns: Vec<CatalogColumn>) -> Self {
        self.add_table(table, columns);
        self
    }

    /// Makes every later call fail with [`SinkError::Unavailable`].
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Pre-populates a table, as if a previous run had loaded it.
    pub fn seed_rows(&mut self, table: &TableRef, rows: Vec<TypedRow>) {
        if let Some(entry) = self.tables.get_mut(&table.key()) {
            entry.rows.extend(rows);
        }
    }

    pub fn rows(&self, table: &TableRef) -> &[TypedRow] {
        self.tables
            .get(&table.key())
            .map(|entry| entry.rows.as_slice())
            .unwrap_or_default()
    }

    /// Every truncate call, in order.
    pub fn truncates(&self) -> &[TableRef] {
        &self.truncates
    }

    pub fn truncate_count(&self, table: &TableRef) -> usize {
        self.truncates
            .iter()
            .filter(|truncated| truncated.same_table(table))
            .count()
    }

    /// Every batch written, as `(table, row count)`.
    pub fn batches(&self) -> &[(TableRef, usize)] {
        &self.batches
    }

    pub fn last_options(&self) -> Option<BulkOptions> {
        self.last_options
    }

    pub fn schema_queries(&self) -> usize {
        self.schema_queries.get()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(SinkError::Unavailable {
                message: "memory sink marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Sink for MemorySink {
    fn query_columns(&self, table: &TableRef) -> Result<Vec<CatalogColumn>> {
        self.check_available()?;
        self.schema_queries.set(self.schema_queries.get() + 1);
        let mut columns = self
            .tables
            .get(&table.key())
            .map(|entry| entry.columns.clone())
            .unwrap_or_default();
        columns.sort_by_key(|column| column.ordinal);
        Ok(columns)
    }

    fn truncate(&mut self, table: &TableRef) -> Result<()> {
        self.check_available()?;
        let entry = self
            .tables
            .get_mut(&table.key())
            .ok_or_else(|| SinkError::UnknownTable {
                table: table.to_string(),
            })?;
        entry.rows.clear();
        self.truncates.push(entry.table.clone());
        Ok(())
    }

    fn bulk_insert(&mut self, insert: &BulkInsert<'_>) -> Result<u64> {
        self.check_available()?;
        let entry = self
            .tables
            .get_mut(&insert.table.key())
            .ok_or_else(|| SinkError::UnknownTable {
                table: insert.table.to_string(),
            })?;
        if let Some(row) = insert.rows.iter().find(|row| row.len() != insert.columns.len()) {
            return Err(SinkError::ColumnMismatch {
                table: insert.table.to_string(),
                expected: insert.columns.len(),
                found: row.len(),
            });
        }
        for batch in insert.rows.chunks(insert.options.batch_size.max(1)) {
            entry.rows.extend_from_slice(batch);
            self.batches.push((entry.table.clone(), batch.len()));
        }
        self.last_options = Some(insert.options);
        Ok(insert.rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvload_model::TypedValue;

    fn table() -> TableRef {
        TableRef::new("dbo", "T")
    }

    fn sink() -> MemorySink {
        MemorySink::new().with_table(table(), vec![CatalogColumn::new(1, "Id", "int")])
    }

    fn rows(count: i32) -> Vec<TypedRow> {
        (0..count)
            .map(|id| TypedRow::new(vec![TypedValue::Int32(id)]))
            .collect()
    }

    #[test]
    fn test_batches_are_recorded() {
        let mut sink = sink();
        let rows = rows(5);
        let columns = vec!["Id".to_string()];
        let written = sink
            .bulk_insert(&BulkInsert {
                table: &table(),
                columns: &columns,
                rows: &rows,
                options: BulkOptions {
                    batch_size: 2,
                    ..BulkOptions::default()
                },
            })
            .unwrap();
        assert_eq!(written, 5);
        let sizes: Vec<usize> = sink.batches().iter().map(|(_, size)| *size).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(sink.rows(&table()).len(), 5);
    }

    #[test]
    fn test_truncate_clears_rows() {
        let mut sink = sink();
        sink.seed_rows(&table(), rows(3));
        sink.truncate(&TableRef::new("DBO", "t")).unwrap();
        assert!(sink.rows(&table()).is_empty());
        assert_eq!(sink.truncate_count(&table()), 1);
    }

    #[test]
    fn test_truncate_rejects_unknown_table() {
        let mut sink = sink();
        let result = sink.truncate(&TableRef::new("dbo", "Other"));
        assert!(matches!(result, Err(SinkError::UnknownTable { .. })));
        assert!(sink.truncates().is_empty());
    }

    #[test]
    fn test_unavailable_sink() {
        let mut sink = sink();
        sink.set_unavailable(true);
        let result = sink.query_columns(&table());
        assert!(matches!(result, Err(SinkError::Unavailable { .. })));
    }
}
