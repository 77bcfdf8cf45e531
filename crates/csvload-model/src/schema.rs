//! Table references and discovered table schemas.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::column::ColumnMeta;
use crate::lookup::{CaseInsensitiveIndex, fold};

/// A destination table, qualified by its schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Case-insensitive identity key (`SCHEMA.NAME`).
    pub fn key(&self) -> String {
        format!("{}.{}", fold(&self.schema), fold(&self.name))
    }

    /// Case-insensitive equality.
    pub fn same_table(&self, other: &TableRef) -> bool {
        self.key() == other.key()
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Ordered column list for one table, system-managed columns excluded.
#[derive(Debug, Clone)]
pub struct TableSchema {
    table: TableRef,
    columns: Vec<ColumnMeta>,
    index: CaseInsensitiveIndex,
}

impl TableSchema {
    /// Builds a schema; columns are ordered by their ordinal position.
    pub fn new(table: TableRef, mut columns: Vec<ColumnMeta>) -> Self {
        columns.sort_by_key(|column| column.ordinal);
        let index = CaseInsensitiveIndex::new(columns.iter().map(|column| column.name.as_str()));
        Self {
            table,
            columns,
            index,
        }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.index
            .position(name)
            .and_then(|position| self.columns.get(position))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.position(name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_columns_by_ordinal() {
        let schema = TableSchema::new(
            TableRef::new("dbo", "Customers"),
            vec![
                ColumnMeta::new(3, "Amount", "decimal"),
                ColumnMeta::new(1, "Id", "int"),
                ColumnMeta::new(2, "Name", "nvarchar"),
            ],
        );
        assert_eq!(schema.column_names(), vec!["Id", "Name", "Amount"]);
        assert_eq!(schema.position("amount"), Some(2));
        assert_eq!(schema.column("NAME").map(|c| c.ordinal), Some(2));
    }

    #[test]
    fn table_key_ignores_case() {
        let left = TableRef::new("dbo", "Customers");
        let right = TableRef::new("DBO", "customers");
        assert!(left.same_table(&right));
        assert_eq!(left.to_string(), "dbo.Customers");
    }
}
