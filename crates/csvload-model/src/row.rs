//! Raw CSV rows keyed by header name.

use std::sync::Arc;

use crate::lookup::CaseInsensitiveIndex;

/// Header names of one CSV file, shared by every row read from it.
#[derive(Debug, Clone)]
pub struct ColumnNames {
    names: Vec<String>,
    index: CaseInsensitiveIndex,
}

impl ColumnNames {
    pub fn new(names: Vec<String>) -> Self {
        let index = CaseInsensitiveIndex::new(&names);
        Self { names, index }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.position(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One CSV data line. `None` marks a null (empty or whitespace-only) field.
#[derive(Debug, Clone)]
pub struct RawRow {
    line: u64,
    columns: Arc<ColumnNames>,
    values: Vec<Option<String>>,
}

impl RawRow {
    /// Creates a row; `values` is aligned with `columns` (missing trailing values are null).
    pub fn new(line: u64, columns: Arc<ColumnNames>, values: Vec<Option<String>>) -> Self {
        Self {
            line,
            columns,
            values,
        }
    }

    /// 1-based line number of this row in the source file.
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    /// Value by column name (case-insensitive). Null and unknown columns both yield `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .position(name)
            .and_then(|position| self.value_at(position))
    }

    pub fn value_at(&self, position: usize) -> Option<&str> {
        self.values.get(position).and_then(|value| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_values_case_insensitively() {
        let columns = Arc::new(ColumnNames::new(vec!["Id".into(), "Name".into()]));
        let row = RawRow::new(2, columns, vec![Some("1".into()), None]);
        assert_eq!(row.get("ID"), Some("1"));
        assert_eq!(row.get("name"), None);
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.line(), 2);
    }
}
