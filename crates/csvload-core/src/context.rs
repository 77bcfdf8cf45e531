//! Run-scoped state.

use std::collections::HashSet;

use csvload_model::TableRef;
use csvload_sink::SchemaCache;

/// Tables already truncated in this run. Only ever grows.
#[derive(Debug, Default)]
pub struct TruncatedSet {
    keys: HashSet<String>,
}

impl TruncatedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, table: &TableRef) -> bool {
        self.keys.contains(&table.key())
    }

    /// Records `table`; returns false when it was already present.
    pub fn insert(&mut self, table: &TableRef) -> bool {
        self.keys.insert(table.key())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// State shared by every file of one run.
#[derive(Debug, Default)]
pub struct RunContext {
    pub truncated: TruncatedSet,
    pub schemas: SchemaCache,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_set_ignores_case() {
        let mut set = TruncatedSet::new();
        assert!(set.insert(&TableRef::new("dbo", "Customers")));
        assert!(!set.insert(&TableRef::new("DBO", "customers")));
        assert!(set.contains(&TableRef::new("Dbo", "CUSTOMERS")));
        assert_eq!(set.len(), 1);
    }
}
