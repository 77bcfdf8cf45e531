//! File name → destination table resolution against an allow-list.

use std::path::Path;

use csvload_model::TableRef;
use regex::{Regex, RegexBuilder};

use crate::error::{IngestError, Result};

/// One allow-listed destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRule {
    pub table: TableRef,
    /// Glob pattern (`*`, `?`) matched against the file name. Without a
    /// pattern the file stem must equal the table name.
    pub pattern: Option<String>,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    table: TableRef,
    matcher: Option<Regex>,
}

/// Resolves input files to allow-listed tables. The first matching rule wins.
#[derive(Debug, Clone)]
pub struct TableResolver {
    rules: Vec<CompiledRule>,
}

impl TableResolver {
    pub fn new(rules: Vec<TableRule>) -> Result<Self> {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let matcher = rule.pattern.as_deref().map(compile_glob).transpose()?;
                Ok(CompiledRule {
                    table: rule.table,
                    matcher,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Destination table for `path`, or `None` when no rule matches.
    pub fn resolve(&self, path: &Path) -> Option<&TableRef> {
        let file_name = path.file_name()?.to_str()?;
        let stem = path.file_stem()?.to_str()?;
        self.rules
            .iter()
            .find(|rule| match &rule.matcher {
                Some(matcher) => matcher.is_match(file_name),
                None => stem.trim().eq_ignore_ascii_case(rule.table.name.trim()),
            })
            .map(|rule| &rule.table)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableRef> {
        self.rules.iter().map(|rule| &rule.table)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Translates a glob into an anchored, case-insensitive regular expression.
fn compile_glob(pattern: &str) -> Result<Regex> {
    let mut expression = String::with_capacity(pattern.len() + 8);
    expression.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => expression.push_str(".*"),
            '?' => expression.push('.'),
            other => expression.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    expression.push('$');
    RegexBuilder::new(&expression)
        .case_insensitive(true)
        .build()
        .map_err(|source| IngestError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> TableResolver {
        TableResolver::new(vec![
            TableRule {
                table: TableRef::new("dbo", "Customers"),
                pattern: Some("clientes_*.csv".to_string()),
            },
            TableRule {
                table: TableRef::new("dbo", "Orders"),
                pattern: None,
            },
            TableRule {
                table: TableRef::new("sales", "Invoices"),
                pattern: Some("fact?.csv".to_string()),
            },
        ])
        .unwrap()
    }

    #[test]
    fn matches_by_pattern_case_insensitively() {
        let resolver = resolver();
        let table = resolver.resolve(Path::new("/in/CLIENTES_2024.CSV")).unwrap();
        assert_eq!(table.name, "Customers");
        let table = resolver.resolve(Path::new("fact1.csv")).unwrap();
        assert_eq!(table.schema, "sales");
        assert!(resolver.resolve(Path::new("fact12.csv")).is_none());
    }

    #[test]
    fn matches_by_file_stem_without_pattern() {
        let resolver = resolver();
        let table = resolver.resolve(Path::new("orders.csv")).unwrap();
        assert_eq!(table.name, "Orders");
        assert!(resolver.resolve(Path::new("orders_old.csv")).is_none());
    }

    #[test]
    fn pattern_dots_are_literal() {
        let resolver = resolver();
        assert!(resolver.resolve(Path::new("clientes_1xcsv")).is_none());
    }
}
