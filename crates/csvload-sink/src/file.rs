//! Directory-backed sink.
//!
//! The directory holds a `catalog.toml` describing every table and one
//! `<schema>.<table>.jsonl` data file per table, one JSON object per row.
//!
//! ```toml
//! [[tables]]
//! schema = "dbo"
//! name = "Customers"
//!
//! [[tables.columns]]
//! name = "Id"
//! type = "int"
//!
//! [[tables.columns]]
//! name = "Name"
//! type = "nvarchar"
//! max_length = 50
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use csvload_model::{TableRef, TypedRow};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

use crate::error::{Result, SinkError};
use crate::sink::{BulkInsert, CatalogColumn, Sink};

pub const CATALOG_FILE: &str = "catalog.toml";

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tables: Vec<CatalogTable>,
}

#[derive(Debug, Deserialize)]
struct CatalogTable {
    #[serde(default = "default_schema")]
    schema: String,
    name: String,
    #[serde(default)]
    columns: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    max_length: Option<i32>,
    precision: Option<u32>,
    scale: Option<u32>,
}

fn default_schema() -> String {
    "dbo".to_string()
}

#[derive(Debug, Clone)]
struct FileTable {
    table: TableRef,
    columns: Vec<CatalogColumn>,
}

/// Sink writing JSON lines next to a TOML catalog.
#[derive(Debug)]
pub struct FileSink {
    root: PathBuf,
    tables: Vec<FileTable>,
}

impl FileSink {
    /// Opens `root` and reads its catalog.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SinkError::Unavailable {
                message: format!("sink directory not found: {}", root.display()),
            });
        }
        let catalog_path = root.join(CATALOG_FILE);
        let tables = load_catalog(&catalog_path)?;
        info!(
            sink = %root.display(),
            tables = tables.len(),
            "opened file sink"
        );
        Ok(Self { root, tables })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every table in the catalog.
    pub fn tables(&self) -> impl Iterator<Item = &TableRef> {
        self.tables.iter().map(|entry| &entry.table)
    }

    /// Data file for `table`.
    pub fn data_path(&self, table: &TableRef) -> PathBuf {
        self.root
            .join(format!("{}.{}.jsonl", table.schema, table.name))
    }

    fn find(&self, table: &TableRef) -> Option<&FileTable> {
        self.tables
            .iter()
            .find(|entry| entry.table.same_table(table))
    }

    fn require(&self, table: &TableRef) -> Result<&FileTable> {
        self.find(table).ok_or_else(|| SinkError::UnknownTable {
            table: table.to_string(),
        })
    }
}

fn load_catalog(path: &Path) -> Result<Vec<FileTable>> {
    let contents = std::fs::read_to_string(path).map_err(|e| SinkError::io(path, e))?;
    let catalog: CatalogFile = toml::from_str(&contents).map_err(|e| SinkError::Toml {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut tables: Vec<FileTable> = Vec::with_capacity(catalog.tables.len());
    for entry in catalog.tables {
        let table = TableRef::new(entry.schema, entry.name);
        if tables.iter().any(|known| known.table.same_table(&table)) {
            return Err(SinkError::InvalidCatalog {
                path: path.to_path_buf(),
                message: format!("table {table} is declared twice"),
            });
        }
        let columns = entry
            .columns
            .into_iter()
            .enumerate()
            .map(|(idx, column)| CatalogColumn {
                ordinal: idx as u32 + 1,
                name: column.name,
                type_name: column.type_name,
                max_length: column.max_length,
                precision: column.precision,
                scale: column.scale,
            })
            .collect();
        tables.push(FileTable { table, columns });
    }
    Ok(tables)
}

/// A row serialized as a JSON object in column-mapping order.
struct JsonRow<'a> {
    columns: &'a [String],
    row: &'a TypedRow,
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in self.columns.iter().zip(self.row.values()) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Sink for FileSink {
    fn query_columns(&self, table: &TableRef) -> Result<Vec<CatalogColumn>> {
        Ok(self
            .find(table)
            .map(|entry| entry.columns.clone())
            .unwrap_or_default())
    }

    fn truncate(&mut self, table: &TableRef) -> Result<()> {
        let entry = self.require(table)?;
        let path = self.data_path(&entry.table);
        File::create(&path).map_err(|e| SinkError::io(&path, e))?;
        debug!(table = %entry.table, path = %path.display(), "truncated table");
        Ok(())
    }

    fn bulk_insert(&mut self, insert: &BulkInsert<'_>) -> Result<u64> {
        let entry = self.require(insert.table)?;
        if let Some(row) = insert.rows.iter().find(|row| row.len() != insert.columns.len()) {
            return Err(SinkError::ColumnMismatch {
                table: insert.table.to_string(),
                expected: insert.columns.len(),
                found: row.len(),
            });
        }
        let path = self.data_path(&entry.table);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SinkError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        let started = Instant::now();
        let mut written = 0u64;

        for batch in insert.rows.chunks(insert.options.batch_size.max(1)) {
            for row in batch {
                let record = JsonRow {
                    columns: insert.columns,
                    row,
                };
                serde_json::to_writer(&mut writer, &record).map_err(|e| SinkError::Json {
                    path: path.clone(),
                    source: e,
                })?;
                writer.write_all(b"\n").map_err(|e| SinkError::io(&path, e))?;
            }
            writer.flush().map_err(|e| SinkError::io(&path, e))?;
            written += batch.len() as u64;

            let elapsed = started.elapsed();
            if elapsed > insert.options.timeout {
                return Err(SinkError::Timeout {
                    table: insert.table.to_string(),
                    elapsed,
                });
            }
            debug!(
                table = %insert.table,
                rows = batch.len(),
                table_lock = insert.options.table_lock,
                "wrote batch"
            );
        }
        Ok(written)
    }
}
