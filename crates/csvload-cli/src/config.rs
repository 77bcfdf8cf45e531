//! Loader configuration file (`csvload.toml`).
//!
//! ```toml
//! input_dir = "incoming"
//! sink_dir = "warehouse"
//! default_schema = "dbo"
//! delimiter = ";"
//! mode = "tolerant"
//!
//! [[tables]]
//! name = "Customers"
//! pattern = "clientes_*.csv"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use csvload_coerce::NumberLocale;
use csvload_core::{DEFAULT_BATCH_SIZE, LoadOptions, RunRequest};
use csvload_ingest::{CsvMode, CsvOptions, Delimiter, TableResolver, TableRule};
use csvload_model::TableRef;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "csvload.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    Invalid { message: String },

    #[error("input directory not found: {path}")]
    InputDirMissing { path: PathBuf },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// One allow-listed destination table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableEntry {
    pub name: String,
    /// Falls back to `default_schema`.
    pub schema: Option<String>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    pub input_dir: PathBuf,
    pub sink_dir: PathBuf,
    #[serde(default = "default_schema")]
    pub default_schema: String,
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub mode: CsvMode,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub bulk_timeout_secs: u64,
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    #[serde(default)]
    pub locale: NumberLocale,
    #[serde(default)]
    pub tables: Vec<TableEntry>,
}

fn default_schema() -> String {
    "dbo".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_timeout_secs() -> u64 {
    600
}

/// Command-line values that replace file values.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_dir: Option<PathBuf>,
    pub sink_dir: Option<PathBuf>,
    pub delimiter: Option<Delimiter>,
    pub tolerant: bool,
    pub batch_size: Option<usize>,
}

impl LoaderConfig {
    /// Reads and parses `path`, resolving relative paths against its folder.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&contents, path)?;
        if let Some(base) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Parses TOML text; `origin` is used in error messages only.
    pub fn parse(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.input_dir);
        resolve(&mut self.sink_dir);
        if let Some(work_dir) = self.work_dir.as_mut() {
            resolve(work_dir);
        }
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(input_dir) = overrides.input_dir {
            self.input_dir = input_dir;
        }
        if let Some(sink_dir) = overrides.sink_dir {
            self.sink_dir = sink_dir;
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
        if overrides.tolerant {
            self.mode = CsvMode::Tolerant;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.batch_size = batch_size;
        }
    }

    /// Checks everything a run needs before it starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_schema.trim().is_empty() {
            return Err(ConfigError::invalid("default_schema must not be empty"));
        }
        if self.tables.is_empty() {
            return Err(ConfigError::invalid("no tables configured"));
        }
        for (idx, table) in self.tables.iter().enumerate() {
            if table.name.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "table entry {} has an empty name",
                    idx + 1
                )));
            }
            if table.schema.as_deref().is_some_and(|schema| schema.trim().is_empty()) {
                return Err(ConfigError::invalid(format!(
                    "table {} has an empty schema",
                    table.name
                )));
            }
        }
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("batch_size must be greater than zero"));
        }
        if self.bulk_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "bulk_timeout_secs must be greater than zero",
            ));
        }
        if !self.locale.is_valid() {
            return Err(ConfigError::invalid(
                "locale decimal and group separators must differ",
            ));
        }
        self.resolver()?;
        if !self.input_dir.is_dir() {
            return Err(ConfigError::InputDirMissing {
                path: self.input_dir.clone(),
            });
        }
        Ok(())
    }

    pub fn table_rules(&self) -> Vec<TableRule> {
        self.tables
            .iter()
            .map(|entry| TableRule {
                table: self.table_ref(entry),
                pattern: entry.pattern.clone(),
            })
            .collect()
    }

    pub fn table_ref(&self, entry: &TableEntry) -> TableRef {
        let schema = entry
            .schema
            .clone()
            .unwrap_or_else(|| self.default_schema.clone());
        TableRef::new(schema.trim(), entry.name.trim())
    }

    /// Parses `schema.table` or a bare table name in the default schema.
    pub fn parse_table_name(&self, value: &str) -> TableRef {
        match value.split_once('.') {
            Some((schema, name)) => TableRef::new(schema.trim(), name.trim()),
            None => TableRef::new(self.default_schema.trim(), value.trim()),
        }
    }

    pub fn resolver(&self) -> Result<TableResolver, ConfigError> {
        TableResolver::new(self.table_rules()).map_err(|e| ConfigError::invalid(e.to_string()))
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            csv: CsvOptions::default()
                .with_delimiter(self.delimiter)
                .with_mode(self.mode),
            max_batch_size: self.batch_size,
            timeout: Duration::from_secs(self.bulk_timeout_secs),
            table_lock: true,
            locale: self.locale.clone(),
        }
    }

    pub fn run_request(&self) -> Result<RunRequest, ConfigError> {
        Ok(RunRequest {
            input_dir: self.input_dir.clone(),
            work_dir: self.work_dir.clone(),
            resolver: self.resolver()?,
            options: self.load_options(),
        })
    }
}
