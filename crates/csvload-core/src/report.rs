//! Per-file outcomes and the run summary.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use csvload_model::TableRef;

use crate::error::LoadError;

/// Furthest stage a file reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileStage {
    Discovered,
    SchemaFetched,
    Parsed,
    Truncated,
    Loaded,
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovered => "Discovered",
            Self::SchemaFetched => "SchemaFetched",
            Self::Parsed => "Parsed",
            Self::Truncated => "Truncated",
            Self::Loaded => "Loaded",
        };
        f.write_str(name)
    }
}

/// Outcome of one file.
///
/// A failed file keeps the stage it had reached when the error occurred.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub table: Option<TableRef>,
    pub stage: FileStage,
    pub rows_loaded: u64,
    pub error: Option<LoadError>,
    pub duration: Duration,
}

impl FileReport {
    pub fn new(path: impl Into<PathBuf>, table: Option<TableRef>) -> Self {
        Self {
            path: path.into(),
            table,
            stage: FileStage::Discovered,
            rows_loaded: 0,
            error: None,
            duration: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }

    /// `Failed` or the reached stage, for display.
    pub fn status(&self) -> String {
        match &self.error {
            Some(error) => format!("Failed at {} ({})", self.stage, error.kind()),
            None => self.stage.to_string(),
        }
    }
}

/// Everything a run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
    /// Files that matched no table.
    pub skipped: Vec<PathBuf>,
    pub duration: Duration,
}

impl RunSummary {
    pub fn loaded(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|report| report.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|report| !report.is_success())
    }

    pub fn total_rows(&self) -> u64 {
        self.loaded().map(|report| report.rows_loaded).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
