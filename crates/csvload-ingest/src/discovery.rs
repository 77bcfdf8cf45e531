//! Input folder discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Kind of file found in the input folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Csv,
    Archive,
}

/// A loadable file or an archive holding loadable files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub kind: InputKind,
}

impl InputFile {
    /// File name for logs and reports.
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

/// Lists CSV files and ZIP archives directly inside `dir`.
///
/// Subdirectories and other files are ignored. Results are sorted by file name.
pub fn discover_inputs(dir: &Path) -> Result<Vec<InputFile>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut inputs = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let kind = if has_extension(&path, "csv") {
            InputKind::Csv
        } else if has_extension(&path, "zip") {
            InputKind::Archive
        } else {
            continue;
        };
        inputs.push(InputFile { path, kind });
    }

    inputs.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(inputs)
}
