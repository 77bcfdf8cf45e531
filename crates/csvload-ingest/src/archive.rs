//! ZIP archive extraction.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::discovery::has_extension;
use crate::error::{IngestError, Result};

/// Extracts the CSV entries of `archive` into `staging/<archive stem>/`.
///
/// Entry folders are kept so same-named entries in different folders stay
/// distinct. Entries whose names would escape the staging folder are skipped.
/// Returns the extracted paths sorted by file name, then by full path.
pub fn extract_csv_entries(archive: &Path, staging: &Path) -> Result<Vec<PathBuf>> {
    let archive_error = |message: String| IngestError::Archive {
        path: archive.to_path_buf(),
        message,
    };

    let file = File::open(archive).map_err(|e| IngestError::file_read(archive, e))?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))
        .map_err(|e| archive_error(format!("failed to open archive: {e}")))?;

    let stem = archive
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    let target_dir = staging.join(stem);
    fs::create_dir_all(&target_dir).map_err(|e| IngestError::file_read(&target_dir, e))?;

    let mut extracted = Vec::new();
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| archive_error(format!("failed to read entry {index}: {e}")))?;
        if entry.is_dir() {
            continue;
        }
        let Some(entry_path) = entry.enclosed_name() else {
            warn!(
                archive = %archive.display(),
                entry = entry.name(),
                "skipping entry with unsafe path"
            );
            continue;
        };
        if !has_extension(&entry_path, "csv") {
            debug!(archive = %archive.display(), entry = entry.name(), "skipping non-CSV entry");
            continue;
        }

        let dest_path = target_dir.join(&entry_path);
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| IngestError::file_read(parent, e))?;
        }
        let mut dest = File::create(&dest_path).map_err(|e| IngestError::file_read(&dest_path, e))?;
        std::io::copy(&mut entry, &mut dest)
            .map_err(|e| archive_error(format!("failed to extract {}: {e}", entry.name())))?;
        debug!(
            archive = %archive.display(),
            entry = %dest_path.display(),
            "extracted entry"
        );
        extracted.push(dest_path);
    }

    extracted.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::file_name;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, contents) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extracts_csv_entries_only() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("daily.zip");
        write_zip(
            &archive,
            &[
                ("customers.csv", "Id\n1\n"),
                ("nested/orders.CSV", "Id\n2\n"),
                ("readme.txt", "ignore"),
            ],
        );

        let staging = dir.path().join("staging");
        let files = extract_csv_entries(&archive, &staging).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["customers.csv", "orders.CSV"]);
        assert!(files.iter().all(|p| p.starts_with(staging.join("daily"))));
        assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), "Id\n1\n");
    }

    #[test]
    fn test_same_named_entries_are_kept_apart() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("regions.zip");
        write_zip(
            &archive,
            &[
                ("north/Orders.csv", "Id\n1\n2\n"),
                ("south/Orders.csv", "Id\n3\n"),
            ],
        );

        let staging = dir.path().join("staging");
        let files = extract_csv_entries(&archive, &staging).unwrap();
        assert_eq!(
            files,
            vec![
                staging.join("regions/north/Orders.csv"),
                staging.join("regions/south/Orders.csv"),
            ]
        );
        assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), "Id\n1\n2\n");
        assert_eq!(std::fs::read_to_string(&files[1]).unwrap(), "Id\n3\n");
    }

    #[test]
    fn test_corrupt_archive_is_an_archive_error() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("broken.zip");
        std::fs::write(&archive, b"not a zip").unwrap();

        let result = extract_csv_entries(&archive, dir.path());
        assert!(matches!(result, Err(IngestError::Archive { .. })));
    }
}
