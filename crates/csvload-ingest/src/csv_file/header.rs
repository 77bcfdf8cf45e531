//! Header normalization and delimiter sniffing.

use std::collections::HashSet;
use std::path::Path;

use csvload_model::lookup::fold;
use tracing::warn;

use super::options::CsvMode;
use crate::error::{IngestError, Result};

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'|', b'\t'];

/// Normalizes a header value by trimming whitespace and a stray BOM.
pub fn normalize_header(value: &str) -> String {
    value.trim().trim_matches('\u{feff}').trim().to_string()
}

/// Picks the delimiter candidate occurring most often in the header line.
///
/// Quoted sections are ignored. Ties go to the earlier candidate and a line
/// without any candidate falls back to a comma.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let mut counts = [0usize; DELIMITER_CANDIDATES.len()];
    let mut in_quotes = false;
    for byte in header_line.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(slot) = DELIMITER_CANDIDATES.iter().position(|c| *c == byte) {
            counts[slot] += 1;
        }
    }
    let best = (1..counts.len()).fold(0, |best, slot| {
        if counts[slot] > counts[best] { slot } else { best }
    });
    DELIMITER_CANDIDATES[best]
}

/// Validates header names.
///
/// Strict mode rejects empty and duplicate (case-insensitive) names. Tolerant
/// mode names empty headers `Column<N>` and keeps duplicates, of which only the
/// first occurrence is addressable.
pub fn validate_headers(
    path: &Path,
    line: u64,
    raw: Vec<String>,
    mode: CsvMode,
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (idx, value) in raw.into_iter().enumerate() {
        let mut name = normalize_header(&value);
        if name.is_empty() {
            if mode == CsvMode::Strict {
                return Err(IngestError::malformed(
                    path,
                    line,
                    format!("empty header name at position {}", idx + 1),
                ));
            }
            name = format!("Column{}", idx + 1);
            warn!(
                file = %path.display(),
                position = idx + 1,
                substitute = %name,
                "empty header name"
            );
        }
        if !seen.insert(fold(&name)) {
            if mode == CsvMode::Strict {
                return Err(IngestError::malformed(
                    path,
                    line,
                    format!("duplicate header name '{name}'"),
                ));
            }
            warn!(
                file = %path.display(),
                column = %name,
                "duplicate header name, later occurrence ignored"
            );
        }
        headers.push(name);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Id  "), "Id");
        assert_eq!(normalize_header("\u{feff}Id"), "Id");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("Id;Name;Amount"), b';');
        assert_eq!(detect_delimiter("Id,Name,Amount"), b',');
        assert_eq!(detect_delimiter("Id\tName"), b'\t');
        assert_eq!(detect_delimiter("\"a;b\",c,d"), b',');
        assert_eq!(detect_delimiter("Id"), b',');
    }

    #[test]
    fn test_strict_rejects_duplicates() {
        let raw = vec!["Id".to_string(), "ID".to_string()];
        let result = validate_headers(Path::new("t.csv"), 1, raw, CsvMode::Strict);
        assert!(matches!(result, Err(IngestError::MalformedCsv { line: 1, .. })));
    }

    #[test]
    fn test_strict_rejects_empty_names() {
        let raw = vec!["Id".to_string(), " ".to_string()];
        let result = validate_headers(Path::new("t.csv"), 1, raw, CsvMode::Strict);
        assert!(matches!(result, Err(IngestError::MalformedCsv { .. })));
    }

    #[test]
    fn test_tolerant_substitutes_empty_names() {
        let raw = vec!["Id".to_string(), "".to_string(), "Id".to_string()];
        let headers = validate_headers(Path::new("t.csv"), 1, raw, CsvMode::Tolerant).unwrap();
        assert_eq!(headers, vec!["Id", "Column2", "Id"]);
    }
}
