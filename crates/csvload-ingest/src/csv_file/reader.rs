//! Lazy CSV row reader.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::csv::{ByteRecord, ReaderBuilder};
use csvload_model::{ColumnNames, RawRow};
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use super::header::{detect_delimiter, validate_headers};
use super::options::{CsvMode, CsvOptions, Delimiter};
use crate::error::{IngestError, Result};

/// Forward-only sequence of rows from one CSV file.
///
/// Strict readers stop after the first error. Reopen the file to read it again.
pub struct CsvRows {
    path: PathBuf,
    reader: ::csv::Reader<Box<dyn BufRead>>,
    columns: Arc<ColumnNames>,
    mode: CsvMode,
    record: ByteRecord,
    done: bool,
}

/// Opens `path` and reads its header row.
///
/// Fails with [`IngestError::MalformedCsv`] when the file has no header row,
/// or, in strict mode, when header names are empty or duplicated.
pub fn read_rows(path: &Path, options: &CsvOptions) -> Result<CsvRows> {
    let mut source = open_source(path)?;
    let delimiter = match options.delimiter {
        Delimiter::Char(byte) => byte,
        Delimiter::Auto => {
            let head = source
                .fill_buf()
                .map_err(|e| IngestError::file_read(path, e))?;
            let first_line = head.split(|b| *b == b'\n').next().unwrap_or_default();
            let detected = detect_delimiter(&String::from_utf8_lossy(first_line));
            debug!(
                file = %path.display(),
                delimiter = %char::from(detected).escape_default(),
                "detected delimiter"
            );
            detected
        }
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut record = ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) if is_blank(&record) => continue,
            Ok(true) => break,
            Ok(false) => return Err(IngestError::malformed(path, 1, "missing header row")),
            Err(error) => return Err(csv_error(path, error)),
        }
    }

    let line = record_line(&record);
    let raw = record
        .iter()
        .enumerate()
        .map(|(idx, bytes)| decode_field(path, line, idx, bytes, options.mode))
        .collect::<Result<Vec<_>>>()?;
    let headers = validate_headers(path, line, raw, options.mode)?;

    Ok(CsvRows {
        path: path.to_path_buf(),
        reader,
        columns: Arc::new(ColumnNames::new(headers)),
        mode: options.mode,
        record,
        done: false,
    })
}

impl CsvRows {
    /// Header names in file order.
    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn build_row(&self) -> Result<RawRow> {
        let line = record_line(&self.record);
        let expected = self.columns.len();
        let found = self.record.len();
        if found != expected {
            if self.mode == CsvMode::Strict {
                return Err(IngestError::malformed(
                    &self.path,
                    line,
                    format!("expected {expected} fields, found {found}"),
                ));
            }
            warn!(
                file = %self.path.display(),
                line,
                expected,
                found,
                "field count mismatch, missing fields left empty"
            );
        }

        let mut values = Vec::with_capacity(expected);
        for idx in 0..expected {
            let value = match self.record.get(idx) {
                Some(bytes) => Some(decode_field(&self.path, line, idx, bytes, self.mode)?),
                None => None,
            };
            values.push(value.filter(|text| !text.trim().is_empty()));
        }
        Ok(RawRow::new(line, Arc::clone(&self.columns), values))
    }
}

impl Iterator for CsvRows {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.reader.read_byte_record(&mut self.record) {
                Ok(true) if is_blank(&self.record) => continue,
                Ok(true) => {
                    let row = self.build_row();
                    self.done = row.is_err();
                    return Some(row);
                }
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(error) => {
                    self.done = true;
                    return Some(Err(csv_error(&self.path, error)));
                }
            }
        }
    }
}

/// Opens a file, stripping a UTF-8 BOM and decoding UTF-16 input.
fn open_source(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| IngestError::file_read(path, e))?;
    let mut reader = BufReader::new(file);
    let bom = Encoding::for_bom(reader.fill_buf().map_err(|e| IngestError::file_read(path, e))?);

    match bom {
        Some((encoding, bom_length)) if encoding == UTF_8 => {
            reader.consume(bom_length);
            Ok(Box::new(reader))
        }
        Some((encoding, _)) => {
            let mut bytes = Vec::new();
            reader
                .read_to_end(&mut bytes)
                .map_err(|e| IngestError::file_read(path, e))?;
            let (text, had_errors) = encoding.decode_with_bom_removal(&bytes);
            if had_errors {
                warn!(
                    file = %path.display(),
                    encoding = encoding.name(),
                    "undecodable characters replaced"
                );
            }
            debug!(file = %path.display(), encoding = encoding.name(), "decoded input");
            Ok(Box::new(Cursor::new(text.into_owned().into_bytes())))
        }
        None => Ok(Box::new(reader)),
    }
}

fn decode_field(path: &Path, line: u64, idx: usize, bytes: &[u8], mode: CsvMode) -> Result<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) if mode == CsvMode::Strict => Err(IngestError::malformed(
            path,
            line,
            format!("invalid UTF-8 in field {}", idx + 1),
        )),
        Err(_) => {
            warn!(
                file = %path.display(),
                line,
                field = idx + 1,
                "invalid UTF-8 replaced"
            );
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// A line with no delimiter and nothing but whitespace. Lines made of
/// delimiters only are rows of empty fields, not blank lines.
fn is_blank(record: &ByteRecord) -> bool {
    record.len() == 1 && record[0].iter().all(u8::is_ascii_whitespace)
}

fn record_line(record: &ByteRecord) -> u64 {
    record.position().map_or(0, ::csv::Position::line)
}

fn csv_error(path: &Path, error: ::csv::Error) -> IngestError {
    let line = error.position().map_or(0, ::csv::Position::line);
    let message = error.to_string();
    match error.into_kind() {
        ::csv::ErrorKind::Io(source) => IngestError::file_read(path, source),
        _ => IngestError::malformed(path, line, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    fn collect(rows: CsvRows) -> Vec<RawRow> {
        rows.collect::<Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_reads_header_and_rows() {
        let file = create_temp_csv(b"Id,Name,Amount\n1,Ana,100.50\n2,Luis,\n");
        let rows = read_rows(file.path(), &CsvOptions::default()).unwrap();
        assert_eq!(rows.columns().names(), &["Id", "Name", "Amount"]);

        let rows = collect(rows);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some("Ana"));
        assert_eq!(rows[1].get("Amount"), None);
        assert_eq!(rows[1].line(), 3);
    }

    #[test]
    fn test_skips_blank_lines_and_nulls_whitespace() {
        let file = create_temp_csv(b"A,B\n\n1,   \n   \n , \n2,x\n");
        let rows = collect(read_rows(file.path(), &CsvOptions::default()).unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].get("A"), Some("1"));
        assert_eq!(rows[0].get("B"), None);
        assert_eq!(rows[1].get("A"), None);
        assert_eq!(rows[1].get("B"), None);
        assert_eq!(rows[2].get("B"), Some("x"));
    }

    #[test]
    fn test_delimiter_only_line_is_a_row_of_nulls() {
        let file = create_temp_csv(b"OrderId,Note\n1,a\n,\n2,b\n");
        let rows = collect(read_rows(file.path(), &CsvOptions::default()).unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[1].get("OrderId"), None);
        assert_eq!(rows[1].get("Note"), None);
        assert_eq!(rows[2].get("OrderId"), Some("2"));
    }

    #[test]
    fn test_strict_rejects_delimiter_only_line_of_wrong_width() {
        let file = create_temp_csv(b"A,B,C\n1,2,3\n,,,,\n");
        let mut rows = read_rows(file.path(), &CsvOptions::default()).unwrap();
        assert!(rows.next().unwrap().is_ok());
        let error = rows.next().unwrap().unwrap_err();
        assert!(matches!(error, IngestError::MalformedCsv { line: 3, .. }));
    }

    #[test]
    fn test_tolerant_cuts_delimiter_only_line_to_header_width() {
        let file = create_temp_csv(b"A,B,C\n,,,,\n");
        let options = CsvOptions::default().with_mode(CsvMode::Tolerant);
        let rows = collect(read_rows(file.path(), &options).unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 3);
        assert!((0..3).all(|idx| rows[0].value_at(idx).is_none()));
    }

    #[test]
    fn test_quoted_fields() {
        let file = create_temp_csv(b"A,B\n\"hello, world\",\"he said \"\"hi\"\"\"\n");
        let rows = collect(read_rows(file.path(), &CsvOptions::default()).unwrap());
        assert_eq!(rows[0].get("A"), Some("hello, world"));
        assert_eq!(rows[0].get("B"), Some("he said \"hi\""));
    }

    #[test]
    fn test_strips_utf8_bom() {
        let file = create_temp_csv(b"\xEF\xBB\xBFId,Name\n1,Ana\n");
        let rows = read_rows(file.path(), &CsvOptions::default()).unwrap();
        assert_eq!(rows.columns().names(), &["Id", "Name"]);
    }

    #[test]
    fn test_decodes_utf16_le() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Id,Name\n1,José\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let file = create_temp_csv(&bytes);
        let rows = collect(read_rows(file.path(), &CsvOptions::default()).unwrap());
        assert_eq!(rows[0].get("Name"), Some("José"));
    }

    #[test]
    fn test_auto_delimiter() {
        let file = create_temp_csv(b"Id;Name\n1;Ana\n");
        let options = CsvOptions::default().with_delimiter(Delimiter::Auto);
        let rows = collect(read_rows(file.path(), &options).unwrap());
        assert_eq!(rows[0].get("Name"), Some("Ana"));
    }

    #[test]
    fn test_strict_short_row_fails_after_valid_rows() {
        let file = create_temp_csv(b"A,B,C\n1,2,3\n4,5\n6,7,8\n");
        let mut rows = read_rows(file.path(), &CsvOptions::default()).unwrap();
        assert!(rows.next().unwrap().is_ok());
        let error = rows.next().unwrap().unwrap_err();
        assert!(matches!(error, IngestError::MalformedCsv { line: 3, .. }));
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_tolerant_pads_short_rows_and_cuts_long_rows() {
        let file = create_temp_csv(b"A,B,C\n1,2\n3,4,5,6\n");
        let options = CsvOptions::default().with_mode(CsvMode::Tolerant);
        let rows = collect(read_rows(file.path(), &options).unwrap());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("C"), None);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].get("C"), Some("5"));
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_strict_rejects_invalid_utf8() {
        let file = create_temp_csv(b"A\n\xFF\xFE\x00x\n");
        let mut rows = read_rows(file.path(), &CsvOptions::default()).unwrap();
        assert!(matches!(
            rows.next(),
            Some(Err(IngestError::MalformedCsv { .. }))
        ));
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let file = create_temp_csv(b"");
        let result = read_rows(file.path(), &CsvOptions::default());
        assert!(matches!(result, Err(IngestError::MalformedCsv { .. })));
    }

    #[test]
    fn test_header_only_file_has_no_rows() {
        let file = create_temp_csv(b"Id,Name\n");
        let rows = collect(read_rows(file.path(), &CsvOptions::default()).unwrap());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = read_rows(Path::new("/definitely/not/here.csv"), &CsvOptions::default());
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
