//! Reader options: delimiter and strictness.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// How the reader treats structural defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvMode {
    /// Fail the file on the first structural defect.
    #[default]
    Strict,
    /// Log defects, substitute empty fields and keep reading.
    Tolerant,
}

/// Field delimiter, fixed or sniffed from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Delimiter {
    /// Pick the most frequent of `,` `;` `|` TAB in the header line.
    Auto,
    Char(u8),
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::Char(b',')
    }
}

impl FromStr for Delimiter {
    type Err = IngestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "auto" | "AUTO" => Ok(Self::Auto),
            "tab" | "\\t" | "\t" => Ok(Self::Char(b'\t')),
            other if other.len() == 1 && other.is_ascii() => Ok(Self::Char(other.as_bytes()[0])),
            other => Err(IngestError::InvalidDelimiter {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Delimiter {
    type Error = IngestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Delimiter> for String {
    fn from(value: Delimiter) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Char(b'\t') => f.write_str("\\t"),
            Self::Char(byte) => write!(f, "{}", char::from(*byte)),
        }
    }
}

/// Options for [`read_rows`](super::read_rows).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: Delimiter,
    pub mode: CsvMode,
}

impl CsvOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: CsvMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.mode == CsvMode::Strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_delimiters() {
        assert_eq!("auto".parse::<Delimiter>().unwrap(), Delimiter::Auto);
        assert_eq!(";".parse::<Delimiter>().unwrap(), Delimiter::Char(b';'));
        assert_eq!("\\t".parse::<Delimiter>().unwrap(), Delimiter::Char(b'\t'));
        assert!("::".parse::<Delimiter>().is_err());
    }

    #[test]
    fn delimiter_display_round_trips_tab() {
        assert_eq!(Delimiter::Char(b'\t').to_string(), "\\t");
        assert_eq!(Delimiter::Char(b'|').to_string(), "|");
    }
}
