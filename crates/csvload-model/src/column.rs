//! Column metadata as reported by the sink catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type a raw CSV field is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    Int32,
    Int64,
    Int16,
    /// Unsigned 8-bit integer (`tinyint`).
    Byte,
    Bool,
    Decimal,
    Float64,
    Float32,
    /// Calendar date with optional time of day.
    Date,
    Time,
    Guid,
    Text,
}

impl SemanticType {
    /// Maps a relational type name to its semantic type.
    ///
    /// Unknown type names are treated as text, which is loaded verbatim.
    pub fn from_sql_type(type_name: &str) -> Self {
        match type_name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Self::Int32,
            "bigint" => Self::Int64,
            "smallint" => Self::Int16,
            "tinyint" => Self::Byte,
            "bit" => Self::Bool,
            "decimal" | "numeric" | "money" | "smallmoney" => Self::Decimal,
            "float" => Self::Float64,
            "real" => Self::Float32,
            "date" | "datetime" | "datetime2" | "smalldatetime" | "datetimeoffset" => Self::Date,
            "time" => Self::Time,
            "uniqueidentifier" => Self::Guid,
            _ => Self::Text,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Int16 => "Int16",
            Self::Byte => "Byte",
            Self::Bool => "Bool",
            Self::Decimal => "Decimal",
            Self::Float64 => "Float64",
            Self::Float32 => "Float32",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Guid => "Guid",
            Self::Text => "Text",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Self::Int16 | Self::Int32 | Self::Int64 | Self::Byte)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one destination column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// 1-based ordinal position in the table.
    pub ordinal: u32,
    pub name: String,
    /// Type name as declared in the sink (e.g. `nvarchar`).
    pub sql_type: String,
    pub semantic_type: SemanticType,
    /// Maximum length in characters (text only; `None` when unbounded).
    pub max_length: Option<usize>,
    /// Total digits (decimal only).
    pub precision: Option<u32>,
    /// Digits after the decimal point (decimal only).
    pub scale: Option<u32>,
}

impl ColumnMeta {
    pub fn new(ordinal: u32, name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        let sql_type = sql_type.into();
        Self {
            ordinal,
            name: name.into(),
            semantic_type: SemanticType::from_sql_type(&sql_type),
            sql_type,
            max_length: None,
            precision: None,
            scale: None,
        }
    }

    /// Sets the maximum length; only honoured for text columns.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        if self.semantic_type == SemanticType::Text {
            self.max_length = Some(max_length);
        }
        self
    }

    /// Sets precision and scale; only honoured for decimal columns.
    #[must_use]
    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        if self.semantic_type == SemanticType::Decimal {
            self.precision = Some(precision);
            self.scale = Some(scale);
        }
        self
    }

    /// Human-readable declared type, e.g. `nvarchar(50)` or `decimal(10,2)`.
    pub fn declared_type(&self) -> String {
        match (self.max_length, self.precision, self.scale) {
            (Some(length), _, _) => format!("{}({length})", self.sql_type),
            (None, Some(precision), Some(scale)) => {
                format!("{}({precision},{scale})", self.sql_type)
            }
            _ => self.sql_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_sql_type_names() {
        assert_eq!(SemanticType::from_sql_type("INT"), SemanticType::Int32);
        assert_eq!(SemanticType::from_sql_type("tinyint"), SemanticType::Byte);
        assert_eq!(SemanticType::from_sql_type("money"), SemanticType::Decimal);
        assert_eq!(SemanticType::from_sql_type("datetime2"), SemanticType::Date);
        assert_eq!(SemanticType::from_sql_type("real"), SemanticType::Float32);
        assert_eq!(
            SemanticType::from_sql_type("uniqueidentifier"),
            SemanticType::Guid
        );
        assert_eq!(SemanticType::from_sql_type("nvarchar"), SemanticType::Text);
        assert_eq!(SemanticType::from_sql_type("geography"), SemanticType::Text);
    }

    #[test]
    fn length_only_applies_to_text() {
        let id = ColumnMeta::new(1, "Id", "int").with_max_length(10);
        assert_eq!(id.max_length, None);
        let name = ColumnMeta::new(2, "Name", "nvarchar").with_max_length(50);
        assert_eq!(name.max_length, Some(50));
        assert_eq!(name.declared_type(), "nvarchar(50)");
    }

    #[test]
    fn precision_only_applies_to_decimal() {
        let amount = ColumnMeta::new(3, "Amount", "decimal").with_precision(10, 2);
        assert_eq!(amount.declared_type(), "decimal(10,2)");
        let flag = ColumnMeta::new(4, "Flag", "bit").with_precision(10, 2);
        assert_eq!(flag.precision, None);
    }
}
