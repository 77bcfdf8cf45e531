//! Typed values produced by coercion.

use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::column::SemanticType;

/// A coerced field, one variant per [`SemanticType`] plus an explicit null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Null,
    Int32(i32),
    Int64(i64),
    Int16(i16),
    Byte(u8),
    Bool(bool),
    Decimal(Decimal),
    Float64(f64),
    Float32(f32),
    Date(NaiveDateTime),
    Time(NaiveTime),
    Guid(Uuid),
    Text(String),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Semantic type of the value; `None` for null.
    pub fn semantic_type(&self) -> Option<SemanticType> {
        let ty = match self {
            Self::Null => return None,
            Self::Int32(_) => SemanticType::Int32,
            Self::Int64(_) => SemanticType::Int64,
            Self::Int16(_) => SemanticType::Int16,
            Self::Byte(_) => SemanticType::Byte,
            Self::Bool(_) => SemanticType::Bool,
            Self::Decimal(_) => SemanticType::Decimal,
            Self::Float64(_) => SemanticType::Float64,
            Self::Float32(_) => SemanticType::Float32,
            Self::Date(_) => SemanticType::Date,
            Self::Time(_) => SemanticType::Time,
            Self::Guid(_) => SemanticType::Guid,
            Self::Text(_) => SemanticType::Text,
        };
        Some(ty)
    }
}

/// One value per schema column, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TypedRow {
    values: Vec<TypedValue>,
}

impl TypedRow {
    pub fn new(values: Vec<TypedValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[TypedValue] {
        &self.values
    }

    pub fn get(&self, position: usize) -> Option<&TypedValue> {
        self.values.get(position)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<TypedValue> {
        self.values
    }
}
