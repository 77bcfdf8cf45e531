//! Per-column value coercion.

use csvload_model::{ColumnMeta, RawRow, SemanticType, TableSchema, TypedRow, TypedValue};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::datetime::{parse_date, parse_time};
use crate::error::{ConversionError, Result};
use crate::locale::NumberLocale;
use crate::numeric::{parse_bool, parse_decimal, parse_f32, parse_f64, parse_integer};
use crate::reconcile::ColumnPlan;

/// Converts raw CSV fields into typed values.
#[derive(Debug, Clone, Default)]
pub struct Coercer {
    regional: NumberLocale,
}

impl Coercer {
    /// Creates a coercer whose first decimal pass uses `regional`.
    pub fn new(regional: NumberLocale) -> Self {
        Self { regional }
    }

    pub fn regional(&self) -> &NumberLocale {
        &self.regional
    }

    /// Coerces one field. Null and whitespace-only input yields [`TypedValue::Null`].
    pub fn coerce(&self, raw: Option<&str>, column: &ColumnMeta) -> Result<TypedValue> {
        Ok(self.convert(raw, column)?)
    }

    fn convert(
        &self,
        raw: Option<&str>,
        column: &ColumnMeta,
    ) -> std::result::Result<TypedValue, ConversionError> {
        let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
            return Ok(TypedValue::Null);
        };
        let fail = |reason: &str| ConversionError::new(column, raw, reason);

        let value = match column.semantic_type {
            SemanticType::Int32 => parse_integer(raw)
                .map(TypedValue::Int32)
                .ok_or_else(|| fail("not a 32-bit integer"))?,
            SemanticType::Int64 => parse_integer(raw)
                .map(TypedValue::Int64)
                .ok_or_else(|| fail("not a 64-bit integer"))?,
            SemanticType::Int16 => parse_integer(raw)
                .map(TypedValue::Int16)
                .ok_or_else(|| fail("not a 16-bit integer"))?,
            SemanticType::Byte => parse_integer(raw)
                .map(TypedValue::Byte)
                .ok_or_else(|| fail("not an integer between 0 and 255"))?,
            SemanticType::Bool => parse_bool(raw)
                .map(TypedValue::Bool)
                .ok_or_else(|| fail("expected 1/0, true/false or S/N"))?,
            SemanticType::Decimal => {
                let value = parse_decimal(raw, &self.regional)
                    .ok_or_else(|| fail("not a decimal number"))?;
                TypedValue::Decimal(fit_precision(value, column).ok_or_else(|| {
                    fail("value exceeds the declared precision")
                })?)
            }
            SemanticType::Float64 => parse_f64(raw)
                .map(TypedValue::Float64)
                .ok_or_else(|| fail("not a floating-point number"))?,
            SemanticType::Float32 => parse_f32(raw)
                .map(TypedValue::Float32)
                .ok_or_else(|| fail("not a single-precision number"))?,
            SemanticType::Date => parse_date(raw)
                .map(TypedValue::Date)
                .ok_or_else(|| fail("not a recognised date"))?,
            SemanticType::Time => parse_time(raw)
                .map(TypedValue::Time)
                .ok_or_else(|| fail("not a time of day"))?,
            SemanticType::Guid => parse_guid(raw)
                .map(TypedValue::Guid)
                .ok_or_else(|| fail("not a hyphenated GUID"))?,
            SemanticType::Text => TypedValue::Text(truncate_text(raw, column.max_length)),
        };
        Ok(value)
    }

    /// Coerces a row into schema order using the reconciled `plan`.
    ///
    /// Conversion errors carry the row's source line.
    pub fn coerce_row(&self, row: &RawRow, plan: &ColumnPlan, schema: &TableSchema) -> Result<TypedRow> {
        let mut values = Vec::with_capacity(schema.len());
        for (position, column) in schema.columns().iter().enumerate() {
            let raw = plan
                .source_position(position)
                .and_then(|source| row.value_at(source));
            let value = self
                .convert(raw, column)
                .map_err(|error| error.at_line(row.line()))?;
            values.push(value);
        }
        Ok(TypedRow::new(values))
    }
}

/// Rounds to the declared scale and rejects values with too many integral digits.
fn fit_precision(value: Decimal, column: &ColumnMeta) -> Option<Decimal> {
    let value = match column.scale {
        Some(scale) => value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero),
        None => value,
    };
    if let Some(precision) = column.precision {
        let allowed = precision.saturating_sub(column.scale.unwrap_or(0));
        let integral = value.abs().trunc();
        let digits = if integral.is_zero() {
            0
        } else {
            integral.normalize().to_string().len() as u32
        };
        if digits > allowed {
            return None;
        }
    }
    Some(value)
}

/// Canonical `8-4-4-4-12` form only.
fn parse_guid(raw: &str) -> Option<Uuid> {
    let value = raw.trim();
    if value.len() != 36 {
        return None;
    }
    Uuid::try_parse(value).ok()
}

/// Cuts text to `max_length` characters. Longer values are truncated silently.
fn truncate_text(raw: &str, max_length: Option<usize>) -> String {
    match max_length {
        Some(max) if raw.chars().count() > max => raw.chars().take(max).collect(),
        _ => raw.to_string(),
    }
}
