//! Schema-driven type coercion.
//!
//! [`reconcile`] binds CSV header names to schema columns, and [`Coercer`]
//! turns each raw field into the [`TypedValue`] its column declares.
//!
//! Numbers and dates arrive in a mix of regional and invariant notations.
//! Decimals are parsed with the regional convention first and the invariant
//! one second; dates try a fixed list of exact formats before a day-first
//! free-form parse. Both orders are part of the loading contract.
//!
//! [`TypedValue`]: csvload_model::TypedValue

pub mod coerce;
pub mod datetime;
pub mod error;
pub mod locale;
pub mod numeric;
pub mod reconcile;

pub use coerce::Coercer;
pub use error::{CoerceError, ConversionError, Result};
pub use locale::NumberLocale;
pub use reconcile::{ColumnPlan, reconcile};
