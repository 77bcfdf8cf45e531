//! Data model shared by the csvload crates.
//!
//! Column metadata and table schemas are discovered from the sink at runtime,
//! so values are carried in a tagged [`TypedValue`] rather than static types.

pub mod column;
pub mod lookup;
pub mod row;
pub mod schema;
pub mod value;

pub use column::{ColumnMeta, SemanticType};
pub use lookup::CaseInsensitiveIndex;
pub use row::{ColumnNames, RawRow};
pub use schema::{TableRef, TableSchema};
pub use value::{TypedRow, TypedValue};
