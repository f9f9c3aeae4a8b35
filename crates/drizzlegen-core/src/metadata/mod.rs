//! Database metadata model.
//!
//! Column, table and constraint records as reported by `information_schema`,
//! plus the document that bundles them for a single snapshot.

mod column;
mod constraint;
mod document;
mod table;

pub use column::ColumnMetadata;
pub use constraint::UniqueConstraint;
pub use document::{MetadataDocument, TableEntry};
pub use table::TableMetadata;
