//! drizzlegen core - PostgreSQL metadata to Drizzle ORM table declarations.
//!
//! The pipeline is a pure transformation over a metadata snapshot:
//!
//! 1. [`MetadataDocument`] is parsed from the JSON produced by `psql`
//!    (see [`introspect`]) or supplied by the caller.
//! 2. Each column is mapped to a [`ColumnType`] by an ordered rule table
//!    ([`types`]), its raw default translated into a [`DefaultClause`]
//!    ([`defaults`]), and its name converted to camelCase ([`casing`]).
//! 3. [`emit`] composes a [`FieldDeclaration`] per column and [`render`]
//!    assembles `pgTable` declarations into a TypeScript module.
//!
//! # Usage
//!
//! ```rust
//! use drizzlegen_core::{generate, MetadataDocument, RenderOptions};
//!
//! let document = MetadataDocument::from_json(r#"{
//!     "tables": [{"table_name": "users", "columns": [
//!         {"column_name": "id", "data_type": "integer", "udt_name": "serial4",
//!          "is_nullable": "NO", "ordinal_position": 1}
//!     ]}],
//!     "primary_keys": {"users": ["id"]}
//! }"#).unwrap();
//!
//! let source = generate(document, &RenderOptions::default()).unwrap();
//! assert!(source.contains("id: serial().primaryKey(),"));
//! ```

pub mod casing;
pub mod defaults;
pub mod emit;
pub mod error;
pub mod introspect;
pub mod metadata;
pub mod render;
pub mod types;

pub use casing::{to_camel_case, to_pascal_case};
pub use defaults::{translate_default, DefaultClause, DefaultRule, DEFAULT_RULES};
pub use emit::{emit_field, emit_fields, FieldDeclaration};
pub use error::{Error, Result};
pub use introspect::{fetch_metadata, metadata_query, IntrospectConfig};
pub use metadata::{ColumnMetadata, MetadataDocument, TableEntry, TableMetadata, UniqueConstraint};
pub use render::{
    generate_tables, render_imports, render_module, GeneratedTable, RenderOptions,
    UniqueDeclaration,
};
pub use types::{map_type, ColumnType, TypeMapping, TypeRule, TYPE_RULES};

/// Generate a TypeScript module from a metadata document.
pub fn generate(document: MetadataDocument, options: &RenderOptions) -> Result<String> {
    let tables = generate_tables(&document.into_tables()?);
    Ok(render_module(&tables, options))
}
