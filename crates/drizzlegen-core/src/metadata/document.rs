//! The metadata document consumed by the generator.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::column::ColumnMetadata;
use super::constraint::UniqueConstraint;
use super::table::TableMetadata;
use crate::error::Result;

/// One table entry of the document, before key metadata is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Table name.
    pub table_name: String,
    /// Columns in any order.
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
}

/// A metadata snapshot: tables, primary keys and unique constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    /// Tables in output order.
    #[serde(default)]
    pub tables: Vec<TableEntry>,
    /// Primary-key column names keyed by table name.
    #[serde(default)]
    pub primary_keys: HashMap<String, Vec<String>>,
    /// Unique constraints across all tables.
    #[serde(default)]
    pub unique_constraints: Vec<UniqueConstraint>,
}

impl MetadataDocument {
    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a document file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Assemble tables with their primary keys and unique constraints, in
    /// document order.
    pub fn into_tables(self) -> Result<Vec<TableMetadata>> {
        let MetadataDocument {
            tables,
            mut primary_keys,
            unique_constraints,
        } = self;

        let mut assembled: Vec<TableMetadata> = tables
            .into_iter()
            .map(|entry| {
                let primary_key = primary_keys.remove(&entry.table_name).unwrap_or_default();
                TableMetadata::new(entry.table_name, entry.columns).with_primary_key(primary_key)
            })
            .collect();

        for table in &assembled {
            table.validate()?;
        }

        for constraint in unique_constraints {
            match assembled.iter_mut().find(|t| t.name == constraint.table) {
                Some(table) => table.unique_constraints.push(constraint),
                None => warn!(
                    constraint = %constraint.name,
                    table = %constraint.table,
                    "Skipping unique constraint for unknown table"
                ),
            }
        }

        for table in primary_keys.keys() {
            debug!(table = %table, "Ignoring primary key for unknown table");
        }

        Ok(assembled)
    }
}
