//! Uniqueness constraint metadata.

use serde::{Deserialize, Serialize};

/// A uniqueness constraint (single or composite).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    /// Constraint name.
    #[serde(rename = "constraint_name")]
    pub name: String,
    /// Table this constraint applies to.
    #[serde(rename = "table_name")]
    pub table: String,
    /// Columns that must be unique together, in key order.
    #[serde(rename = "column_names")]
    pub columns: Vec<String>,
}

impl UniqueConstraint {
    /// Create a unique constraint on a single column.
    pub fn single(
        name: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: vec![column.into()],
        }
    }

    /// Create a composite unique constraint.
    pub fn composite(
        name: impl Into<String>,
        table: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}
