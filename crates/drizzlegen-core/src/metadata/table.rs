//! Table metadata.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::column::ColumnMetadata;
use super::constraint::UniqueConstraint;
use crate::casing::to_camel_case;
use crate::error::{Error, Result};

/// A table with its columns and key metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    /// Table name (snake_case).
    pub name: String,
    /// Columns, ordered by ordinal position.
    pub columns: Vec<ColumnMetadata>,
    /// Names of the primary-key columns.
    pub primary_key: BTreeSet<String>,
    /// Unique constraints declared on the table.
    pub unique_constraints: Vec<UniqueConstraint>,
}

impl TableMetadata {
    /// Create a table. Columns are ordered by ordinal position; ties keep
    /// their input order.
    pub fn new(name: impl Into<String>, columns: impl IntoIterator<Item = ColumnMetadata>) -> Self {
        let mut columns: Vec<ColumnMetadata> = columns.into_iter().collect();
        columns.sort_by_key(|c| c.ordinal_position);
        Self {
            name: name.into(),
            columns,
            primary_key: BTreeSet::new(),
            unique_constraints: Vec::new(),
        }
    }

    /// Set the primary-key columns.
    pub fn with_primary_key(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a unique constraint.
    pub fn with_unique(mut self, constraint: UniqueConstraint) -> Self {
        self.unique_constraints.push(constraint);
        self
    }

    /// Get a column by source name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    /// Check if a column belongs to the primary key.
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key.contains(column)
    }

    /// Check if the primary key spans more than one column.
    pub fn has_composite_key(&self) -> bool {
        self.primary_key.len() > 1
    }

    /// Reject tables whose column names, or the field names derived from
    /// them, are not unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.columns.len());
        let mut fields: HashMap<String, &str> = HashMap::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.column_name.as_str()) {
                return Err(Error::InvalidMetadata(format!(
                    "table {:?} has duplicate column {:?}",
                    self.name, column.column_name
                )));
            }
            let field = to_camel_case(&column.column_name);
            if let Some(previous) = fields.insert(field.clone(), &column.column_name) {
                return Err(Error::InvalidMetadata(format!(
                    "table {:?}: columns {:?} and {:?} both map to field {:?}",
                    self.name, previous, column.column_name, field
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_sorted_by_ordinal() {
        let table = TableMetadata::new(
            "users",
            [
                ColumnMetadata::new("email", "text", "text", 3),
                ColumnMetadata::new("id", "integer", "int4", 1),
                ColumnMetadata::new("name", "text", "text", 2),
            ],
        );

        let names: Vec<_> = table.columns.iter().map(|c| c.column_name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "email"]);
    }

    #[test]
    fn test_equal_ordinals_keep_input_order() {
        let table = TableMetadata::new(
            "t",
            [
                ColumnMetadata::new("b", "text", "text", 1),
                ColumnMetadata::new("a", "text", "text", 1),
            ],
        );

        assert_eq!(table.columns[0].column_name, "b");
        assert_eq!(table.columns[1].column_name, "a");
    }

    #[test]
    fn test_primary_key_lookup() {
        let table = TableMetadata::new("users", [ColumnMetadata::new("id", "integer", "int4", 1)])
            .with_primary_key(["id"]);

        assert!(table.is_primary_key("id"));
        assert!(!table.is_primary_key("name"));
        assert!(table.get_column("id").is_some());
        assert!(table.get_column("missing").is_none());
    }

    #[test]
    fn test_validate_rejects_duplicate_columns() {
        let table = TableMetadata::new(
            "users",
            [
                ColumnMetadata::new("id", "integer", "int4", 1),
                ColumnMetadata::new("id", "text", "text", 2),
            ],
        );

        assert!(matches!(table.validate(), Err(Error::InvalidMetadata(_))));
    }

    #[test]
    fn test_validate_rejects_colliding_field_names() {
        for (a, b) in [("user_id", "userId"), ("a_b", "a__b")] {
            let table = TableMetadata::new(
                "accounts",
                [
                    ColumnMetadata::new(a, "integer", "int4", 1),
                    ColumnMetadata::new(b, "integer", "int4", 2),
                ],
            );

            let err = table.validate().unwrap_err();
            assert!(err.to_string().contains("both map to field"), "{err}");
        }
    }

    #[test]
    fn test_validate_accepts_distinct_fields() {
        let table = TableMetadata::new(
            "accounts",
            [
                ColumnMetadata::new("user_id", "integer", "int4", 1),
                ColumnMetadata::new("user_name", "text", "text", 2),
            ],
        );

        assert!(table.validate().is_ok());
        assert!(!table.has_composite_key());
    }
}
