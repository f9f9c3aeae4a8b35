//! Field declaration emission.

use serde::Serialize;
use tracing::debug;

use crate::casing::to_camel_case;
use crate::defaults::{translate_default, DefaultClause};
use crate::metadata::{ColumnMetadata, TableMetadata};
use crate::types::{map_type, quote, ColumnType};

/// One generated field of a `pgTable` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDeclaration {
    /// Field name in the generated object (camelCase).
    pub field_name: String,
    /// Source column name.
    pub column_name: String,
    /// Mapped column type.
    pub column_type: ColumnType,
    /// Default clause, if the raw default was recognized.
    pub default: Option<DefaultClause>,
    /// Column is the single-column primary key.
    pub primary_key: bool,
    /// Emit `.notNull()`. Never set together with `primary_key`.
    pub not_null: bool,
    /// The type fell back to `text`.
    pub fallback: bool,
    /// Source ordinal position.
    pub ordinal_position: u32,
}

impl FieldDeclaration {
    /// Column name passed to the builder, when it differs from the field name.
    pub fn name_override(&self) -> Option<&str> {
        (self.field_name != self.column_name).then_some(self.column_name.as_str())
    }

    /// Builder chain: type, name override, default, primary key, not null.
    pub fn expression(&self) -> String {
        let mut expr = self.column_type.render(self.name_override());
        if let Some(default) = &self.default {
            expr.push_str(&default.render());
        }
        if self.primary_key {
            expr.push_str(".primaryKey()");
        }
        if self.not_null {
            expr.push_str(".notNull()");
        }
        expr
    }

    /// Object property key for the field.
    pub fn key(&self) -> String {
        property_key(&self.field_name)
    }

    /// The declaration line, without indentation.
    pub fn line(&self) -> String {
        format!("{}: {},", self.key(), self.expression())
    }
}

/// Build the declaration for one column of `table`.
pub fn emit_field(table: &TableMetadata, column: &ColumnMetadata) -> FieldDeclaration {
    let mapping = map_type(column);
    // Multi-column keys are declared once in the table extras.
    let primary_key = table.is_primary_key(&column.column_name) && !table.has_composite_key();

    FieldDeclaration {
        field_name: to_camel_case(&column.column_name),
        column_name: column.column_name.clone(),
        column_type: mapping.column_type,
        default: translate_default(column.default_expr()),
        primary_key,
        not_null: !column.is_nullable && !primary_key,
        fallback: mapping.fallback,
        ordinal_position: column.ordinal_position,
    }
}

/// Build declarations for every column, in ordinal order.
pub fn emit_fields(table: &TableMetadata) -> Vec<FieldDeclaration> {
    debug!(table = %table.name, columns = table.columns.len(), "Emitting fields");
    let mut columns: Vec<&ColumnMetadata> = table.columns.iter().collect();
    columns.sort_by_key(|c| c.ordinal_position);
    columns
        .into_iter()
        .map(|column| emit_field(table, column))
        .collect()
}

/// Check if `name` can be used as a bare TypeScript identifier.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Object key, quoted when it is not an identifier.
pub(crate) fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        quote(name)
    }
}
