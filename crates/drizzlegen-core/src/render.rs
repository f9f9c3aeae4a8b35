//! TypeScript module rendering.

use std::collections::BTreeSet;
use std::fmt::Write;

use serde::Serialize;
use tracing::{debug, warn};

use crate::casing::{to_camel_case, to_pascal_case};
use crate::emit::{emit_fields, is_identifier, property_key, FieldDeclaration};
use crate::metadata::TableMetadata;
use crate::types::quote;

/// Builders in the order they are listed in the import line.
const IMPORT_ORDER: &[&str] = &[
    "pgTable",
    "unique",
    "primaryKey",
    "varchar",
    "text",
    "integer",
    "serial",
    "bigint",
    "bigserial",
    "numeric",
    "boolean",
    "timestamp",
    "json",
    "jsonb",
];

/// Options controlling module output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit import lines.
    pub imports: bool,
    /// Emit `$inferSelect` / `$inferInsert` type aliases per table.
    pub type_aliases: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            imports: true,
            type_aliases: false,
        }
    }
}

/// A unique constraint expressed in field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueDeclaration {
    /// Constraint name.
    pub name: String,
    /// Field names (camelCase), in key order.
    pub fields: Vec<String>,
}

/// Generated declarations for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedTable {
    /// Source table name.
    pub table_name: String,
    /// Exported constant name (camelCase).
    pub const_name: String,
    /// Row type name (PascalCase).
    pub type_name: String,
    /// Field declarations in ordinal order.
    pub fields: Vec<FieldDeclaration>,
    /// Field names of a multi-column primary key; empty otherwise.
    pub primary_key: Vec<String>,
    /// Unique constraints whose columns all exist.
    pub unique_constraints: Vec<UniqueDeclaration>,
}

impl GeneratedTable {
    /// Build the declarations for a table.
    pub fn from_table(table: &TableMetadata) -> Self {
        let fields = emit_fields(table);

        let unique_constraints = table
            .unique_constraints
            .iter()
            .filter_map(|constraint| {
                if constraint.columns.is_empty() {
                    warn!(
                        table = %table.name,
                        constraint = %constraint.name,
                        "Skipping unique constraint without columns"
                    );
                    return None;
                }
                let columns = constraint.columns.iter().map(String::as_str);
                let Some(fields) = resolve_fields(table, columns) else {
                    warn!(
                        table = %table.name,
                        constraint = %constraint.name,
                        "Skipping unique constraint with unknown columns"
                    );
                    return None;
                };
                Some(UniqueDeclaration {
                    name: constraint.name.clone(),
                    fields,
                })
            })
            .collect();

        let primary_key = if table.has_composite_key() {
            let mut columns: Vec<&str> = table.primary_key.iter().map(String::as_str).collect();
            columns.sort_by_key(|c| table.get_column(c).map(|c| c.ordinal_position));
            let resolved = resolve_fields(table, columns);
            if resolved.is_none() {
                warn!(table = %table.name, "Skipping primary key with unknown columns");
            }
            resolved.unwrap_or_default()
        } else {
            Vec::new()
        };

        debug!(table = %table.name, fields = fields.len(), "Generated table");

        Self {
            table_name: table.name.clone(),
            const_name: identifier(&to_camel_case(&table.name)),
            type_name: identifier(&to_pascal_case(&table.name)),
            fields,
            primary_key,
            unique_constraints,
        }
    }

    /// Number of fields whose type fell back to `text`.
    pub fn fallback_count(&self) -> usize {
        self.fields.iter().filter(|f| f.fallback).count()
    }

    /// Render the `pgTable` declaration.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "export const {} = pgTable({}, {{",
            self.const_name,
            quote(&self.table_name)
        );
        for field in &self.fields {
            let _ = writeln!(out, "\t{}", field.line());
        }

        if self.primary_key.is_empty() && self.unique_constraints.is_empty() {
            out.push_str("});\n");
            return out;
        }

        out.push_str("}, (table) => [\n");
        if !self.primary_key.is_empty() {
            let columns: Vec<String> = self.primary_key.iter().map(|f| table_access(f)).collect();
            let _ = writeln!(out, "\tprimaryKey({{ columns: [{}] }}),", columns.join(", "));
        }
        for constraint in &self.unique_constraints {
            let columns: Vec<String> = constraint.fields.iter().map(|f| table_access(f)).collect();
            let _ = writeln!(
                out,
                "\tunique({}).on({}),",
                quote(&constraint.name),
                columns.join(", ")
            );
        }
        out.push_str("]);\n");
        out
    }

    /// Render the select/insert type aliases.
    pub fn render_type_aliases(&self) -> String {
        format!(
            "export type {ty} = typeof {table}.$inferSelect;\nexport type New{ty} = typeof {table}.$inferInsert;\n",
            ty = self.type_name,
            table = self.const_name,
        )
    }

    fn builders(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.column_type.builder())
    }

    fn uses_sql(&self) -> bool {
        self.fields
            .iter()
            .any(|f| f.default.as_ref().is_some_and(|d| d.uses_sql()))
    }
}

/// Build declarations for every table, in input order.
pub fn generate_tables(tables: &[TableMetadata]) -> Vec<GeneratedTable> {
    tables.iter().map(GeneratedTable::from_table).collect()
}

/// Render the import lines needed by `tables`.
pub fn render_imports(tables: &[GeneratedTable]) -> String {
    let mut used: BTreeSet<&str> = tables.iter().flat_map(|t| t.builders()).collect();
    if !tables.is_empty() {
        used.insert("pgTable");
    }
    if tables.iter().any(|t| !t.unique_constraints.is_empty()) {
        used.insert("unique");
    }
    if tables.iter().any(|t| !t.primary_key.is_empty()) {
        used.insert("primaryKey");
    }

    let mut out = String::new();
    if !used.is_empty() {
        let names: Vec<&str> = IMPORT_ORDER
            .iter()
            .copied()
            .filter(|name| used.contains(name))
            .collect();
        let _ = writeln!(
            out,
            "import {{ {} }} from \"drizzle-orm/pg-core\"",
            names.join(", ")
        );
    }
    if tables.iter().any(GeneratedTable::uses_sql) {
        out.push_str("import { sql } from \"drizzle-orm\"\n");
    }
    out
}

/// Render a complete TypeScript module.
pub fn render_module(tables: &[GeneratedTable], options: &RenderOptions) -> String {
    let mut sections = Vec::with_capacity(tables.len() + 1);
    if options.imports {
        let imports = render_imports(tables);
        if !imports.is_empty() {
            sections.push(imports);
        }
    }
    for table in tables {
        let mut block = table.render();
        if options.type_aliases {
            block.push('\n');
            block.push_str(&table.render_type_aliases());
        }
        sections.push(block);
    }
    sections.join("\n")
}

/// Field names for source columns, or `None` if any column is unknown.
fn resolve_fields<'a>(
    table: &TableMetadata,
    columns: impl IntoIterator<Item = &'a str>,
) -> Option<Vec<String>> {
    columns
        .into_iter()
        .map(|column| {
            table
                .get_column(column)
                .map(|c| to_camel_case(&c.column_name))
        })
        .collect()
}

/// `table.field`, or `table["field"]` when the name is not an identifier.
fn table_access(field: &str) -> String {
    if is_identifier(field) {
        format!("table.{field}")
    } else {
        format!("table[{}]", property_key(field))
    }
}

/// Coerce a name into a TypeScript identifier.
fn identifier(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '$' { c } else { '_' })
        .collect();
    if !is_identifier(&out) {
        out.insert(0, '_');
    }
    out
}
