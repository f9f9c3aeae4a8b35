//! Output formatters for generated tables.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use drizzlegen_core::{render_module, GeneratedTable, RenderOptions};

/// Output format for generated declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// TypeScript module for drizzle-orm
    Typescript,
    /// JSON description of every generated field
    Json,
    /// ASCII table summary for review
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Typescript => write!(f, "typescript"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

/// Trait for formatting generated tables.
pub trait Formatter {
    /// Format all generated tables.
    fn format_tables(&self, tables: &[GeneratedTable]) -> anyhow::Result<String>;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat, options: RenderOptions) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Typescript => Box::new(TypescriptFormatter { options }),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// Renders the TypeScript module.
pub struct TypescriptFormatter {
    options: RenderOptions,
}

impl Formatter for TypescriptFormatter {
    fn format_tables(&self, tables: &[GeneratedTable]) -> anyhow::Result<String> {
        Ok(render_module(tables, &self.options))
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_tables(&self, tables: &[GeneratedTable]) -> anyhow::Result<String> {
        let mut json = serde_json::to_string_pretty(tables)?;
        json.push('\n');
        Ok(json)
    }
}

/// Table formatter using comfy-table. Fallback types are marked for review.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_tables(&self, tables: &[GeneratedTable]) -> anyhow::Result<String> {
        let mut table = Table::new();
        table.set_header(vec![
            "Table", "Column", "Field", "Type", "Default", "Flags",
        ]);

        for generated in tables {
            for field in &generated.fields {
                table.add_row(vec![
                    Cell::new(&generated.table_name),
                    Cell::new(&field.column_name),
                    Cell::new(&field.field_name),
                    Cell::new(field.column_type.render(None)),
                    Cell::new(field.default.as_ref().map(|d| d.render()).unwrap_or_default()),
                    Cell::new(flags(field)),
                ]);
            }
        }

        let field_count: usize = tables.iter().map(|t| t.fields.len()).sum();
        let fallbacks: usize = tables.iter().map(GeneratedTable::fallback_count).sum();
        Ok(format!(
            "{}\n{} table(s), {} field(s), {} fallback type(s)\n",
            table,
            tables.len(),
            field_count,
            fallbacks
        ))
    }
}

fn flags(field: &drizzlegen_core::FieldDeclaration) -> String {
    let mut flags = Vec::new();
    if field.primary_key {
        flags.push("pk");
    }
    if field.not_null {
        flags.push("not null");
    }
    if field.fallback {
        flags.push("FALLBACK");
    }
    flags.join(", ")
}
