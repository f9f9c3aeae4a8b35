//! drizzlegen command-line tool
//!
//! Turns a PostgreSQL metadata snapshot into drizzle-orm `pgTable`
//! declarations.

mod config;
mod formatter;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use config::{introspect_config, Args, Command, OutputArgs};
use drizzlegen_core::{fetch_metadata, generate_tables, MetadataDocument, RenderOptions};
use tracing::{info, warn};

fn main() {
    // Logs go to stderr so generated code can be piped from stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("drizzlegen=info,drizzlegen_core=info")
            }),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let document = match &args.command {
        Command::Generate { input, .. } => read_document(input.as_deref())?,
        Command::Introspect { .. } => {
            let config = introspect_config(&args.command)
                .context("introspect command without connection settings")?;
            fetch_metadata(&config)?
        }
    };

    let tables = document.into_tables()?;
    let generated = generate_tables(&tables);

    let fallbacks: usize = generated.iter().map(|t| t.fallback_count()).sum();
    if fallbacks > 0 {
        warn!(fallbacks, "Some columns fell back to text() and need review");
    }
    info!(tables = generated.len(), "Generated declarations");

    let output = OutputArgs::of(&args.command);
    let formatter = formatter::create_formatter(output.format, RenderOptions::from(output));
    let rendered = formatter.format_tables(&generated)?;

    match &output.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote output");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Read a metadata document from a file, or stdin for `None` / `-`.
fn read_document(input: Option<&Path>) -> anyhow::Result<MetadataDocument> {
    match input {
        Some(path) if path != Path::new("-") => MetadataDocument::from_path(path)
            .with_context(|| format!("failed to load metadata from {}", path.display())),
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read metadata from stdin")?;
            Ok(MetadataDocument::from_json(&content)?)
        }
    }
}
