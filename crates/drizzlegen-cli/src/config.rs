//! Command line arguments and the configuration derived from them.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use drizzlegen_core::{IntrospectConfig, RenderOptions};

use crate::formatter::OutputFormat;

/// Generate drizzle-orm table declarations from PostgreSQL metadata.
#[derive(Parser, Debug)]
#[command(name = "drizzlegen")]
#[command(version, about = "Generate drizzle-orm table declarations from PostgreSQL metadata")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate from a metadata document (file or stdin)
    Generate {
        /// Metadata JSON file; reads stdin when omitted or "-"
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Fetch metadata with psql, then generate
    Introspect {
        /// PostgreSQL connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,

        /// Schema to read tables from
        #[arg(long, default_value = "public")]
        schema: String,

        /// psql binary
        #[arg(long, env = "PSQL", default_value = "psql")]
        psql: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Flags shared by every subcommand that produces output.
#[derive(ClapArgs, Debug, Clone)]
pub struct OutputArgs {
    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "typescript", value_enum)]
    pub format: OutputFormat,

    /// Omit import lines
    #[arg(long)]
    pub no_imports: bool,

    /// Emit $inferSelect / $inferInsert type aliases
    #[arg(long)]
    pub type_aliases: bool,
}

impl OutputArgs {
    /// Output arguments of any subcommand.
    pub fn of(command: &Command) -> &OutputArgs {
        match command {
            Command::Generate { output, .. } | Command::Introspect { output, .. } => output,
        }
    }
}

impl From<&OutputArgs> for RenderOptions {
    fn from(args: &OutputArgs) -> Self {
        Self {
            imports: !args.no_imports,
            type_aliases: args.type_aliases,
        }
    }
}

/// Introspection settings, when the subcommand needs them.
pub fn introspect_config(command: &Command) -> Option<IntrospectConfig> {
    match command {
        Command::Introspect {
            database_url,
            schema,
            psql,
            ..
        } => Some(
            IntrospectConfig::new(database_url.clone())
                .with_schema(schema.clone())
                .with_psql(psql.clone()),
        ),
        Command::Generate { .. } => None,
    }
}
