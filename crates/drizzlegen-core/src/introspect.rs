//! Metadata snapshot via `psql`.
//!
//! A single query assembles the whole [`MetadataDocument`] as one JSON value
//! from `information_schema`. The client runs once; a failure aborts before
//! anything is generated.

use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::metadata::MetadataDocument;

/// Connection settings for the metadata client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntrospectConfig {
    /// Connection string passed to `psql`.
    pub database_url: String,
    /// Schema to read tables from.
    pub schema: String,
    /// Path or name of the `psql` binary.
    pub psql: String,
}

impl IntrospectConfig {
    /// Create a config for the `public` schema.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Set the schema name.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the `psql` binary.
    pub fn with_psql(mut self, psql: impl Into<String>) -> Self {
        self.psql = psql.into();
        self
    }
}

impl Default for IntrospectConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            schema: "public".to_string(),
            psql: "psql".to_string(),
        }
    }
}

/// Build the metadata query for `schema`.
pub fn metadata_query(schema: &str) -> Result<String> {
    let valid = schema
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && schema.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(Error::InvalidSchemaName(schema.to_string()));
    }

    Ok(METADATA_QUERY.replace("{schema}", schema))
}

const METADATA_QUERY: &str = r#"SELECT json_build_object(
  'tables', COALESCE((
    SELECT json_agg(json_build_object('table_name', t.table_name, 'columns', t.columns) ORDER BY t.table_name)
    FROM (
      SELECT c.table_name,
             json_agg(json_build_object(
               'column_name', c.column_name,
               'data_type', c.data_type,
               'udt_name', c.udt_name,
               'numeric_precision', c.numeric_precision,
               'numeric_scale', c.numeric_scale,
               'character_maximum_length', c.character_maximum_length,
               'column_default', c.column_default,
               'is_nullable', c.is_nullable,
               'ordinal_position', c.ordinal_position
             ) ORDER BY c.ordinal_position) AS columns
      FROM information_schema.columns c
      JOIN information_schema.tables tb
        ON tb.table_schema = c.table_schema
       AND tb.table_name = c.table_name
       AND tb.table_type = 'BASE TABLE'
      WHERE c.table_schema = '{schema}'
      GROUP BY c.table_name
    ) t
  ), '[]'::json),
  'primary_keys', COALESCE((
    SELECT json_object_agg(pk.table_name, pk.columns)
    FROM (
      SELECT tc.table_name,
             json_agg(kcu.column_name ORDER BY kcu.ordinal_position) AS columns
      FROM information_schema.table_constraints tc
      JOIN information_schema.key_column_usage kcu
        ON kcu.constraint_name = tc.constraint_name
       AND kcu.table_schema = tc.table_schema
       AND kcu.table_name = tc.table_name
      WHERE tc.constraint_type = 'PRIMARY KEY'
        AND tc.table_schema = '{schema}'
      GROUP BY tc.table_name
    ) pk
  ), '{}'::json),
  'unique_constraints', COALESCE((
    SELECT json_agg(json_build_object(
             'table_name', u.table_name,
             'column_names', u.columns,
             'constraint_name', u.constraint_name
           ) ORDER BY u.table_name, u.constraint_name)
    FROM (
      SELECT tc.table_name, tc.constraint_name,
             json_agg(kcu.column_name ORDER BY kcu.ordinal_position) AS columns
      FROM information_schema.table_constraints tc
      JOIN information_schema.key_column_usage kcu
        ON kcu.constraint_name = tc.constraint_name
       AND kcu.table_schema = tc.table_schema
       AND kcu.table_name = tc.table_name
      WHERE tc.constraint_type = 'UNIQUE'
        AND tc.table_schema = '{schema}'
      GROUP BY tc.table_name, tc.constraint_name
    ) u
  ), '[]'::json)
)"#;

/// Run `psql` once and parse its output into a metadata document.
pub fn fetch_metadata(config: &IntrospectConfig) -> Result<MetadataDocument> {
    let query = metadata_query(&config.schema)?;
    info!(schema = %config.schema, psql = %config.psql, "Fetching metadata");

    let output = Command::new(&config.psql)
        .arg(&config.database_url)
        .args(["-X", "-A", "-t", "-q", "-v", "ON_ERROR_STOP=1", "-c"])
        .arg(&query)
        .output()
        .map_err(|source| Error::Spawn {
            program: config.psql.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(Error::MetadataFetch {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    debug!(bytes = output.stdout.len(), "Metadata fetched");
    MetadataDocument::from_reader(output.stdout.as_slice())
}
