//! Column metadata records.

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata for a single database column, as reported by
/// `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Source identifier (snake_case).
    pub column_name: String,
    /// Canonical SQL type name, e.g. `character varying`.
    pub data_type: String,
    /// Underlying storage type name, e.g. `varchar` or `int4`.
    #[serde(default)]
    pub udt_name: String,
    /// Total number of digits for exact numerics.
    #[serde(default)]
    pub numeric_precision: Option<u32>,
    /// Digits after the decimal point for exact numerics.
    #[serde(default)]
    pub numeric_scale: Option<u32>,
    /// Maximum length for bounded strings.
    #[serde(default)]
    pub character_maximum_length: Option<u32>,
    /// Raw default expression as stored by the database.
    #[serde(default)]
    pub column_default: Option<String>,
    /// Whether the column accepts NULL.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub is_nullable: bool,
    /// 1-based position of the column within its table.
    pub ordinal_position: u32,
}

impl ColumnMetadata {
    /// Create a nullable column with no size information or default.
    pub fn new(
        column_name: impl Into<String>,
        data_type: impl Into<String>,
        udt_name: impl Into<String>,
        ordinal_position: u32,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            data_type: data_type.into(),
            udt_name: udt_name.into(),
            numeric_precision: None,
            numeric_scale: None,
            character_maximum_length: None,
            column_default: None,
            is_nullable: true,
            ordinal_position,
        }
    }

    /// Mark the column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    /// Set the raw default expression.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.column_default = Some(default.into());
        self
    }

    /// Set the maximum character length.
    pub fn with_max_length(mut self, length: u32) -> Self {
        self.character_maximum_length = Some(length);
        self
    }

    /// Set numeric precision and scale independently.
    pub fn with_precision(mut self, precision: Option<u32>, scale: Option<u32>) -> Self {
        self.numeric_precision = precision;
        self.numeric_scale = scale;
        self
    }

    /// Raw default expression, if any.
    pub fn default_expr(&self) -> Option<&str> {
        self.column_default.as_deref()
    }

    /// Check if the default draws from a sequence.
    pub fn has_sequence_default(&self) -> bool {
        self.default_expr()
            .is_some_and(|d| d.trim_start().starts_with("nextval("))
    }
}

/// Accept `true`/`false` as well as the `YES`/`NO` strings used by
/// `information_schema`.
fn deserialize_nullable<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Nullable {
        Bool(bool),
        Text(String),
    }

    match Nullable::deserialize(deserializer)? {
        Nullable::Bool(value) => Ok(value),
        Nullable::Text(text) => match text.to_ascii_uppercase().as_str() {
            "YES" | "TRUE" => Ok(true),
            "NO" | "FALSE" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected YES or NO for is_nullable, got {other:?}"
            ))),
        },
    }
}
