//! SQL type to Drizzle column builder mapping.
//!
//! Mapping is an ordered rule table: the first rule whose predicate accepts
//! the column decides its type. SQL type names are ambiguous, so the storage
//! type (`udt_name`) is consulted alongside the nominal `data_type`.

use serde::Serialize;
use tracing::warn;

use crate::metadata::ColumnMetadata;

/// Drizzle `pg-core` column builders produced by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnType {
    /// Bounded string. The length is only emitted when known.
    Varchar {
        /// Maximum length.
        length: Option<u32>,
    },
    /// Unbounded string.
    Text,
    /// 32-bit integer.
    Integer,
    /// Auto-incrementing 32-bit integer.
    Serial,
    /// 64-bit integer.
    Bigint,
    /// Auto-incrementing 64-bit integer.
    BigSerial,
    /// Exact numeric. Precision and scale are present together or not at all.
    Numeric {
        /// `(precision, scale)` when both are known.
        precision_scale: Option<(u32, u32)>,
    },
    /// Boolean.
    Boolean,
    /// Timestamp kept in string mode.
    Timestamp {
        /// Whether the column stores a time zone.
        with_timezone: bool,
    },
    /// JSON stored as text.
    Json,
    /// Binary JSON.
    Jsonb,
}

impl ColumnType {
    /// Name of the `drizzle-orm/pg-core` builder function.
    pub fn builder(&self) -> &'static str {
        match self {
            ColumnType::Varchar { .. } => "varchar",
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Serial => "serial",
            ColumnType::Bigint => "bigint",
            ColumnType::BigSerial => "bigserial",
            ColumnType::Numeric { .. } => "numeric",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp { .. } => "timestamp",
            ColumnType::Json => "json",
            ColumnType::Jsonb => "jsonb",
        }
    }

    /// Builder config object, e.g. `{ length: 255 }`, if this type takes one.
    pub fn options(&self) -> Option<String> {
        match self {
            ColumnType::Varchar {
                length: Some(length),
            } => Some(format!("{{ length: {length} }}")),
            ColumnType::Numeric {
                precision_scale: Some((precision, scale)),
            } => Some(format!("{{ precision: {precision}, scale: {scale} }}")),
            ColumnType::Bigint | ColumnType::BigSerial => Some("{ mode: \"number\" }".into()),
            ColumnType::Timestamp { with_timezone } => Some(if *with_timezone {
                "{ withTimezone: true, mode: \"string\" }".into()
            } else {
                "{ mode: \"string\" }".into()
            }),
            _ => None,
        }
    }

    /// Render the builder call. `column_name` is passed as the first argument
    /// when the database name differs from the field name.
    pub fn render(&self, column_name: Option<&str>) -> String {
        let mut args = Vec::with_capacity(2);
        if let Some(name) = column_name {
            args.push(quote(name));
        }
        if let Some(options) = self.options() {
            args.push(options);
        }
        format!("{}({})", self.builder(), args.join(", "))
    }
}

/// Double-quoted TypeScript string literal.
pub(crate) fn quote(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Result of mapping one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapping {
    /// Chosen column type.
    pub column_type: ColumnType,
    /// Name of the rule that matched.
    pub rule: &'static str,
    /// True when no rule matched and the text fallback was used.
    pub fallback: bool,
}

/// A predicate/action pair in the type rule table.
pub struct TypeRule {
    /// Rule name, for diagnostics.
    pub name: &'static str,
    /// Whether the rule applies to the column.
    pub matches: fn(&SqlType<'_>) -> bool,
    /// Type to emit when the rule applies.
    pub map: fn(&SqlType<'_>) -> ColumnType,
}

/// Normalized view of the type-related column fields.
pub struct SqlType<'a> {
    /// Lowercased `data_type`.
    pub data_type: String,
    /// Lowercased `udt_name`.
    pub udt_name: String,
    /// Source column.
    pub column: &'a ColumnMetadata,
}

impl<'a> SqlType<'a> {
    /// Build the normalized view of a column.
    pub fn of(column: &'a ColumnMetadata) -> Self {
        Self {
            data_type: column.data_type.trim().to_ascii_lowercase(),
            udt_name: column.udt_name.trim().to_ascii_lowercase(),
            column,
        }
    }

    fn is(&self, data_types: &[&str], udt_names: &[&str]) -> bool {
        data_types.contains(&self.data_type.as_str()) || udt_names.contains(&self.udt_name.as_str())
    }

    fn auto_increment(&self) -> bool {
        self.udt_name.contains("serial") || self.column.has_sequence_default()
    }
}

/// Type rules in precedence order.
pub const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        name: "bounded_string",
        matches: |t| t.is(&["character varying", "varchar"], &["varchar"]),
        map: |t| ColumnType::Varchar {
            length: t.column.character_maximum_length,
        },
    },
    TypeRule {
        name: "text",
        matches: |t| t.is(&["text"], &["text"]),
        map: |_| ColumnType::Text,
    },
    TypeRule {
        name: "integer",
        matches: |t| {
            t.is(
                &["integer", "smallint"],
                &["int2", "int4", "serial", "serial2", "serial4", "smallserial"],
            )
        },
        map: |t| {
            if t.auto_increment() {
                ColumnType::Serial
            } else {
                ColumnType::Integer
            }
        },
    },
    TypeRule {
        name: "bigint",
        matches: |t| t.is(&["bigint"], &["int8", "serial8", "bigserial"]),
        map: |t| {
            if t.auto_increment() {
                ColumnType::BigSerial
            } else {
                ColumnType::Bigint
            }
        },
    },
    TypeRule {
        name: "numeric",
        matches: |t| t.is(&["numeric", "decimal"], &["numeric"]),
        map: |t| ColumnType::Numeric {
            precision_scale: t.column.numeric_precision.zip(t.column.numeric_scale),
        },
    },
    TypeRule {
        name: "boolean",
        matches: |t| t.is(&["boolean"], &["bool"]),
        map: |_| ColumnType::Boolean,
    },
    TypeRule {
        name: "timestamp",
        matches: |t| t.data_type.contains("timestamp") || t.udt_name.contains("timestamp"),
        map: |t| ColumnType::Timestamp {
            with_timezone: t.udt_name == "timestamptz"
                || (t.data_type.contains("with time zone") && !t.data_type.contains("without")),
        },
    },
    TypeRule {
        name: "json",
        matches: |t| t.is(&["json", "jsonb"], &["json", "jsonb"]),
        map: |t| {
            if t.data_type == "jsonb" || t.udt_name == "jsonb" {
                ColumnType::Jsonb
            } else {
                ColumnType::Json
            }
        },
    },
];

/// Map a column to its Drizzle type. Never fails: unknown types fall back to
/// `text` and are reported through a warning.
pub fn map_type(column: &ColumnMetadata) -> TypeMapping {
    let sql = SqlType::of(column);
    if let Some(rule) = TYPE_RULES.iter().find(|rule| (rule.matches)(&sql)) {
        return TypeMapping {
            column_type: (rule.map)(&sql),
            rule: rule.name,
            fallback: false,
        };
    }

    warn!(
        column = %column.column_name,
        data_type = %column.data_type,
        udt_name = %column.udt_name,
        "Unrecognized SQL type, falling back to text"
    );
    TypeMapping {
        column_type: ColumnType::Text,
        rule: "fallback",
        fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped(column: ColumnMetadata) -> ColumnType {
        map_type(&column).column_type
    }

    #[test]
    fn test_varchar_length_only_when_present() {
        let with_length = ColumnMetadata::new("code", "character varying", "varchar", 1)
            .with_max_length(50);
        assert_eq!(
            mapped(with_length),
            ColumnType::Varchar { length: Some(50) }
        );

        let without = ColumnMetadata::new("code", "character varying", "varchar", 1);
        let column_type = mapped(without);
        assert_eq!(column_type, ColumnType::Varchar { length: None });
        assert_eq!(column_type.render(None), "varchar()");
    }

    #[test]
    fn test_serial_overrides_integer() {
        assert_eq!(
            mapped(ColumnMetadata::new("id", "integer", "serial4", 1)),
            ColumnType::Serial
        );
        assert_eq!(
            mapped(ColumnMetadata::new("count", "integer", "int4", 1)),
            ColumnType::Integer
        );
        assert_eq!(
            mapped(
                ColumnMetadata::new("id", "integer", "int4", 1)
                    .with_default("nextval('users_id_seq'::regclass)")
            ),
            ColumnType::Serial
        );
    }

    #[test]
    fn test_bigint_is_not_integer() {
        assert_eq!(
            mapped(ColumnMetadata::new("views", "bigint", "int8", 1)),
            ColumnType::Bigint
        );
        assert_eq!(
            mapped(ColumnMetadata::new("id", "bigint", "int8", 1).with_default(
                "nextval('events_id_seq'::regclass)"
            )),
            ColumnType::BigSerial
        );
    }

    #[test]
    fn test_numeric_requires_both_precision_and_scale() {
        let full = ColumnMetadata::new("price", "numeric", "numeric", 1)
            .with_precision(Some(15), Some(2));
        assert_eq!(
            mapped(full).render(None),
            "numeric({ precision: 15, scale: 2 })"
        );

        let partial = ColumnMetadata::new("price", "numeric", "numeric", 1)
            .with_precision(Some(10), None);
        assert_eq!(
            mapped(partial),
            ColumnType::Numeric {
                precision_scale: None
            }
        );

        let scale_only = ColumnMetadata::new("price", "numeric", "numeric", 1)
            .with_precision(None, Some(2));
        assert_eq!(mapped(scale_only).render(None), "numeric()");
    }

    #[test]
    fn test_timestamp_string_mode() {
        let plain = mapped(ColumnMetadata::new(
            "created_at",
            "timestamp without time zone",
            "timestamp",
            1,
        ));
        assert_eq!(
            plain.render(Some("created_at")),
            "timestamp(\"created_at\", { mode: \"string\" })"
        );

        let zoned = mapped(ColumnMetadata::new(
            "seen_at",
            "timestamp with time zone",
            "timestamptz",
            1,
        ));
        assert_eq!(
            zoned,
            ColumnType::Timestamp {
                with_timezone: true
            }
        );
    }

    #[test]
    fn test_json_and_boolean() {
        assert_eq!(
            mapped(ColumnMetadata::new("data", "jsonb", "jsonb", 1)),
            ColumnType::Jsonb
        );
        assert_eq!(
            mapped(ColumnMetadata::new("data", "json", "json", 1)),
            ColumnType::Json
        );
        assert_eq!(
            mapped(ColumnMetadata::new("active", "boolean", "bool", 1)),
            ColumnType::Boolean
        );
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let mapping = map_type(&ColumnMetadata::new("shape", "polygon", "polygon", 1));

        assert!(mapping.fallback);
        assert_eq!(mapping.column_type, ColumnType::Text);
        assert_eq!(mapping.rule, "fallback");
    }

    #[test]
    fn test_rule_order_prefers_storage_type() {
        // The nominal type says integer, the storage type says serial.
        let mapping = map_type(&ColumnMetadata::new("id", "integer", "serial", 1));
        assert_eq!(mapping.rule, "integer");
        assert_eq!(mapping.column_type, ColumnType::Serial);

        let names: Vec<_> = TYPE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "bounded_string",
                "text",
                "integer",
                "bigint",
                "numeric",
                "boolean",
                "timestamp",
                "json"
            ]
        );
    }

    #[test]
    fn test_render_quotes_column_name() {
        assert_eq!(
            ColumnType::Bigint.render(Some("user_id")),
            "bigint(\"user_id\", { mode: \"number\" })"
        );
        assert_eq!(ColumnType::Text.render(None), "text()");
    }
}
