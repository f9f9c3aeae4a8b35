//! Default-value expression translation.
//!
//! Raw `column_default` expressions are matched against an ordered rule table.
//! Translation never fails: an unrecognized expression yields no clause.

use serde::Serialize;
use tracing::debug;

/// Default clause attached to a generated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultClause {
    /// Random UUID generated by the database at insert time.
    RandomUuid,
    /// Current time at insert.
    Now,
    /// Boolean literal.
    Bool(bool),
    /// Numeric literal, cast marker stripped.
    Number(String),
    /// Plain string literal (unquoted, unescaped value).
    String(String),
    /// Raw JSON literal passed through unquoted.
    Json(String),
}

impl DefaultClause {
    /// Render as a chained builder call, e.g. `.default(10)`.
    pub fn render(&self) -> String {
        match self {
            DefaultClause::RandomUuid => ".default(sql`gen_random_uuid()`)".to_string(),
            DefaultClause::Now => ".defaultNow()".to_string(),
            DefaultClause::Bool(value) => format!(".default({value})"),
            DefaultClause::Number(value) => format!(".default({value})"),
            DefaultClause::String(value) => format!(".default({})", single_quote(value)),
            DefaultClause::Json(value) => format!(".default({value})"),
        }
    }

    /// Check if the rendered clause uses the `sql` template tag.
    pub fn uses_sql(&self) -> bool {
        matches!(self, DefaultClause::RandomUuid)
    }
}

/// A rule in the default translation table.
pub struct DefaultRule {
    /// Rule name, for diagnostics.
    pub name: &'static str,
    /// Clause for the expression, or `None` when the rule does not apply.
    pub apply: fn(&str) -> Option<DefaultClause>,
}

/// Default rules in precedence order.
pub const DEFAULT_RULES: &[DefaultRule] = &[
    DefaultRule {
        name: "random_uuid",
        apply: |expr| {
            let lower = expr.to_ascii_lowercase();
            (lower.contains("gen_random_uuid(") || lower.contains("uuid_generate_v4("))
                .then_some(DefaultClause::RandomUuid)
        },
    },
    DefaultRule {
        name: "current_time",
        apply: |expr| {
            let lower = expr.to_ascii_lowercase();
            (lower.contains("now()") || lower.contains("current_timestamp"))
                .then_some(DefaultClause::Now)
        },
    },
    DefaultRule {
        name: "boolean",
        apply: |expr| {
            if expr.eq_ignore_ascii_case("true") {
                Some(DefaultClause::Bool(true))
            } else if expr.eq_ignore_ascii_case("false") {
                Some(DefaultClause::Bool(false))
            } else {
                None
            }
        },
    },
    DefaultRule {
        name: "numeric",
        apply: |expr| {
            let (value, _cast) = split_cast(expr);
            let value = value.trim();
            is_numeral(value).then(|| {
                DefaultClause::Number(value.strip_prefix('+').unwrap_or(value).to_string())
            })
        },
    },
    DefaultRule {
        name: "quoted_string",
        apply: |expr| {
            let (value, cast) = parse_quoted(expr)?;
            if is_numeric_cast(cast) && is_numeral(&value) {
                let value = value.strip_prefix('+').unwrap_or(&value).to_string();
                Some(DefaultClause::Number(value))
            } else if is_json_cast(cast) && (value == "[]" || value == "{}" || is_json(&value)) {
                Some(DefaultClause::Json(value))
            } else {
                Some(DefaultClause::String(value))
            }
        },
    },
];

/// Translate a raw default expression.
pub fn translate_default(expr: Option<&str>) -> Option<DefaultClause> {
    let expr = expr?.trim();
    if expr.is_empty() {
        return None;
    }

    for rule in DEFAULT_RULES {
        if let Some(clause) = (rule.apply)(expr) {
            debug!(rule = rule.name, expr, "Translated default");
            return Some(clause);
        }
    }

    debug!(expr, "Unrecognized default expression omitted");
    None
}

/// Split `value::type` into the value and the cast target, if any.
fn split_cast(expr: &str) -> (&str, Option<&str>) {
    match expr.split_once("::") {
        Some((value, cast)) => (value, Some(cast.trim())),
        None => (expr, None),
    }
}

/// Signed decimal numeral: `-12`, `3.50`, `+7`.
fn is_numeral(value: &str) -> bool {
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    !int_part.is_empty()
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.map_or(true, |f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse `'value'::cast`, unescaping doubled quotes. The cast is required.
fn parse_quoted(expr: &str) -> Option<(String, &str)> {
    let body = expr.strip_prefix('\'')?;
    let mut value = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch != '\'' {
            value.push(ch);
            continue;
        }
        if matches!(chars.peek(), Some((_, '\''))) {
            chars.next();
            value.push('\'');
            continue;
        }
        let cast = body[idx + 1..].strip_prefix("::")?.trim();
        return (!cast.is_empty()).then_some((value, cast));
    }

    None
}

/// Postgres quotes negative numeric defaults, e.g. `'-1'::integer`.
fn is_numeric_cast(cast: &str) -> bool {
    let cast = cast.to_ascii_lowercase();
    let base = cast.split('(').next().unwrap_or_default().trim();
    matches!(
        base,
        "integer" | "int" | "int2" | "int4" | "int8" | "smallint" | "bigint" | "numeric" | "decimal"
    )
}

fn is_json_cast(cast: &str) -> bool {
    matches!(cast.to_ascii_lowercase().as_str(), "json" | "jsonb")
}

fn is_json(value: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(value).is_ok()
}

/// Single-quoted TypeScript string literal.
fn single_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}
