//! Filter types for dynamic collection queries.
//!
//! A [`FilterField`] can be rendered as a PostgREST query parameter or
//! evaluated directly against a JSON row, so the REST and in-memory
//! adapters share a single query vocabulary.

use std::cmp::Ordering;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Neq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// List membership.
    In,
    /// Null or missing.
    IsNull,
}

impl FilterOp {
    /// The PostgREST operator keyword.
    pub fn as_postgrest(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
            Self::IsNull => "is",
        }
    }
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// A list of string values (for the `In` operator).
    StringList(Vec<String>),
    /// No value (for `IsNull`).
    Null,
}

impl FilterValue {
    /// Render the value in PostgREST syntax.
    fn to_postgrest(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::StringList(items) => {
                let quoted: Vec<String> = items
                    .iter()
                    .map(|item| format!("\"{}\"", item.replace('"', "\\\"")))
                    .collect();
                format!("({})", quoted.join(","))
            }
            Self::Null => "null".to_string(),
        }
    }

    /// Compare a row value against this filter value.
    ///
    /// Numbers compare numerically (numeric strings in the row are parsed).
    /// Two RFC 3339 timestamps compare as instants, whatever their offsets.
    /// Other strings compare lexicographically, which orders `YYYY-MM`
    /// periods correctly. Returns `None` when the two sides are not
    /// comparable.
    fn compare(&self, row_value: &Value) -> Option<Ordering> {
        match self {
            Self::Integer(expected) => as_f64(row_value)?.partial_cmp(&(*expected as f64)),
            Self::Float(expected) => as_f64(row_value)?.partial_cmp(expected),
            Self::String(expected) => match row_value {
                Value::String(actual) => Some(
                    compare_instants(actual, expected)
                        .unwrap_or_else(|| actual.as_str().cmp(expected.as_str())),
                ),
                Value::Number(n) => {
                    let actual = n.as_f64()?;
                    let expected: f64 = expected.parse().ok()?;
                    actual.partial_cmp(&expected)
                }
                Value::Bool(b) => Some(b.to_string().as_str().cmp(expected.as_str())),
                _ => None,
            },
            Self::Boolean(expected) => match row_value {
                Value::Bool(actual) => Some(actual.cmp(expected)),
                _ => None,
            },
            Self::StringList(_) | Self::Null => None,
        }
    }
}

fn compare_instants(actual: &str, expected: &str) -> Option<Ordering> {
    let actual = DateTime::parse_from_rfc3339(actual.trim()).ok()?;
    let expected = DateTime::parse_from_rfc3339(expected.trim()).ok()?;
    Some(actual.cmp(&expected))
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value.into())
    }

    /// Render as a `(column, "op.value")` query pair.
    pub fn to_query_pair(&self) -> (String, String) {
        (
            self.field.clone(),
            format!("{}.{}", self.op.as_postgrest(), self.value.to_postgrest()),
        )
    }

    /// Evaluate the condition against a JSON row.
    ///
    /// A missing column behaves like `null`: it only satisfies `IsNull`.
    pub fn matches(&self, row: &Value) -> bool {
        let cell = row.get(&self.field).unwrap_or(&Value::Null);

        match self.op {
            FilterOp::IsNull => cell.is_null(),
            FilterOp::In => match (&self.value, as_text(cell)) {
                (FilterValue::StringList(items), Some(text)) => items.iter().any(|i| *i == text),
                _ => false,
            },
            FilterOp::Neq => {
                !cell.is_null() && self.value.compare(cell) != Some(Ordering::Equal)
            }
            op => match self.value.compare(cell) {
                Some(ordering) => match op {
                    FilterOp::Eq => ordering == Ordering::Equal,
                    FilterOp::Gt => ordering == Ordering::Greater,
                    FilterOp::Gte => ordering != Ordering::Less,
                    FilterOp::Lt => ordering == Ordering::Less,
                    FilterOp::Lte => ordering != Ordering::Greater,
                    _ => false,
                },
                None => false,
            },
        }
    }
}
