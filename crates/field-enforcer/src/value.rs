//! Field kinds and field values
//!
//! Every field of a record carries one of a closed set of kinds. Rule
//! evaluators match exhaustively over [`FieldValue`] instead of inspecting
//! host types at runtime.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Semantic type declared for a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// UTF-8 text; length rules count characters
    Text,
    /// Signed integer
    Integer,
    /// Unsigned integer
    Unsigned,
    /// Floating-point number
    Float,
    /// Point in time with a UTC offset
    Temporal,
    /// Nested record, treated as an opaque value
    Nested,
}

impl FieldKind {
    /// The zero value for this kind
    pub fn zero(self) -> FieldValue {
        match self {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Integer => FieldValue::Integer(0),
            FieldKind::Unsigned => FieldValue::Unsigned(0),
            FieldKind::Float => FieldValue::Float(0.0),
            FieldKind::Temporal => FieldValue::Temporal(None),
            FieldKind::Nested => FieldValue::Nested(BTreeMap::new()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Unsigned => write!(f, "unsigned"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Temporal => write!(f, "temporal"),
            FieldKind::Nested => write!(f, "nested"),
        }
    }
}

/// Current value of a record field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    /// `None` is the zero time
    Temporal(Option<DateTime<FixedOffset>>),
    Nested(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Kind of this value
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Unsigned(_) => FieldKind::Unsigned,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Temporal(_) => FieldKind::Temporal,
            FieldValue::Nested(_) => FieldKind::Nested,
        }
    }

    /// Whether this is the zero value of its kind
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Integer(i) => *i == 0,
            FieldValue::Unsigned(u) => *u == 0,
            FieldValue::Float(f) => *f == 0.0,
            FieldValue::Temporal(t) => t.is_none(),
            FieldValue::Nested(map) => map.is_empty(),
        }
    }

    /// Raw string form handed to pattern, word count and custom rules
    pub fn raw(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Unsigned(u) => u.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Temporal(Some(t)) => t.to_rfc3339(),
            FieldValue::Temporal(None) => String::new(),
            FieldValue::Nested(map) => {
                let entries: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v.raw()))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
        }
    }

    /// Numeric view of integer, unsigned and float values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Unsigned(u) => Some(*u as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Unsigned(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Unsigned(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value.into())
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        FieldValue::Temporal(Some(value))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Temporal(Some(value.fixed_offset()))
    }
}
