/// Schema-less record model for fetched API rows.
///
/// A fetched row is an ordered map from field name to a scalar [`Value`].
/// Key order follows the order keys appeared in the response body, which is
/// what the schema inferencer reports back to the user as the column order.
///
/// Only scalars are modelled. Nested arrays and objects (e.g. a list of film
/// URLs on a person) keep their column but are carried as their compact JSON
/// text, so they chart as non-numeric values.
use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// One flat data row, keyed by field name in source order.
pub type Record = IndexMap<String, Value>;

/// A single scalar field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// Convert a parsed JSON value into a record field value.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Null),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            nested => Self::Text(nested.to_string()),
        }
    }

    /// The value as a JSON number, if it is one.
    ///
    /// Unlike [`Value::as_f64`], numeric text is *not* accepted here. Used by
    /// the fetch-time ceiling pass, which only touches real numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The value coerced to a finite number, if possible.
    ///
    /// Numbers pass through; text is accepted when it trims to a finite
    /// decimal (`"172"`, `" 77.5 "`). Everything else is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) if is_whole(*n) => serializer.serialize_i64(*n as i64),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Null => serializer.serialize_unit(),
        }
    }
}

/// Build a record from a JSON value.
///
/// Objects map key-by-key in source order. Any other JSON shape has no
/// fields and yields an empty record.
pub fn record_from_json(value: &serde_json::Value) -> Record {
    match value.as_object() {
        Some(map) => map
            .iter()
            .map(|(key, v)| (key.clone(), Value::from_json(v)))
            .collect(),
        None => Record::new(),
    }
}

/// Format a number without a trailing `.0` when it is whole.
pub fn format_number(n: f64) -> String {
    if is_whole(n) {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn is_whole(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
