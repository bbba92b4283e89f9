//! Value types for GrainDB
//!
//! This module defines how data values are represented in memory and how
//! SQL literals are coerced into them.

use crate::catalog::ColumnType;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date literals are stored and re-emitted in this canonical form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A value in the database
///
/// The serde derive keeps the variant tag, so the binary snapshot can
/// round-trip every variant (an `Int` never comes back as a `Float`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit, covers both DOUBLE and FLOAT columns)
    Float(f64),
    /// String value
    Str(String),
    /// Boolean value
    Bool(bool),
    /// Date value, canonical `YYYY-MM-DD` text
    Date(String),
}

// Equality is variant-sensitive, except that Int and Float compare
// numerically (a JOIN key of Int(1) matches Float(1.0)).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) => *a as f64 == *b,
            (Value::Float(a), Value::Int(b)) => *a == *b as f64,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Coerce a SQL literal into a value of the given column type
    pub fn coerce(column_type: ColumnType, literal: &str) -> Result<Value> {
        match column_type {
            ColumnType::Int => literal
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| Error::ValueCoercion {
                    kind: "integer",
                    column_type,
                }),
            ColumnType::Double => literal
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| Error::ValueCoercion {
                    kind: "double",
                    column_type,
                }),
            ColumnType::Float => literal
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| Error::ValueCoercion {
                    kind: "float",
                    column_type,
                }),
            ColumnType::Varchar => Ok(Value::Str(strip_quotes(literal).to_string())),
            ColumnType::Bool => {
                if literal.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if literal.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(Error::ValueCoercion {
                        kind: "boolean",
                        column_type,
                    })
                }
            }
            ColumnType::Date => {
                let text = strip_quotes(literal);
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .map(|date| Value::Date(date.format(DATE_FORMAT).to_string()))
                    .map_err(|_| Error::ValueCoercion {
                        kind: "date",
                        column_type,
                    })
            }
            // ENUM literals pass through untouched
            ColumnType::Enum => Ok(Value::Str(literal.to_string())),
        }
    }

    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of this value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Convert into the JSON representation used by SELECT result sets
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Date(d) => serde_json::Value::String(d.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(d) => write!(f, "{}", d),
        }
    }
}

/// Strip one matched pair of surrounding quotes (`'` or `"`)
pub(crate) fn strip_quotes(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[bytes.len() - 1] == bytes[0] {
        &text[1..text.len() - 1]
    } else {
        text
    }
}
