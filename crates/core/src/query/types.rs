use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// Point in time produced by timestamp columns and `as_timestamp`.
pub type Timestamp = DateTime<Utc>;

/// Canonical textual timestamp format: `YYYY-MM-DD HH:MM:SS[.fffffffff]`.
///
/// Used to parse text columns in `as_timestamp`, to render timestamps in
/// `as_string`, and to bind timestamp parameters on drivers without a native
/// timestamp type.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A dynamically-typed column or parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    Timestamp(Timestamp),
    Blob(Vec<u8>),
}

impl Value {
    /// Short name of the stored kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
            Value::Blob(_) => "blob",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Timestamp(v) => f.write_str(&format_timestamp(v)),
            Value::Blob(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Real(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A numeric column value, as returned by `as_number`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    /// Integer view of the number. Reals are truncated toward zero.
    pub fn as_i64(&self) -> i64 {
        match self {
            Number::Integer(v) => *v,
            Number::Real(v) => *v as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(v) => *v as f64,
            Number::Real(v) => *v,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(v) => write!(f, "{v}"),
            Number::Real(v) => write!(f, "{v}"),
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Integer(v) => Value::Integer(v),
            Number::Real(v) => Value::Real(v),
        }
    }
}

/// How a column's native values are turned into [`Value`]s.
///
/// Decided once per column from its declared type. Drivers with a reduced set
/// of storage classes (SQLite stores booleans as integers and timestamps as
/// text) use it to recover the kind the schema asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Boolean,
    Timestamp,
    /// Keep whatever kind the driver reports for each value.
    Dynamic,
}

impl ColumnKind {
    pub fn from_declared_type(declared: Option<&str>) -> Self {
        let Some(declared) = declared else {
            return ColumnKind::Dynamic;
        };
        let declared = declared.to_ascii_uppercase();

        if declared.contains("BOOL") {
            ColumnKind::Boolean
        } else if declared.contains("DATE") || declared.contains("TIME") {
            ColumnKind::Timestamp
        } else {
            ColumnKind::Dynamic
        }
    }

    /// Applies the column kind to a value read with the driver's storage class.
    ///
    /// Only values with an exact counterpart change kind: `0`/`1` in boolean
    /// columns and canonical text in timestamp columns. Everything else is
    /// returned unchanged.
    pub fn refine(self, value: Value) -> Value {
        match (self, value) {
            (ColumnKind::Boolean, Value::Integer(v @ (0 | 1))) => Value::Boolean(v == 1),
            (ColumnKind::Timestamp, Value::Text(text)) => match parse_timestamp(&text) {
                Some(ts) => Value::Timestamp(ts),
                None => Value::Text(text),
            },
            (_, value) => value,
        }
    }
}

/// Parses text in [`TIMESTAMP_FORMAT`], interpreted as UTC.
///
/// The layout must be exactly `YYYY-MM-DD HH:MM:SS`, optionally followed by
/// `.` and 1 to 9 fraction digits. Anything else is rejected.
pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    if !has_canonical_layout(text.as_bytes()) {
        return None;
    }
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Renders a timestamp in [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn has_canonical_layout(bytes: &[u8]) -> bool {
    const LAYOUT: &[u8; 19] = b"dddd-dd-dd dd:dd:dd";

    if bytes.len() < LAYOUT.len() {
        return false;
    }
    let (head, fraction) = bytes.split_at(LAYOUT.len());
    let head_matches = head.iter().zip(LAYOUT).all(|(&byte, &slot)| match slot {
        b'd' => byte.is_ascii_digit(),
        sep => byte == sep,
    });

    head_matches
        && match fraction {
            [] => true,
            [b'.', digits @ ..] => {
                (1..=9).contains(&digits.len()) && digits.iter().all(u8::is_ascii_digit)
            }
            _ => false,
        }
}
