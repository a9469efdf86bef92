//! Coercion rules behind the typed row accessors.
//!
//! Each function takes the stored value of a column (`None` when the row has
//! no such column) and applies one fixed rule. They never touch the row
//! itself, so they can be tested without building results.

use chrono::DateTime;

use super::error::{CoercionError, Result};
use super::types::{parse_timestamp, Number, Timestamp, Value};

/// Textual form of a stored value. Null and absent values render as `"null"`.
pub fn to_string(value: Option<&Value>) -> String {
    match value {
        None => Value::Null.to_string(),
        Some(value) => value.to_string(),
    }
}

/// Numeric view of a stored value.
///
/// Fails when the column is absent or holds a non-numeric kind.
pub fn to_number(column: &str, value: Option<&Value>) -> Result<Number> {
    match value {
        Some(Value::Integer(v)) => Ok(Number::Integer(*v)),
        Some(Value::Real(v)) => Ok(Number::Real(*v)),
        Some(other) => Err(CoercionError::NotANumber {
            column: column.to_string(),
            found: other.kind_name(),
        }),
        None => Err(CoercionError::MissingColumn {
            column: column.to_string(),
        }),
    }
}

/// Truth value of a stored value.
///
/// True for boolean `true`, for numbers equal to exactly 1, and for the text
/// `"1"` or `"true"` in any case. Everything else is false.
pub fn to_boolean(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Boolean(v)) => *v,
        Some(Value::Integer(v)) => *v == 1,
        Some(Value::Real(v)) => *v == 1.0,
        Some(Value::Text(text)) => text == "1" || text.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Timestamp view of a stored value.
///
/// Numbers are epoch milliseconds (reals truncated toward zero), timestamps
/// pass through and text must match [`super::TIMESTAMP_FORMAT`]. Other kinds
/// yield `Ok(None)`.
pub fn to_timestamp(column: &str, value: Option<&Value>) -> Result<Option<Timestamp>> {
    match value {
        Some(Value::Integer(millis)) => from_epoch_millis(column, *millis).map(Some),
        Some(Value::Real(millis)) => {
            let truncated = millis.trunc();
            if !truncated.is_finite() || truncated < i64::MIN as f64 || truncated >= i64::MAX as f64
            {
                return Err(out_of_range(column, millis));
            }
            from_epoch_millis(column, truncated as i64).map(Some)
        }
        Some(Value::Timestamp(ts)) => Ok(Some(*ts)),
        Some(Value::Text(text)) => parse_timestamp(text).map(Some).ok_or_else(|| {
            CoercionError::InvalidTimestamp {
                column: column.to_string(),
                value: text.clone(),
            }
        }),
        _ => Ok(None),
    }
}

fn from_epoch_millis(column: &str, millis: i64) -> Result<Timestamp> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| out_of_range(column, millis))
}

fn out_of_range(column: &str, value: impl ToString) -> CoercionError {
    CoercionError::TimestampOutOfRange {
        column: column.to_string(),
        value: value.to_string(),
    }
}
