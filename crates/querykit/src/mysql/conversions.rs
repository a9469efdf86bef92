//! MySQL value conversion functions.
//!
//! Converts `Value` parameters into the client's positional parameters and
//! turns fetched binary-protocol rows back into `Value`s.

use ::mysql::consts::ColumnType;
use ::mysql::{Column, Params, Value as MysqlValue};
use chrono::{Datelike, NaiveDate, Timelike};
use querykit_core::database::{DatabaseError, Result};
use querykit_core::query::{format_timestamp, ColumnKind, Timestamp, Value};

/// Character set number MySQL reports for binary strings.
const BINARY_CHARSET: u16 = 63;

/// Column names, kinds and byte-string handling of a result set, read once
/// before fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub names: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    pub binary: Vec<bool>,
}

/// Converts a parameter to the MySQL value it is bound as.
///
/// Booleans bind as 0/1 integers and timestamps as DATETIME values. A
/// timestamp whose year MySQL cannot represent binds as canonical text.
pub fn to_mysql_value(value: &Value) -> MysqlValue {
    match value {
        Value::Null => MysqlValue::NULL,
        Value::Integer(v) => MysqlValue::Int(*v),
        Value::Real(v) => MysqlValue::Double(*v),
        Value::Text(v) => MysqlValue::Bytes(v.as_bytes().to_vec()),
        Value::Boolean(v) => MysqlValue::Int(i64::from(*v)),
        Value::Timestamp(ts) => datetime_value(ts)
            .unwrap_or_else(|| MysqlValue::Bytes(format_timestamp(ts).into_bytes())),
        Value::Blob(v) => MysqlValue::Bytes(v.clone()),
    }
}

fn datetime_value(ts: &Timestamp) -> Option<MysqlValue> {
    let year = u16::try_from(ts.year()).ok()?;
    let micros = (ts.nanosecond() / 1_000).min(999_999);

    // chrono keeps these components in u8 range.
    Some(MysqlValue::Date(
        year,
        ts.month() as u8,
        ts.day() as u8,
        ts.hour() as u8,
        ts.minute() as u8,
        ts.second() as u8,
        micros,
    ))
}

/// Converts `params` into positional parameters.
///
/// The number of parameters must match the statement's placeholder count.
pub fn bind_params(expected: usize, params: &[Value]) -> Result<Params> {
    if expected != params.len() {
        return Err(DatabaseError::ParameterCount {
            expected,
            actual: params.len(),
        });
    }

    if params.is_empty() {
        return Ok(Params::Empty);
    }
    Ok(Params::Positional(params.iter().map(to_mysql_value).collect()))
}

/// Decides the value kind of a column from its wire type.
///
/// `TINYINT(1)` is MySQL's `BOOLEAN`; DATETIME values already arrive typed.
pub fn column_kind(column_type: ColumnType, length: u32) -> ColumnKind {
    match column_type {
        ColumnType::MYSQL_TYPE_TINY if length == 1 => ColumnKind::Boolean,
        _ => ColumnKind::Dynamic,
    }
}

/// Returns `true` if byte values of this column are binary data rather than
/// text.
pub fn is_binary(column_type: ColumnType, charset: u16) -> bool {
    match column_type {
        ColumnType::MYSQL_TYPE_BIT | ColumnType::MYSQL_TYPE_GEOMETRY => true,
        ColumnType::MYSQL_TYPE_STRING
        | ColumnType::MYSQL_TYPE_VAR_STRING
        | ColumnType::MYSQL_TYPE_VARCHAR
        | ColumnType::MYSQL_TYPE_TINY_BLOB
        | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
        | ColumnType::MYSQL_TYPE_LONG_BLOB
        | ColumnType::MYSQL_TYPE_BLOB => charset == BINARY_CHARSET,
        _ => false,
    }
}

/// Reads the column set of a result.
pub fn column_metadata(columns: &[Column]) -> ColumnMetadata {
    ColumnMetadata {
        names: columns
            .iter()
            .map(|column| column.name_str().into_owned())
            .collect(),
        kinds: columns
            .iter()
            .map(|column| column_kind(column.column_type(), column.column_length()))
            .collect(),
        binary: columns
            .iter()
            .map(|column| is_binary(column.column_type(), column.character_set()))
            .collect(),
    }
}

/// Converts a fetched MySQL value, keeping its kind.
///
/// Byte strings become `Text` unless the column is binary or the bytes are
/// not valid UTF-8. Values with no exact `Value` counterpart (unsigned
/// integers above `i64::MAX`, zero dates, TIME) keep their MySQL text form.
pub fn value_from_mysql(value: MysqlValue, binary: bool) -> Value {
    match value {
        MysqlValue::NULL => Value::Null,
        MysqlValue::Int(v) => Value::Integer(v),
        MysqlValue::UInt(v) => match i64::try_from(v) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Text(v.to_string()),
        },
        MysqlValue::Float(v) => Value::Real(f64::from(v)),
        MysqlValue::Double(v) => Value::Real(v),
        MysqlValue::Bytes(bytes) if binary => Value::Blob(bytes),
        MysqlValue::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Value::Text(text),
            Err(err) => Value::Blob(err.into_bytes()),
        },
        MysqlValue::Date(year, month, day, hour, minute, second, micros) => {
            NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
                .and_then(|date| {
                    date.and_hms_micro_opt(
                        u32::from(hour),
                        u32::from(minute),
                        u32::from(second),
                        micros,
                    )
                })
                .map(|naive| Value::Timestamp(naive.and_utc()))
                .unwrap_or_else(|| {
                    Value::Text(format!(
                        "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                    ))
                })
        }
        MysqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if negative { "-" } else { "" };
            let hours = u64::from(days) * 24 + u64::from(hours);
            let text = if micros == 0 {
                format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
            } else {
                format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
            };
            Value::Text(text)
        }
    }
}

/// Reads every column of a fetched row.
pub fn read_record(row: &::mysql::Row, metadata: &ColumnMetadata) -> Vec<Value> {
    metadata
        .kinds
        .iter()
        .zip(&metadata.binary)
        .enumerate()
        .map(|(idx, (kind, &binary))| {
            let value = row.as_ref(idx).cloned().unwrap_or(MysqlValue::NULL);
            kind.refine(value_from_mysql(value, binary))
        })
        .collect()
}
