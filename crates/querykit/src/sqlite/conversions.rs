//! SQLite value conversion functions.
//!
//! Binds `Value` parameters onto statements and turns fetched rows back into
//! `Value`s.

use querykit_core::database::{DatabaseError, Result};
use querykit_core::query::{format_timestamp, ColumnKind, Value};
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Row, Statement};

use super::error::{map_rusqlite_error, Stage};

/// Column names and kinds of a prepared statement, read once before fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub names: Vec<String>,
    pub kinds: Vec<ColumnKind>,
}

/// Converts a parameter to the SQLite value it is bound as.
///
/// Booleans bind as 0/1 integers and timestamps as canonical text, SQLite's
/// own representations for those kinds.
pub fn to_sql_output(value: &Value) -> ToSqlOutput<'_> {
    match value {
        Value::Null => ToSqlOutput::Owned(SqlValue::Null),
        Value::Integer(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
        Value::Real(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
        Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        Value::Boolean(v) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v))),
        Value::Timestamp(ts) => ToSqlOutput::Owned(SqlValue::Text(format_timestamp(ts))),
        Value::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
    }
}

/// Binds `params` positionally, starting at index 1.
///
/// The number of parameters must match the statement's placeholder count.
pub fn bind_params(stmt: &mut Statement<'_>, params: &[Value]) -> Result<()> {
    let expected = stmt.parameter_count();
    if expected != params.len() {
        return Err(DatabaseError::ParameterCount {
            expected,
            actual: params.len(),
        });
    }

    for (offset, value) in params.iter().enumerate() {
        stmt.raw_bind_parameter(offset + 1, to_sql_output(value))
            .map_err(|e| map_rusqlite_error(e, Stage::Prepare))?;
    }
    Ok(())
}

/// Reads the column set of a prepared statement.
pub fn column_metadata(stmt: &Statement<'_>) -> Result<ColumnMetadata> {
    let names = (0..stmt.column_count())
        .map(|idx| {
            stmt.column_name(idx)
                .map(str::to_string)
                .map_err(|e| map_rusqlite_error(e, Stage::Metadata))
        })
        .collect::<Result<Vec<_>>>()?;
    let kinds = stmt
        .columns()
        .iter()
        .map(|column| ColumnKind::from_declared_type(column.decl_type()))
        .collect();

    Ok(ColumnMetadata { names, kinds })
}

/// Converts a stored SQLite value, keeping its storage class.
///
/// TEXT that is not valid UTF-8 comes back as a `Blob` of the stored bytes.
pub fn value_from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(v) => match String::from_utf8(v.to_vec()) {
            Ok(text) => Value::Text(text),
            Err(err) => Value::Blob(err.into_bytes()),
        },
        ValueRef::Blob(v) => Value::Blob(v.to_vec()),
    }
}

/// Reads every column of a fetched row, one value per column kind.
pub fn read_record(row: &Row<'_>, kinds: &[ColumnKind]) -> Result<Vec<Value>> {
    kinds
        .iter()
        .enumerate()
        .map(|(idx, kind)| {
            let value = row
                .get_ref(idx)
                .map_err(|e| map_rusqlite_error(e, Stage::Execute))?;
            Ok(kind.refine(value_from_sql(value)))
        })
        .collect()
}
