use thiserror::Error;

/// Errors raised by typed accessors used against an incompatible stored value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoercionError {
    #[error("Column not found: {column}")]
    MissingColumn { column: String },
    #[error("Column {column} is not a number (found {found})")]
    NotANumber { column: String, found: &'static str },
    #[error("Column {column} holds an invalid timestamp: {value}")]
    InvalidTimestamp { column: String, value: String },
    #[error("Column {column} holds a timestamp out of range: {value}")]
    TimestampOutOfRange { column: String, value: String },
    #[error("Row {index} out of bounds (result has {rows} rows)")]
    RowOutOfBounds { index: usize, rows: usize },
}

/// Errors raised while assembling a result from driver records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MaterializeError {
    #[error("Record {record} has {actual} values but the result has {expected} columns")]
    RecordWidth {
        record: usize,
        expected: usize,
        actual: usize,
    },
}

/// Result type for accessor operations.
pub type Result<T> = std::result::Result<T, CoercionError>;
