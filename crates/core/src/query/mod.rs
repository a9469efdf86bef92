mod coercion;
mod error;
mod result;
mod row;
mod types;

pub use coercion::{to_boolean, to_number, to_string, to_timestamp};
pub use error::{CoercionError, MaterializeError, Result};
pub use result::{QueryResult, ResultBuilder};
pub use row::Row;
pub use types::{
    format_timestamp, parse_timestamp, ColumnKind, Number, Timestamp, Value, TIMESTAMP_FORMAT,
};
