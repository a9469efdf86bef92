//! MySQL error mapping.
//!
//! Maps `mysql::Error` to `DatabaseError` from `querykit_core::database`,
//! keyed by the stage at which the error was raised.

use querykit_core::database::DatabaseError;

/// Where in a statement's lifecycle an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Prepare,
    Execute,
}

/// Maps a mysql client error to a DatabaseError.
///
/// # Error Mapping
///
/// - I/O and URL errors → `DatabaseError::Connection`
/// - All other errors → the variant for `stage`
pub fn map_mysql_error(err: ::mysql::Error, stage: Stage) -> DatabaseError {
    match &err {
        ::mysql::Error::IoError(_) | ::mysql::Error::UrlError(_) => {
            DatabaseError::Connection(err.to_string())
        }

        _ => match stage {
            Stage::Connect => DatabaseError::Connection(err.to_string()),
            Stage::Prepare => DatabaseError::Prepare(err.to_string()),
            Stage::Execute => DatabaseError::Execute(err.to_string()),
        },
    }
}
