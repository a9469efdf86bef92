//! SQLite error mapping.
//!
//! Maps `rusqlite::Error` to `DatabaseError` from `querykit_core::database`,
//! keyed by the stage at which the error was raised.

use querykit_core::database::DatabaseError;

/// Where in a statement's lifecycle an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connect,
    Prepare,
    Metadata,
    Execute,
}

/// Maps a rusqlite error to a DatabaseError.
///
/// # Error Mapping
///
/// - `SQLITE_CANTOPEN` and `SQLITE_NOTADB` → `DatabaseError::Connection`
/// - All other errors → the variant for `stage`
pub fn map_rusqlite_error(err: rusqlite::Error, stage: Stage) -> DatabaseError {
    match &err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if matches!(
                sqlite_err.code,
                rusqlite::ErrorCode::CannotOpen | rusqlite::ErrorCode::NotADatabase
            ) =>
        {
            DatabaseError::Connection(err.to_string())
        }

        _ => match stage {
            Stage::Connect => DatabaseError::Connection(err.to_string()),
            Stage::Prepare => DatabaseError::Prepare(err.to_string()),
            Stage::Metadata => DatabaseError::Metadata(err.to_string()),
            Stage::Execute => DatabaseError::Execute(err.to_string()),
        },
    }
}
