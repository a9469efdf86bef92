//! SQLite driver and connection.
//!
//! Implements the driver traits from `querykit_core::database` on top of a
//! synchronous `rusqlite::Connection`.

use std::time::Duration;

use querykit_core::database::{ConnectionConfig, Driver, DriverConnection, Result};
use querykit_core::query::{QueryResult, ResultBuilder, Value};

use super::conversions::{bind_params, column_metadata, read_record};
use super::error::{map_rusqlite_error, Stage};

/// How long a statement waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens SQLite databases at the configured path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDriver;

impl Driver for SqliteDriver {
    type Connection = SqliteConnection;

    fn connection_string(&self, config: &ConnectionConfig) -> String {
        config.database.clone()
    }

    fn connect(&self, config: &ConnectionConfig) -> Result<SqliteConnection> {
        let path = self.connection_string(config);
        tracing::debug!(path = %path, "opening sqlite database");

        let conn = rusqlite::Connection::open(&path)
            .map_err(|e| map_rusqlite_error(e, Stage::Connect))?;

        SqliteConnection::configure(conn)
    }
}

/// An open SQLite connection.
///
/// Statements and cursors live only for the duration of one call and are
/// finalized when it returns, whether it succeeded or not.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| map_rusqlite_error(e, Stage::Connect))?;
        Self::configure(conn)
    }

    fn configure(conn: rusqlite::Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| map_rusqlite_error(e, Stage::Connect))?;
        Ok(Self { conn })
    }
}

impl DriverConnection for SqliteConnection {
    /// Runs `SELECT 1`. A local database has no round trip to bound, so the
    /// timeout is not applied and the connection settings are left untouched.
    fn is_valid(&mut self, _timeout: Duration) -> bool {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| map_rusqlite_error(e, Stage::Prepare))?;
        bind_params(&mut stmt, params)?;

        let metadata = column_metadata(&stmt)?;
        let mut builder = ResultBuilder::new(metadata.names);

        let mut rows = stmt.raw_query();
        while let Some(row) = rows
            .next()
            .map_err(|e| map_rusqlite_error(e, Stage::Execute))?
        {
            builder.push(read_record(row, &metadata.kinds)?)?;
        }

        Ok(builder.finish())
    }

    fn update(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| map_rusqlite_error(e, Stage::Prepare))?;
        bind_params(&mut stmt, params)?;

        let affected = stmt
            .raw_execute()
            .map_err(|e| map_rusqlite_error(e, Stage::Execute))?;

        Ok(affected as u64)
    }
}
