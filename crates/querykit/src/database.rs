//! Connection wrapper.
//!
//! Holds at most one driver connection. Every operation takes `&mut self`, so
//! callers sharing a `Database` across threads serialize access themselves
//! (for example behind a `Mutex`).

use querykit_core::database::{
    ConnectionConfig, Driver, DriverConnection, Result, LIVENESS_TIMEOUT,
};
use querykit_core::query::{QueryResult, Value};

/// A database reached through driver `D`.
pub struct Database<D: Driver> {
    driver: D,
    config: ConnectionConfig,
    conn: Option<D::Connection>,
}

impl<D: Driver> Database<D> {
    /// Creates a new instance. A connection is not attempted.
    pub fn new(driver: D, config: ConnectionConfig) -> Self {
        Self {
            driver,
            config,
            conn: None,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The driver connection string with the password redacted.
    pub fn connection_string(&self) -> String {
        self.config
            .redact(&self.driver.connection_string(&self.config))
    }

    /// Is a connection currently held?
    ///
    /// A held connection may still fail its next liveness check.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Opens a connection unless a live one is already held.
    pub fn connect(&mut self) -> Result<()> {
        self.connection().map(|_| ())
    }

    /// Drops the held connection, if any.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            tracing::debug!(connection = %self.connection_string(), "connection closed");
        }
    }

    /// Runs a query and returns every row.
    ///
    /// Prefer placeholders (`SELECT * FROM users WHERE id = ?`) over
    /// formatting values into `sql`.
    pub fn read(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let conn = self.connection()?;

        tracing::debug!(sql, params = params.len(), "executing query");
        let result = conn
            .execute(sql, params)
            .inspect_err(|err| tracing::debug!(sql, error = %err, "query failed"))?;
        tracing::debug!(rows = result.rows(), "query returned");

        Ok(result)
    }

    /// Runs a write statement and returns the number of affected rows.
    pub fn write(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let conn = self.connection()?;

        tracing::debug!(sql, params = params.len(), "executing update");
        let affected = conn
            .update(sql, params)
            .inspect_err(|err| tracing::debug!(sql, error = %err, "update failed"))?;
        tracing::debug!(affected, "update applied");

        Ok(affected)
    }

    /// Returns the held connection, replacing it first if it is missing or dead.
    fn connection(&mut self) -> Result<&mut D::Connection> {
        let conn = match self.conn.take() {
            Some(mut conn) => {
                if conn.is_valid(LIVENESS_TIMEOUT) {
                    conn
                } else {
                    tracing::warn!(
                        connection = %self.connection_string(),
                        "connection failed liveness check, reconnecting"
                    );
                    self.open()?
                }
            }
            None => self.open()?,
        };

        Ok(self.conn.insert(conn))
    }

    fn open(&self) -> Result<D::Connection> {
        tracing::debug!(connection = %self.connection_string(), "opening connection");
        self.driver.connect(&self.config)
    }
}
