use std::time::Duration;

use crate::query::{QueryResult, Value};

use super::{ConnectionConfig, Result};

/// Timeout of the liveness check run before a held connection is reused.
pub const LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);

/// A database client library capable of opening connections.
pub trait Driver {
    type Connection: DriverConnection;

    /// Renders the connection string handed to the client library.
    fn connection_string(&self, config: &ConnectionConfig) -> String;

    /// Opens a new connection.
    fn connect(&self, config: &ConnectionConfig) -> Result<Self::Connection>;
}

/// One open connection. At most one statement is in flight at a time.
pub trait DriverConnection {
    /// Returns `true` if the connection still answers within `timeout`.
    fn is_valid(&mut self, timeout: Duration) -> bool;

    /// Runs a query, binding `params` positionally, and materializes every row.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult>;

    /// Runs a write statement, binding `params` positionally.
    ///
    /// Returns the number of affected rows.
    fn update(&mut self, sql: &str, params: &[Value]) -> Result<u64>;
}
