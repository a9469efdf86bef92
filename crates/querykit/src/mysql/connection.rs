//! MySQL driver and connection.
//!
//! Implements the driver traits from `querykit_core::database` on top of a
//! blocking `mysql::Conn`, always through server-side prepared statements.

use std::time::Duration;

use ::mysql::prelude::Queryable;
use ::mysql::{Opts, OptsBuilder};
use querykit_core::database::{
    ConnectionConfig, Driver, DriverConnection, Result, MYSQL_SCHEME,
};
use querykit_core::query::{QueryResult, ResultBuilder, Value};

use super::conversions::{bind_params, column_metadata, read_record};
use super::error::{map_mysql_error, Stage};

/// Opens MySQL connections to the configured server.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDriver;

/// Client options for `config`: host, port, database and, when set, user and
/// password.
pub(crate) fn client_opts(config: &ConnectionConfig) -> Opts {
    let non_empty = |field: &str| (!field.is_empty()).then(|| field.to_string());

    OptsBuilder::new()
        .ip_or_hostname(Some(config.host.clone()))
        .tcp_port(config.port)
        .db_name(Some(config.database.clone()))
        .user(non_empty(&config.user))
        .pass(non_empty(&config.password))
        .into()
}

impl Driver for MysqlDriver {
    type Connection = MysqlConnection;

    fn connection_string(&self, config: &ConnectionConfig) -> String {
        config.url(MYSQL_SCHEME)
    }

    fn connect(&self, config: &ConnectionConfig) -> Result<MysqlConnection> {
        tracing::debug!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "opening mysql connection"
        );

        let conn = ::mysql::Conn::new(client_opts(config))
            .map_err(|e| map_mysql_error(e, Stage::Connect))?;

        Ok(MysqlConnection { conn })
    }
}

/// An open MySQL connection.
pub struct MysqlConnection {
    conn: ::mysql::Conn,
}

impl MysqlConnection {
    fn prepare(&mut self, sql: &str) -> Result<::mysql::Statement> {
        self.conn
            .prep(sql)
            .map_err(|e| map_mysql_error(e, Stage::Prepare))
    }
}

impl DriverConnection for MysqlConnection {
    /// Runs `SELECT 1`. The client has no per-call deadline, so the timeout
    /// is not applied.
    fn is_valid(&mut self, _timeout: Duration) -> bool {
        self.conn.query_drop("SELECT 1").is_ok()
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let stmt = self.prepare(sql)?;
        let params = bind_params(usize::from(stmt.num_params()), params)?;

        let mut result = self
            .conn
            .exec_iter(&stmt, params)
            .map_err(|e| map_mysql_error(e, Stage::Execute))?;
        let metadata = column_metadata(result.columns().as_ref());
        let mut builder = ResultBuilder::new(metadata.names.clone());

        for row in &mut result {
            let row = row.map_err(|e| map_mysql_error(e, Stage::Execute))?;
            builder.push(read_record(&row, &metadata))?;
        }

        Ok(builder.finish())
    }

    fn update(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        let stmt = self.prepare(sql)?;
        let params = bind_params(usize::from(stmt.num_params()), params)?;

        self.conn
            .exec_drop(&stmt, params)
            .map_err(|e| map_mysql_error(e, Stage::Execute))?;

        Ok(self.conn.affected_rows())
    }
}
