//! MySQL driver.
//!
//! Implements the driver traits from `querykit_core::database` using the
//! blocking `mysql` client. Host, port, database and credentials come from
//! the configuration; the connection string is the `mysql://` rendering of
//! [`ConnectionConfig::url`](querykit_core::database::ConnectionConfig::url).

mod connection;
mod conversions;
mod error;

pub use connection::{MysqlConnection, MysqlDriver};
