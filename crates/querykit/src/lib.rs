//! Parameterized queries and typed result rows over a pluggable driver.
//!
//! [`Database`] wraps one driver connection, opening it lazily and checking it
//! is still alive before each reuse. Queries return a [`QueryResult`] whose
//! rows expose the stored values and the typed accessors defined in
//! `querykit_core`.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite driver using `rusqlite`
//! - `mysql`: MySQL driver using the blocking `mysql` client

mod database;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use database::Database;
pub use querykit_core::database::{
    ConfigError, ConnectionConfig, DatabaseError, Driver, DriverConnection, Result,
};
pub use querykit_core::query::{CoercionError, Number, QueryResult, Row, Timestamp, Value};

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnection, SqliteDriver};

#[cfg(feature = "mysql")]
pub use self::mysql::{MysqlConnection, MysqlDriver};
