//! SQLite driver.
//!
//! Implements the driver traits from `querykit_core::database` using
//! `rusqlite`. The `database` field of the configuration is the file path;
//! `:memory:` opens a private in-memory database. Host, port and credentials
//! are ignored.

mod connection;
mod conversions;
mod error;

pub use connection::{SqliteConnection, SqliteDriver};
