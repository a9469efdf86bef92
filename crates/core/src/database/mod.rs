mod config;
mod error;
mod traits;

pub use config::{ConfigError, ConnectionConfig, DEFAULT_PORT, MYSQL_SCHEME};
pub use error::{DatabaseError, Result};
pub use traits::{Driver, DriverConnection, LIVENESS_TIMEOUT};
