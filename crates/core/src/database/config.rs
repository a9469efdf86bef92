use std::fmt;

use thiserror::Error;

/// Scheme of the default connection string rendering.
pub const MYSQL_SCHEME: &str = "mysql";

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 3306;

const REDACTED: &str = "****";

/// Errors that can occur when loading a connection configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Parameters needed to reach a database server.
///
/// Creating a configuration never attempts a connection. `Debug` output hides
/// the password.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl ConnectionConfig {
    /// Creates a configuration for `database` on `localhost:3306` with no credentials.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: database.into(),
            user: String::new(),
            password: String::new(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the user name and password.
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QUERYKIT_DB_HOST`: Server host (default: `localhost`)
    /// - `QUERYKIT_DB_PORT`: Server port (default: `3306`)
    /// - `QUERYKIT_DB_NAME`: Database name (required)
    /// - `QUERYKIT_DB_USER`: User name (default: empty)
    /// - `QUERYKIT_DB_PASSWORD`: Password (default: empty)
    ///
    /// # Errors
    ///
    /// Returns an error if the database name is missing or the port is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|var| std::env::var(var).ok())
    }

    /// Same as [`ConnectionConfig::from_env`], reading variables through `lookup`.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = lookup("QUERYKIT_DB_NAME").ok_or(ConfigError::Missing("QUERYKIT_DB_NAME"))?;

        let port = match lookup("QUERYKIT_DB_PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "QUERYKIT_DB_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("QUERYKIT_DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            database,
            user: lookup("QUERYKIT_DB_USER").unwrap_or_default(),
            password: lookup("QUERYKIT_DB_PASSWORD").unwrap_or_default(),
        })
    }

    /// Renders `{scheme}://{host}:{port}/{database}?user={user}&password={password}`.
    ///
    /// User and password are percent-encoded.
    pub fn url(&self, scheme: &str) -> String {
        format!(
            "{scheme}://{}:{}/{}?user={}&password={}",
            self.host,
            self.port,
            self.database,
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
        )
    }

    /// The MySQL rendering of [`ConnectionConfig::url`].
    pub fn connection_string(&self) -> String {
        self.url(MYSQL_SCHEME)
    }

    /// Replaces every occurrence of the password in `text`, raw or encoded.
    pub fn redact(&self, text: &str) -> String {
        if self.password.is_empty() {
            return text.to_string();
        }
        let encoded = urlencoding::encode(&self.password);
        text.replace(encoded.as_ref(), REDACTED)
            .replace(&self.password, REDACTED)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    fn sample() -> ConnectionConfig {
        ConnectionConfig::new("shop")
            .with_host("db.example.com")
            .with_port(3307)
            .with_credentials("app", "s3cret")
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = ConnectionConfig::new("shop");

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert_eq!(config.user, "");
        assert_eq!(config.password, "");
    }

    #[test]
    fn test_connection_string_format() {
        assert_eq!(
            sample().connection_string(),
            "mysql://db.example.com:3307/shop?user=app&password=s3cret"
        );
    }

    #[test]
    fn test_url_encodes_credentials() {
        let config = ConnectionConfig::new("shop").with_credentials("a b", "p&ss=1");

        assert_eq!(
            config.url("mysql"),
            "mysql://localhost:3306/shop?user=a%20b&password=p%26ss%3D1"
        );
    }

    #[test]
    fn test_redact_hides_password() {
        let config = ConnectionConfig::new("shop").with_credentials("app", "p&ss");

        let redacted = config.redact(&config.connection_string());

        assert_eq!(redacted, "mysql://localhost:3306/shop?user=app&password=****");
    }

    #[test]
    fn test_redact_without_password_is_identity() {
        let config = ConnectionConfig::new("shop");

        assert_eq!(config.redact("anything"), "anything");
    }

    #[test]
    fn test_debug_hides_password() {
        let debug = format!("{:?}", sample());

        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("****"));
    }

    #[test]
    fn test_from_env_with_all_variables() {
        let config = ConnectionConfig::from_env_with(env(&[
            ("QUERYKIT_DB_HOST", "db.example.com"),
            ("QUERYKIT_DB_PORT", "3307"),
            ("QUERYKIT_DB_NAME", "shop"),
            ("QUERYKIT_DB_USER", "app"),
            ("QUERYKIT_DB_PASSWORD", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config, sample());
    }

    #[test]
    fn test_from_env_with_defaults() {
        let config = ConnectionConfig::from_env_with(env(&[("QUERYKIT_DB_NAME", "shop")])).unwrap();

        assert_eq!(config, ConnectionConfig::new("shop"));
    }

    #[test]
    fn test_from_env_requires_database_name() {
        let result = ConnectionConfig::from_env_with(env(&[]));

        assert_eq!(result, Err(ConfigError::Missing("QUERYKIT_DB_NAME")));
    }

    #[test]
    fn test_from_env_rejects_invalid_port() {
        let result = ConnectionConfig::from_env_with(env(&[
            ("QUERYKIT_DB_NAME", "shop"),
            ("QUERYKIT_DB_PORT", "not-a-port"),
        ]));

        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                var: "QUERYKIT_DB_PORT",
                value: "not-a-port".to_string(),
            })
        );
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::Missing("QUERYKIT_DB_NAME").to_string(),
            "missing environment variable: QUERYKIT_DB_NAME"
        );
    }
}
