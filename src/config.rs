//! Process configuration
//!
//! All settings come from `RELECAPI_*` environment variables, each with a
//! default. The resulting [`Config`] is built once at startup and handed to the
//! server; nothing reads the environment after that.

use std::env;
use std::fmt;
use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgSslMode};
use thiserror::Error;

// ============================================================================
// Environment Variables
// ============================================================================

/// Database host
pub const DB_HOST_ENV: &str = "RELECAPI_DBHOST";
/// Database port
pub const DB_PORT_ENV: &str = "RELECAPI_DBPORT";
/// Database name
pub const DB_NAME_ENV: &str = "RELECAPI_DBNAME";
/// Database user
pub const DB_USER_ENV: &str = "RELECAPI_DBUSER";
/// Database password
pub const DB_PASS_ENV: &str = "RELECAPI_DBPASS";
/// Database SSL mode
pub const DB_SSL_ENV: &str = "RELECAPI_SSL";
/// Maximum pooled connections
pub const DB_MAX_CONN_ENV: &str = "RELECAPI_DBMAXCONN";
/// Listening port
pub const PORT_ENV: &str = "RELECAPI_PORT";
/// Listening address
pub const HOST_ENV: &str = "RELECAPI_HOST";

/// Configuration errors, all fatal at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable could not be parsed
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// The SSL mode is not one PostgreSQL understands
    #[error("RELECAPI_SSL must be one of disable, allow, prefer, require, verify-ca, verify-full; got {0:?}")]
    InvalidSslMode(String),
}

// ============================================================================
// SSL Mode
// ============================================================================

/// PostgreSQL SSL negotiation mode, spelled as libpq spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    /// Plain TCP only
    #[default]
    Disable,
    /// Try plain first, then TLS
    Allow,
    /// Try TLS first, then plain
    Prefer,
    /// TLS without certificate checks
    Require,
    /// TLS with CA verification
    VerifyCa,
    /// TLS with CA and hostname verification
    VerifyFull,
}

impl FromStr for SslMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disable" => Ok(SslMode::Disable),
            "allow" => Ok(SslMode::Allow),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            "verify-ca" => Ok(SslMode::VerifyCa),
            "verify-full" => Ok(SslMode::VerifyFull),
            other => Err(ConfigError::InvalidSslMode(other.to_string())),
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        };
        f.write_str(s)
    }
}

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Allow => PgSslMode::Allow,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
            SslMode::VerifyCa => PgSslMode::VerifyCa,
            SslMode::VerifyFull => PgSslMode::VerifyFull,
        }
    }
}

// ============================================================================
// Database Settings
// ============================================================================

/// Database connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database name
    pub name: String,
    /// Role to connect as
    pub user: String,
    /// Password, never logged
    password: String,
    /// SSL negotiation mode
    pub ssl_mode: SslMode,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection options for the sqlx pool
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(self.ssl_mode.into())
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

// ============================================================================
// Process Configuration
// ============================================================================

/// Complete process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Database settings
    pub database: DatabaseConfig,
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Environment Variables
    ///
    /// - `RELECAPI_DBHOST` (default: `localhost`)
    /// - `RELECAPI_DBPORT` (default: `5432`)
    /// - `RELECAPI_DBNAME` (default: `dataapi`)
    /// - `RELECAPI_DBUSER` (default: `dataapi`)
    /// - `RELECAPI_DBPASS` (default: empty)
    /// - `RELECAPI_SSL` (default: `disable`)
    /// - `RELECAPI_DBMAXCONN` (default: `10`)
    /// - `RELECAPI_HOST` (default: `0.0.0.0`)
    /// - `RELECAPI_PORT` (default: `8080`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            host: var(DB_HOST_ENV, "localhost"),
            port: parse_number(DB_PORT_ENV, &var(DB_PORT_ENV, "5432"))?,
            name: var(DB_NAME_ENV, "dataapi"),
            user: var(DB_USER_ENV, "dataapi"),
            password: var(DB_PASS_ENV, ""),
            ssl_mode: var(DB_SSL_ENV, "disable").parse()?,
            max_connections: parse_number(DB_MAX_CONN_ENV, &var(DB_MAX_CONN_ENV, "10"))?,
        };

        Ok(Self {
            database,
            host: var(HOST_ENV, "0.0.0.0"),
            port: parse_number(PORT_ENV, &var(PORT_ENV, "8080"))?,
        })
    }

    /// The `host:port` string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "dataapi");
        assert_eq!(config.database.user, "dataapi");
        assert_eq!(config.database.password, "");
        assert_eq!(config.database.ssl_mode, SslMode::Disable);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (DB_HOST_ENV, "db.internal"),
            (DB_PORT_ENV, "6543"),
            (DB_SSL_ENV, "verify-full"),
            (PORT_ENV, "9000"),
            (HOST_ENV, "127.0.0.1"),
        ]))
        .unwrap();
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.ssl_mode, SslMode::VerifyFull);
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup(&[(PORT_ENV, "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                name: PORT_ENV,
                value: "eighty".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_ssl_mode() {
        let err = Config::from_lookup(lookup(&[(DB_SSL_ENV, "sometimes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSslMode(_)));
    }

    #[test]
    fn test_ssl_mode_display_roundtrip() {
        for mode in ["disable", "allow", "prefer", "require", "verify-ca", "verify-full"] {
            assert_eq!(mode.parse::<SslMode>().unwrap().to_string(), mode);
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config::from_lookup(lookup(&[(DB_PASS_ENV, "hunter2")])).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
