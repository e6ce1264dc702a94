//! Application configuration loaded from environment variables.

use std::fmt;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `8080`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `"json"` for JSON log lines, anything else for text
/// - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_NAME`/`DB_PASSWORD`
///   — PostgreSQL connection; without either the in-memory store is used
/// - `DB_MAX_CONNECTIONS` — pool size (default: `5`)
/// - `ORDERS_STRICT_VALIDATION` — `true` to reject empty names, empty item
///   lists and negative quantities (default: `false`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub json_logs: bool,
    pub database: Option<DatabaseConfig>,
    pub max_connections: u32,
    pub strict_validation: bool,
}

/// Where to find PostgreSQL.
#[derive(Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// A `postgres://` connection URL.
    Url(String),
    /// Discrete connection parameters. TLS is disabled.
    Params {
        host: String,
        port: u16,
        user: String,
        database: String,
        password: String,
    },
}

impl DatabaseConfig {
    /// Builds sqlx connection options.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match self {
            DatabaseConfig::Url(url) => url.parse(),
            DatabaseConfig::Params {
                host,
                port,
                user,
                database,
                password,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .username(user)
                .database(database)
                .password(password)
                .ssl_mode(PgSslMode::Disable)),
        }
    }
}

// Keeps passwords out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseConfig::Url(_) => f.write_str("Url(<redacted>)"),
            DatabaseConfig::Params {
                host,
                port,
                user,
                database,
                ..
            } => f
                .debug_struct("Params")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("database", database)
                .finish_non_exhaustive(),
        }
    }
}

impl Config {
    /// Loads a `.env` file from the working directory (or a parent) into the
    /// process environment, then reads the configuration from it. Variables
    /// already set in the environment win over the file. A missing or
    /// unreadable file is ignored.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str| {
            lookup(key)
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            json_logs: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            database: database_from_lookup(&lookup),
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.max_connections),
            strict_validation: flag("ORDERS_STRICT_VALIDATION"),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn database_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Option<DatabaseConfig> {
    if let Some(url) = lookup("DATABASE_URL") {
        return Some(DatabaseConfig::Url(url));
    }

    let host = lookup("DB_HOST")?;
    Some(DatabaseConfig::Params {
        host,
        port: lookup("DB_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(5432),
        user: lookup("DB_USER").unwrap_or_else(|| "postgres".to_string()),
        database: lookup("DB_NAME").unwrap_or_else(|| "postgres".to_string()),
        password: lookup("DB_PASSWORD").unwrap_or_default(),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            json_logs: false,
            database: None,
            max_connections: 5,
            strict_validation: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert!(config.database.is_none());
        assert!(!config.strict_validation);
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert!(!config.json_logs);
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_addr_formatting() {
        let config = config_from(&[("HOST", "127.0.0.1"), ("PORT", "3000")]);
        assert_eq!(config.addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = config_from(&[("PORT", "http")]);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_database_url_takes_precedence() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://u:p@db:5432/orders"),
            ("DB_HOST", "ignored"),
        ]);
        assert_eq!(
            config.database,
            Some(DatabaseConfig::Url("postgres://u:p@db:5432/orders".to_string()))
        );
    }

    #[test]
    fn test_discrete_database_params() {
        let config = config_from(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "orders"),
            ("DB_NAME", "shop"),
            ("DB_PASSWORD", "secret"),
        ]);
        let database = config.database.unwrap();
        assert_eq!(
            database,
            DatabaseConfig::Params {
                host: "db".to_string(),
                port: 6543,
                user: "orders".to_string(),
                database: "shop".to_string(),
                password: "secret".to_string(),
            }
        );
        assert!(database.connect_options().is_ok());
        assert!(!format!("{database:?}").contains("secret"));
    }

    #[test]
    fn test_strict_validation_flag() {
        assert!(config_from(&[("ORDERS_STRICT_VALIDATION", "true")]).strict_validation);
        assert!(config_from(&[("ORDERS_STRICT_VALIDATION", "1")]).strict_validation);
        assert!(!config_from(&[("ORDERS_STRICT_VALIDATION", "off")]).strict_validation);
    }

    #[test]
    fn test_json_log_format() {
        assert!(config_from(&[("LOG_FORMAT", "JSON")]).json_logs);
        assert!(!config_from(&[("LOG_FORMAT", "text")]).json_logs);
    }

    #[test]
    fn test_dotenv_file_layout() {
        let file = "# local development\n\
                    DB_HOST=localhost\n\
                    DB_PORT=5432\n\
                    DB_USER=postgres\n\
                    DB_NAME=orders\n\
                    DB_PASSWORD=\"pa ss\"\n\
                    PORT=9090\n";
        let vars: HashMap<String, String> = dotenvy::from_read_iter(file.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();

        let config = Config::from_lookup(|key| vars.get(key).cloned());

        assert_eq!(config.port, 9090);
        assert_eq!(
            config.database,
            Some(DatabaseConfig::Params {
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                database: "orders".to_string(),
                password: "pa ss".to_string(),
            })
        );
    }
}
