use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// trace / debug / info / warn / error
    pub level: String,
}

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/trip_ledger";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: 10,
                run_migrations: true,
            },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then `config/trip-ledger.*` if present,
    /// then `TRIP_LEDGER__SECTION__KEY` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config/trip-ledger")
    }

    pub fn load_from(file_stem: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections as i64)?
            .set_default("database.run_migrations", defaults.database.run_migrations)?
            .set_default("log.level", defaults.log.level)?
            .add_source(File::with_name(file_stem).required(false))
            .add_source(
                Environment::with_prefix("TRIP_LEDGER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Max log level, falling back to INFO on an unknown name
    pub fn log_level(&self) -> tracing::Level {
        self.log.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_defaults_without_a_file() {
        let config = AppConfig::load_from("config/does-not-exist").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let mut config = AppConfig::default();
        config.log.level = "loud".to_string();
        assert_eq!(config.log_level(), tracing::Level::INFO);
        config.log.level = "debug".to_string();
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }
}
