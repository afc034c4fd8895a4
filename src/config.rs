//! Application configuration loaded from environment variables.

use std::env;
use std::path::Path;

/// Default values used when a variable is unset.
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8080;
    pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024; // 10MB per report
    pub const DB_MAX_CONNECTIONS: u32 = 10;
    pub const DB_MIN_CONNECTIONS: u32 = 1;
}

/// Individual database variables, used when `DATABASE_URL` is not set.
pub mod db_vars {
    pub const DB_TYPE: &str = "DB_TYPE";
    pub const DB_HOST: &str = "DB_HOST";
    pub const DB_PORT: &str = "DB_PORT";
    pub const DB_NAME: &str = "DB_NAME";
    pub const DB_USER: &str = "DB_USER";
    pub const DB_PASSWORD: &str = "DB_PASSWORD";

    pub const ALL: [&str; 6] = [DB_TYPE, DB_NAME, DB_HOST, DB_PORT, DB_USER, DB_PASSWORD];
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum report upload size in bytes (default: 10MB)
    pub max_upload_size: usize,
    /// Database settings
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRECO_HOST`: Server host (default: 0.0.0.0)
    /// - `TRECO_PORT`: Server port (default: 8080)
    /// - `TRECO_MAX_UPLOAD_SIZE`: Max report size in bytes (default: 10MB)
    /// - `DATABASE_URL`: PostgreSQL connection string, or all of
    ///   `DB_TYPE` (must be `postgres`), `DB_HOST`, `DB_PORT`, `DB_NAME`,
    ///   `DB_USER` and `DB_PASSWORD`
    /// - `DB_MAX_CONNECTIONS` / `DB_MIN_CONNECTIONS`: pool bounds (default: 10 / 1)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load an env-file into the process environment, then read the configuration.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Using config file at path {}", path.display());
        dotenvy::from_path(path).map_err(|e| ConfigError::ConfigFile(e.to_string()))?;
        Self::from_env()
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("TRECO_HOST").unwrap_or_else(|| defaults::HOST.to_string());

        let port = lookup("TRECO_PORT")
            .map(|p| p.parse::<u16>())
            .transpose()
            .map_err(|_| ConfigError::InvalidValue("TRECO_PORT must be a valid port number"))?
            .unwrap_or(defaults::PORT);

        let max_upload_size = lookup("TRECO_MAX_UPLOAD_SIZE")
            .map(|v| v.parse::<usize>())
            .transpose()
            .map_err(|_| ConfigError::InvalidValue("TRECO_MAX_UPLOAD_SIZE must be a valid number"))?
            .unwrap_or(defaults::MAX_UPLOAD_SIZE);

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS must be a valid number"))?
            .unwrap_or(defaults::DB_MAX_CONNECTIONS);

        let min_connections = lookup("DB_MIN_CONNECTIONS")
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|_| ConfigError::InvalidValue("DB_MIN_CONNECTIONS must be a valid number"))?
            .unwrap_or(defaults::DB_MIN_CONNECTIONS);

        let url = match lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        Ok(Config {
            host,
            port,
            max_upload_size,
            database: DatabaseConfig {
                url,
                max_connections,
                min_connections: min_connections.min(max_connections),
            },
        })
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn database_url_from_parts<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if db_vars::ALL.iter().any(|key| get(key).is_none()) {
        return Err(ConfigError::MissingDatabase);
    }

    let db_type = get(db_vars::DB_TYPE).unwrap_or_default();
    if !db_type.eq_ignore_ascii_case("postgres") {
        return Err(ConfigError::UnsupportedStorage(db_type));
    }

    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        urlencoding::encode(&get(db_vars::DB_USER).unwrap_or_default()),
        urlencoding::encode(&get(db_vars::DB_PASSWORD).unwrap_or_default()),
        get(db_vars::DB_HOST).unwrap_or_default(),
        get(db_vars::DB_PORT).unwrap_or_default(),
        get(db_vars::DB_NAME).unwrap_or_default(),
    ))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error(
        "missing db details, please set DATABASE_URL or all of these environment variables: {}",
        db_vars::ALL.join(", ")
    )]
    MissingDatabase,

    #[error("storage type {0} not supported, please check value of DB_TYPE in environment variables")]
    UnsupportedStorage(String),

    #[error("Unable to load config file: {0}")]
    ConfigFile(String),
}
