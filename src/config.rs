//! Configuration module
//!
//! Values come from the environment; `main` loads a `.env` file first via dotenvy.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string
    pub database_url: String,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    pub database_max_connections: u32,
    /// Currency code attached to every amount in responses
    pub currency: String,
    /// Default tracing filter when RUST_LOG is not set
    pub log_level: String,
    /// How often the catalog cache is refreshed
    pub cache_warm_interval: Duration,
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            currency: lookup("CURRENCY").unwrap_or(defaults.currency),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            cache_warm_interval: Duration::from_secs(parse_or(
                &lookup,
                "CACHE_WARM_INTERVAL_SECS",
                defaults.cache_warm_interval.as_secs(),
            )?),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_max_connections: 5,
            currency: "KRW".to_string(),
            log_level: "info".to_string(),
            cache_warm_interval: Duration::from_secs(10 * 60),
        }
    }
}
