//! Configuration module - environment variable parsing

use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Interval between client simulation ticks
    pub tick_interval: Duration,
    /// Client-side movement speed (position units per elapsed millisecond)
    pub client_speed: i64,
    /// Server-side movement speed; set differently from `client_speed` to force corrections
    pub server_speed: i64,
    /// Simulated one-way latency between client and server
    pub server_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            tick_interval: Duration::from_millis(parse_or("TICK_INTERVAL_MS", 1000)?),
            client_speed: parse_or("CLIENT_SPEED", 1)?,
            server_speed: parse_or("SERVER_SPEED", 1)?,
            server_delay: Duration::from_millis(parse_or("SERVER_DELAY_MS", 3500)?),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
