use dotenvy::dotenv;
use relay_core::DEFAULT_TIMEOUT_MS;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub default_timeout_ms: u64,
    pub is_production: bool,
}

impl Config {
    /// Reads `.env` and the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let default_timeout_ms = match lookup("RELAY_DEFAULT_TIMEOUT_MS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "RELAY_DEFAULT_TIMEOUT_MS",
                value: value.clone(),
            })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        let is_production = lookup("APP_ENV")
            .map(|val| val == "production")
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            default_timeout_ms,
            is_production,
        })
    }
}
