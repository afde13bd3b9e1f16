// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The `PG*` variables follow the libpq naming so the service can share an
//! environment with `psql` and friends.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listener port
    pub http_port: u16,

    // --- Database connection ---
    pub pg_host: String,
    pub pg_port: u16,
    pub pg_database: String,
    pub pg_user: String,
    /// Optional; trust/peer auth setups run without one
    pub pg_password: Option<String>,

    // --- Tuning ---
    /// Upper bound on pooled connections
    pub db_max_connections: u32,
    /// Total time the startup connection backoff may spend before giving up
    pub db_connect_max_elapsed: Duration,
    /// Automatic restarts of a transaction that hit a serialization conflict
    pub db_tx_max_retries: u32,
    /// Deadline applied to every per-request database call
    pub request_timeout: Duration,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            http_port: 8080,
            pg_host: "localhost".to_string(),
            pg_port: 5432,
            pg_database: "postgres".to_string(),
            pg_user: "postgres".to_string(),
            pg_password: None,
            db_max_connections: 10,
            db_connect_max_elapsed: Duration::from_secs(5),
            db_tx_max_retries: 5,
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            http_port: parse_var("HTTP_PORT", 8080)?,
            pg_host: env::var("PGHOST").unwrap_or_else(|_| "localhost".to_string()),
            pg_port: parse_var("PGPORT", 5432)?,
            pg_database: env::var("PGDATABASE").unwrap_or_else(|_| "postgres".to_string()),
            pg_user: env::var("PGUSER").unwrap_or_else(|_| "postgres".to_string()),
            pg_password: env::var("PGPASSWORD").ok().filter(|v| !v.is_empty()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            db_connect_max_elapsed: Duration::from_secs(parse_var(
                "DB_CONNECT_MAX_ELAPSED_SECS",
                900,
            )?),
            db_tx_max_retries: parse_var("DB_TX_MAX_RETRIES", 5)?,
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

/// Read `name` and parse it, falling back to `default` when unset or empty.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Invalid(name))
        }
        _ => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // All env manipulation lives in one test so parallel tests can't race on it.
    #[test]
    fn test_config_from_env() {
        env::set_var("HTTP_PORT", "9090");
        env::set_var("PGHOST", "db.internal");
        env::set_var("PGPORT", "26257");
        env::set_var("PGPASSWORD", "");
        env::remove_var("DB_TX_MAX_RETRIES");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.http_port, 9090);
        assert_eq!(config.pg_host, "db.internal");
        assert_eq!(config.pg_port, 26257);
        assert_eq!(config.pg_password, None);
        assert_eq!(config.db_tx_max_retries, 5);

        env::set_var("PGPORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("PGPORT")));

        env::remove_var("HTTP_PORT");
        env::remove_var("PGHOST");
        env::remove_var("PGPORT");
        env::remove_var("PGPASSWORD");
    }
}
