// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Startup connection to PostgreSQL with exponential backoff.
//!
//! The database is a hard startup dependency: the pool is only handed out once
//! a real connection has been made, and running out of backoff budget is fatal.

use crate::config::Config;
use crate::db::StoreError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;

/// How long a request may wait for a pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Exponential backoff schedule for the startup connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay before the first retry
    pub initial_interval: Duration,
    /// Cap on any single delay
    pub max_interval: Duration,
    /// Total sleep budget across all retries
    pub max_elapsed: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(60),
            max_elapsed: Duration::from_secs(15 * 60),
        }
    }
}

impl BackoffPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_elapsed: config.db_connect_max_elapsed,
            ..Self::default()
        }
    }

    /// Un-jittered delays, doubling from `initial_interval`, ending once the
    /// running total would exceed `max_elapsed`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        // from_millis(2) doubles each step; the factor scales the first delay.
        let first_ms = (self.initial_interval.as_millis() as u64).max(2);
        let budget = self.max_elapsed;
        let mut spent = Duration::ZERO;

        ExponentialBackoff::from_millis(2)
            .factor(first_ms / 2)
            .max_delay(self.max_interval)
            .take_while(move |delay| {
                spent += *delay;
                spent <= budget
            })
    }

    /// The retry strategy actually used: `delays()` with jitter applied.
    pub fn strategy(&self) -> impl Iterator<Item = Duration> {
        self.delays().map(jitter)
    }
}

/// Build the connection descriptor. TLS is never negotiated.
pub fn connect_options(config: &Config) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&config.pg_host)
        .port(config.pg_port)
        .database(&config.pg_database)
        .username(&config.pg_user)
        .ssl_mode(PgSslMode::Disable)
        .application_name("running-stats");

    match &config.pg_password {
        Some(password) => options.password(password),
        None => options,
    }
}

fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Open the pool, retrying with exponential backoff until a connection
/// succeeds or the policy's budget is exhausted.
pub async fn establish_connection(
    config: &Config,
    policy: BackoffPolicy,
) -> Result<PgPool, StoreError> {
    let options = connect_options(config);
    let attempts = AtomicU32::new(0);

    tracing::info!(
        host = %config.pg_host,
        port = config.pg_port,
        database = %config.pg_database,
        "Connecting to database"
    );

    let pool = Retry::start(policy.strategy(), || {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let options = options.clone();
        async move {
            pool_options(config)
                .connect_with(options)
                .await
                .inspect_err(|e| {
                    tracing::warn!(attempt, error = %e, "Database connection attempt failed");
                })
        }
    })
    .await
    .map_err(|e| {
        tracing::error!(
            attempts = attempts.load(Ordering::Relaxed),
            error = %e,
            "Giving up on database connection"
        );
        StoreError::Connection(e)
    })?;

    tracing::info!(
        attempts = attempts.load(Ordering::Relaxed),
        "Database connection established"
    );
    Ok(pool)
}

/// Build a pool without connecting. Connections are opened on first use.
pub fn connect_lazy(config: &Config) -> PgPool {
    pool_options(config).connect_lazy_with(connect_options(config))
}
