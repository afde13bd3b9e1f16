//! Database layer (PostgreSQL via sqlx).

pub mod connect;
pub mod schema;
pub mod store;
pub mod tx;

pub use connect::{establish_connection, BackoffPolicy};
pub use schema::ensure_schema;
pub use store::RecordStore;

/// Storage-layer failures, split by the phase that produced them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database unreachable once the backoff budget ran out. Fatal at startup.
    #[error("failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    /// Table creation failed. Fatal at startup.
    #[error("failed to ensure schema: {0}")]
    Schema(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("write failed: {0}")]
    Write(#[source] sqlx::Error),

    #[error("database call exceeded the {0:?} request deadline")]
    Timeout(std::time::Duration),
}
