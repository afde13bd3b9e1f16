// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Transactions that restart themselves on serialization conflicts.
//!
//! Under SERIALIZABLE isolation (and always on CockroachDB) a transaction may
//! be aborted because a concurrent one touched the same rows. The fix is to
//! re-run the whole transaction, so the body is passed in as a closure that
//! only talks to the connection it is given.

use futures_util::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

/// SQLSTATE serialization_failure
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE deadlock_detected
const DEADLOCK_DETECTED: &str = "40P01";

/// Whether the error is a transient conflict that a fresh transaction can clear.
pub fn is_retryable(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == SERIALIZATION_FAILURE || code == DEADLOCK_DETECTED)
}

/// Run `op` inside a transaction and commit it.
///
/// If `op` or the commit fails with a retryable error, the transaction is
/// rolled back and `op` runs again, up to `max_retries` extra times. Any other
/// error, or the last retryable one, is returned as-is.
pub async fn execute_tx<T, F>(pool: &PgPool, max_retries: u32, mut op: F) -> Result<T, sqlx::Error>
where
    T: Send,
    F: for<'c> FnMut(&'c mut PgConnection) -> BoxFuture<'c, Result<T, sqlx::Error>>,
{
    let mut restarts = 0;

    loop {
        let mut tx = pool.begin().await?;

        let body = op(&mut *tx).await;
        let outcome = match body {
            Ok(value) => tx.commit().await.map(|()| value),
            Err(e) => {
                // Dropping the transaction would roll back too, but an explicit
                // rollback returns the connection to the pool in a clean state.
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::debug!(error = %rollback_err, "Rollback after failed transaction body failed");
                }
                Err(e)
            }
        };

        match outcome {
            Err(e) if is_retryable(&e) && restarts < max_retries => {
                restarts += 1;
                tracing::warn!(restarts, error = %e, "Retrying transaction after conflict");
            }
            other => return other,
        }
    }
}
