// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record store over the `running_statistics` table.
//!
//! The store owns no record state of its own; every call goes to the
//! database. It is cheap to clone and safe to share across requests since
//! the only shared resource is the connection pool.

use crate::config::Config;
use crate::db::{tx, StoreError};
use crate::models::{NewRecord, Record};
use futures_util::FutureExt;
use sqlx::PgPool;
use std::future::Future;
use std::time::Duration;

/// Database-backed record store.
#[derive(Clone)]
pub struct RecordStore {
    pool: PgPool,
    tx_max_retries: u32,
    deadline: Duration,
}

impl RecordStore {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            tx_max_retries: config.db_tx_max_retries,
            deadline: config.request_timeout,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Bound a database call by the per-request deadline. The inner future
    /// is dropped on expiry, which aborts its query.
    async fn with_deadline<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.deadline, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.deadline))?
    }

    /// Count all stored records.
    pub async fn count_records(&self) -> Result<i64, StoreError> {
        self.with_deadline(async {
            let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM running_statistics")
                .fetch_one(&self.pool)
                .await
                .map_err(StoreError::Query)?;
            Ok(count)
        })
        .await
    }

    /// Insert the record unless its `(date, distance, time)` key already exists.
    ///
    /// Returns `true` iff this call wrote the row. Concurrent submissions of
    /// the same key are settled by the unique constraint, so exactly one of
    /// them sees `true`.
    pub async fn insert_record_if_absent(&self, record: &NewRecord) -> Result<bool, StoreError> {
        let created = self
            .with_deadline(async {
                tx::execute_tx(&self.pool, self.tx_max_retries, |conn| {
                    // Owned copy: the body may run more than once and must
                    // not borrow past the connection's lifetime.
                    let record = record.clone();
                    async move {
                        let result = sqlx::query(
                            r#"
                            INSERT INTO running_statistics (date, distance, time)
                            VALUES ($1, $2, $3)
                            ON CONFLICT DO NOTHING
                            "#,
                        )
                        .bind(record.date)
                        .bind(&record.distance)
                        .bind(&record.time)
                        .execute(conn)
                        .await?;

                        Ok(result.rows_affected() > 0)
                    }
                    .boxed()
                })
                .await
                .map_err(StoreError::Write)
            })
            .await?;

        tracing::debug!(
            date = %record.date,
            distance = %record.distance,
            time = %record.time,
            created,
            "Record submission stored"
        );
        Ok(created)
    }

    /// Fetch the stored row for a natural key.
    pub async fn get_record(&self, key: &NewRecord) -> Result<Option<Record>, StoreError> {
        self.with_deadline(async {
            sqlx::query_as::<_, Record>(
                r#"
                SELECT id, date, distance, time, created_at
                FROM running_statistics
                WHERE date = $1 AND distance = $2 AND time = $3
                "#,
            )
            .bind(key.date)
            .bind(&key.distance)
            .bind(&key.time)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::Query)
        })
        .await
    }
}
