//! Table creation for the running statistics relation.

use crate::db::StoreError;
use sqlx::PgPool;

const CREATE_RUNNING_STATISTICS: &str = r#"
    CREATE TABLE IF NOT EXISTS running_statistics (
        id SERIAL PRIMARY KEY,
        date DATE,
        distance VARCHAR(10),
        time VARCHAR(10),
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        UNIQUE (date, distance, time)
    )
"#;

/// Create the `running_statistics` table if it does not exist.
///
/// Safe to run on every start; an existing table and its rows are left alone.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(CREATE_RUNNING_STATISTICS)
        .execute(pool)
        .await
        .map_err(StoreError::Schema)?;

    tracing::info!(table = "running_statistics", "Schema ensured");
    Ok(())
}
