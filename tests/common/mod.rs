// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::{to_bytes, Body};
use axum::response::Response;
use running_stats::config::Config;
use running_stats::db::{connect::connect_lazy, ensure_schema, RecordStore};
use running_stats::routes::create_router;
use running_stats::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is configured.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("⚠️  Skipping: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// Connect to the test database, ensure the schema and start from an empty table.
#[allow(dead_code)]
pub async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database");

    ensure_schema(&pool).await.expect("Failed to ensure schema");
    sqlx::query("TRUNCATE running_statistics RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to truncate table");

    pool
}

/// Record store backed by the test database.
#[allow(dead_code)]
pub async fn test_store() -> RecordStore {
    RecordStore::new(test_pool().await, &Config::test_default())
}

/// Record store whose pool points at a closed port and is never reached
/// unless a handler actually queries it.
#[allow(dead_code)]
pub fn test_store_offline() -> RecordStore {
    let mut config = Config::test_default();
    config.pg_host = "127.0.0.1".to_string();
    config.pg_port = 1;
    config.request_timeout = Duration::from_secs(10);
    RecordStore::new(connect_lazy(&config), &config)
}

#[allow(dead_code)]
pub fn app_with_store(store: RecordStore) -> axum::Router {
    let state = Arc::new(AppState { store });
    create_router(state)
}

/// Create a test app with an unreachable database.
#[allow(dead_code)]
pub fn create_test_app() -> axum::Router {
    app_with_store(test_store_offline())
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
