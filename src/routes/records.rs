// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Status page and record submission routes.

use crate::error::{AppError, Result};
use crate::models::NewRecord;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(status_page))
        .route("/running_statistics", post(submit_record))
}

// ─── Status Page ─────────────────────────────────────────────

/// Greeting with the current record count.
///
/// Failures come back as 500 with the raw error text in an HTML body.
async fn status_page(State(state): State<Arc<AppState>>) -> Response {
    match state.store.count_records().await {
        Ok(count) => Html(format!("Hello, Docker! ({})\n", count)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to count records");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(e.to_string())).into_response()
        }
    }
}

// ─── Submission ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub record_created: bool,
}

/// Store a record unless an identical one already exists.
async fn submit_record(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<NewRecord>, JsonRejection>,
) -> Result<Json<SubmissionResponse>> {
    let Json(record) = payload.map_err(|e| AppError::InvalidPayload(e.body_text()))?;

    let record_created = state.store.insert_record_if_absent(&record).await?;

    Ok(Json(SubmissionResponse {
        message: "Record creation status".to_string(),
        record_created,
    }))
}
