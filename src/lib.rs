// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Running-Stats: a small service that records running activities
//!
//! Submissions of (date, distance, time) are stored idempotently in
//! PostgreSQL; the status page reports how many records exist.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod time_utils;

use db::RecordStore;

/// Shared application state.
pub struct AppState {
    pub store: RecordStore,
}
