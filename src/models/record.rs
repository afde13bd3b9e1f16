// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Running activity record model for storage and API.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Stored record in the `running_statistics` table.
///
/// `(date, distance, time)` is the natural key; rows are never updated.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Record {
    /// Surrogate key assigned by the database
    pub id: i32,
    pub date: Option<NaiveDate>,
    /// Opaque distance token, e.g. "5km"
    pub distance: Option<String>,
    /// Opaque duration token, e.g. "25:00"
    pub time: Option<String>,
    /// Set by the database at insert time
    pub created_at: Option<NaiveDateTime>,
}

/// Submission body for `POST /running_statistics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    #[serde(with = "crate::time_utils::calendar_date")]
    pub date: NaiveDate,
    pub distance: String,
    pub time: String,
}
