// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Task handler routes for Cloud Scheduler callbacks.
//!
//! These endpoints are called by the scheduler queue, not directly by
//! users. Cloud Run strips the queue header from external requests, so its
//! presence guarantees internal origin.

use crate::config::PROGRESSION_QUEUE_NAME;
use crate::services::progression::BulkProgressionOutcome;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Task handler routes (called by Cloud Scheduler / Cloud Tasks).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/tasks/weekly-progression", post(weekly_progression))
}

/// Advance every active client with a program by one week.
async fn weekly_progression(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BulkProgressionOutcome>, StatusCode> {
    let queue_name_header = headers.get("x-cloudtasks-queuename");
    let is_valid_queue = queue_name_header
        .and_then(|h| h.to_str().ok())
        .map(|name| name == PROGRESSION_QUEUE_NAME)
        .unwrap_or(false);

    if !is_valid_queue {
        tracing::warn!(
            header = ?queue_name_header,
            "Blocked unauthorized access to weekly progression task"
        );
        return Err(StatusCode::FORBIDDEN);
    }

    match state.progression.weekly_auto_progression().await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(err) => {
            tracing::error!(error = %err, "Weekly auto-progression failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
