// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym-wide schedule overview and conflict-report routes.

use crate::error::Result;
use crate::middleware::gym::GymContext;
use crate::routes::ApiResponse;
use crate::services::scheduling::{ScheduleConflict, ScheduleOverview};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/gyms/{gym_id}/schedules/overview",
            get(schedule_overview),
        )
        .route(
            "/api/gyms/{gym_id}/schedules/conflicts",
            get(schedule_conflicts),
        )
}

#[derive(Deserialize)]
struct OverviewQuery {
    is_template: Option<bool>,
    /// Restrict to the week containing this date (active schedules only)
    date: Option<NaiveDate>,
}

async fn schedule_overview(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<ApiResponse<ScheduleOverview>>> {
    let overview = state
        .scheduling
        .overview(&ctx.gym.id, query.is_template, query.date)
        .await?;

    Ok(Json(ApiResponse::data(overview).with_meta(&ctx)))
}

#[derive(Deserialize)]
struct ConflictsQuery {
    date: Option<NaiveDate>,
}

/// Pairwise overlap report across the gym's active schedules.
/// Reporting-only: overlaps here never block writes.
async fn schedule_conflicts(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Query(query): Query<ConflictsQuery>,
) -> Result<Json<ApiResponse<Vec<ScheduleConflict>>>> {
    let conflicts = state.scheduling.find_conflicts(&ctx.gym.id, query.date).await?;

    let count = conflicts.len();
    Ok(Json(ApiResponse::data(conflicts).with_count(count).with_meta(&ctx)))
}
