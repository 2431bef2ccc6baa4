// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client progression routes: current position, advance, reset, and the
//! owner-only bulk advance.

use crate::error::{AppError, Result};
use crate::middleware::gym::GymContext;
use crate::routes::ApiResponse;
use crate::services::progression::{BulkProgressionOutcome, ProgressionOutcome};
use crate::services::workout::CurrentWorkout;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Bulk advancement is capped per request for safety.
const MAX_BULK_INCREMENT: i64 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/progress",
            get(get_progress),
        )
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/progress/advance",
            post(advance_progress),
        )
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/progress/reset",
            post(reset_progress),
        )
        .route(
            "/api/gyms/{gym_id}/clients/progress/advance-all",
            post(bulk_advance_progress),
        )
}

/// Get the current workout for a client at their progression position.
async fn get_progress(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CurrentWorkout>>> {
    ctx.require_trainer()?;

    let workout = state
        .workouts
        .current_workout(&ctx.gym.id, &client_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Client not found or has no assigned program".to_string())
        })?;

    Ok(Json(ApiResponse::data(workout).with_meta(&ctx)))
}

#[derive(Deserialize)]
struct AdvanceRequest {
    #[serde(default)]
    blocks: i64,
    #[serde(default = "default_week_increment")]
    weeks: i64,
}

fn default_week_increment() -> i64 {
    1
}

fn validate_increments(blocks: i64, weeks: i64) -> Result<(u32, u32)> {
    if blocks < 0 || weeks < 0 {
        return Err(AppError::BadRequest(
            "Blocks and weeks cannot be negative".to_string(),
        ));
    }
    Ok((blocks as u32, weeks as u32))
}

/// Manually advance a single client's progression.
async fn advance_progress(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
    Json(payload): Json<AdvanceRequest>,
) -> Result<Json<ApiResponse<ProgressionOutcome>>> {
    ctx.require_trainer()?;

    let (blocks, weeks) = validate_increments(payload.blocks, payload.weeks)?;

    let outcome = state.progression.advance(&client_id, blocks, weeks).await?;

    let message = format!(
        "Client progressed from Block {}, Week {} to Block {}, Week {}{}",
        outcome.previous_block,
        outcome.previous_week,
        outcome.new_block,
        outcome.new_week,
        if outcome.program_restarted {
            " (program restarted)"
        } else {
            ""
        }
    );

    Ok(Json(
        ApiResponse::data(outcome).with_message(message).with_meta(&ctx),
    ))
}

#[derive(Deserialize)]
struct ResetRequest {
    #[serde(default)]
    block: i64,
    #[serde(default)]
    week: i64,
}

/// Reset a client's progression to a specific block/week.
async fn reset_progress(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<ApiResponse<ProgressionOutcome>>> {
    ctx.require_trainer()?;

    if payload.block < 0 || payload.week < 0 {
        return Err(AppError::BadRequest(
            "Block and week cannot be negative".to_string(),
        ));
    }

    let outcome = state
        .progression
        .reset(&client_id, payload.block as u32, payload.week as u32)
        .await?;

    let message = format!(
        "Client progression reset to Block {}, Week {}",
        outcome.new_block, outcome.new_week
    );

    Ok(Json(
        ApiResponse::data(outcome).with_message(message).with_meta(&ctx),
    ))
}

/// Advance every active client in the gym (owners only).
async fn bulk_advance_progress(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Json(payload): Json<AdvanceRequest>,
) -> Result<Json<ApiResponse<BulkProgressionOutcome>>> {
    ctx.require_owner()?;

    let (blocks, weeks) = validate_increments(payload.blocks, payload.weeks)?;

    if payload.blocks > MAX_BULK_INCREMENT || payload.weeks > MAX_BULK_INCREMENT {
        return Err(AppError::BadRequest(
            "Bulk advancement is limited to 10 blocks/weeks at a time for safety".to_string(),
        ));
    }

    let outcome = state.progression.bulk_advance(&ctx.gym.id, blocks, weeks).await?;

    let message = format!(
        "Bulk progression completed: {} clients updated, {} failed",
        outcome.successful_updates, outcome.failed_updates
    );

    Ok(Json(
        ApiResponse::data(outcome).with_message(message).with_meta(&ctx),
    ))
}
