// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout session routes: current workout, session lifecycle, and
//! set-completion tracking.

use crate::error::{AppError, Result};
use crate::middleware::gym::GymContext;
use crate::models::WorkoutSession;
use crate::routes::ApiResponse;
use crate::services::workout::{CurrentWorkout, SetCompletionResult};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/current-workout",
            get(get_current_workout),
        )
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/workout-sessions",
            post(create_session),
        )
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/workout-sessions/{session_id}",
            get(get_session),
        )
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/workout-sessions/{session_id}/sets",
            put(complete_set),
        )
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/workout-sessions/{session_id}/end",
            put(end_session),
        )
}

async fn get_current_workout(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CurrentWorkout>>> {
    let workout = state
        .workouts
        .current_workout(&ctx.gym.id, &client_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No current workout found for client".to_string())
        })?;

    Ok(Json(ApiResponse::data(workout).with_meta(&ctx)))
}

#[derive(Deserialize)]
struct CreateSessionRequest {
    program_id: String,
    block: u32,
    week: u32,
    #[serde(default)]
    day: u32,
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<WorkoutSession>>> {
    let session = state
        .workouts
        .create_session(
            &client_id,
            &ctx.gym.id,
            &payload.program_id,
            payload.block,
            payload.week,
            payload.day,
        )
        .await?;

    Ok(Json(ApiResponse::data(session).with_meta(&ctx)))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, _client_id, session_id)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<WorkoutSession>>> {
    let session = state
        .workouts
        .get_session(&session_id)
        .await?
        .filter(|s| s.gym_id == ctx.gym.id)
        .ok_or_else(|| AppError::NotFound("Workout session not found".to_string()))?;

    Ok(Json(ApiResponse::data(session).with_meta(&ctx)))
}

#[derive(Deserialize)]
struct CompleteSetRequest {
    activity_id: String,
    set_number: u32,
}

async fn complete_set(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, _client_id, session_id)): Path<(String, String, String)>,
    Json(payload): Json<CompleteSetRequest>,
) -> Result<Json<ApiResponse<SetCompletionResult>>> {
    if payload.activity_id.trim().is_empty() || payload.set_number < 1 {
        return Err(AppError::BadRequest(
            "activity_id and set_number are required".to_string(),
        ));
    }

    let result = state
        .workouts
        .complete_set(
            &ctx.gym.id,
            &session_id,
            &payload.activity_id,
            payload.set_number,
        )
        .await?;

    Ok(Json(ApiResponse::data(result).with_meta(&ctx)))
}

async fn end_session(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, _client_id, session_id)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<WorkoutSession>>> {
    state
        .workouts
        .get_session(&session_id)
        .await?
        .filter(|s| s.gym_id == ctx.gym.id)
        .ok_or_else(|| AppError::NotFound("Workout session not found".to_string()))?;

    let session = state.workouts.end_session(&session_id).await?;

    Ok(Json(ApiResponse::data(session).with_meta(&ctx)))
}
