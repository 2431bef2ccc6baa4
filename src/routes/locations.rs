// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location CRUD routes.

use crate::error::{AppError, Result};
use crate::middleware::gym::GymContext;
use crate::models::Location;
use crate::routes::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/gyms/{gym_id}/locations",
            get(list_locations).post(create_location),
        )
        .route(
            "/api/gyms/{gym_id}/locations/{location_id}",
            get(get_location)
                .put(update_location)
                .delete(delete_location),
        )
}

async fn list_locations(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
) -> Result<Json<ApiResponse<Vec<Location>>>> {
    let locations = state.db.list_locations_for_gym(&ctx.gym.id).await?;
    let count = locations.len();
    Ok(Json(ApiResponse::data(locations).with_count(count).with_meta(&ctx)))
}

async fn load_location(state: &AppState, gym_id: &str, location_id: &str) -> Result<Location> {
    state
        .db
        .get_location(location_id)
        .await?
        .filter(|l| l.gym_id == gym_id)
        .ok_or_else(|| AppError::NotFound("Location not found".to_string()))
}

async fn get_location(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, location_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Location>>> {
    let location = load_location(&state, &ctx.gym.id, &location_id).await?;
    Ok(Json(ApiResponse::data(location).with_meta(&ctx)))
}

#[derive(Deserialize, Validate)]
struct LocationRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    name: String,
    #[validate(length(max = 200, message = "Address cannot exceed 200 characters"))]
    address: Option<String>,
}

async fn create_location(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Json(payload): Json<LocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Location>>)> {
    ctx.require_owner()?;
    payload
        .validate()
        .map_err(|e| crate::routes::auth::validation_failure(&e))?;

    let location = Location {
        id: uuid::Uuid::new_v4().to_string(),
        gym_id: ctx.gym.id.clone(),
        name: payload.name,
        address: payload.address,
        created_at: now_rfc3339(),
    };
    state.db.upsert_location(&location).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(location).with_meta(&ctx)),
    ))
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, location_id)): Path<(String, String)>,
    Json(payload): Json<LocationRequest>,
) -> Result<Json<ApiResponse<Location>>> {
    ctx.require_owner()?;
    payload
        .validate()
        .map_err(|e| crate::routes::auth::validation_failure(&e))?;

    let mut location = load_location(&state, &ctx.gym.id, &location_id).await?;
    location.name = payload.name;
    location.address = payload.address;
    state.db.upsert_location(&location).await?;

    Ok(Json(ApiResponse::data(location).with_meta(&ctx)))
}

async fn delete_location(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, location_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    ctx.require_owner()?;

    load_location(&state, &ctx.gym.id, &location_id).await?;
    state.db.delete_location(&location_id).await?;

    Ok(Json(ApiResponse::message("Location deleted successfully")))
}
