// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client CRUD routes.

use crate::error::{AppError, Result};
use crate::middleware::gym::GymContext;
use crate::models::{Client, ClientStatus};
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
            "/api/gyms/{gym_id}/clients",
            get(list_clients).post(create_client),
        )
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

async fn load_client(state: &AppState, gym_id: &str, client_id: &str) -> Result<Client> {
    state
        .db
        .get_client_doc(client_id)
        .await?
        .filter(|c| c.gym_id == gym_id)
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))
}

/// Verify a referenced program is a template belonging to this gym.
async fn verify_program_template(
    state: &AppState,
    gym_id: &str,
    program_id: &str,
) -> Result<()> {
    state
        .db
        .get_program(program_id)
        .await?
        .filter(|p| p.gym_id == gym_id && p.is_template)
        .ok_or_else(|| {
            AppError::BadRequest("Program not found or is not a template of this gym".to_string())
        })?;
    Ok(())
}

async fn list_clients(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
) -> Result<Json<ApiResponse<Vec<Client>>>> {
    ctx.require_trainer()?;

    let clients = state.db.list_clients_for_gym(&ctx.gym.id).await?;
    let count = clients.len();
    Ok(Json(ApiResponse::data(clients).with_count(count).with_meta(&ctx)))
}

async fn get_client(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Client>>> {
    ctx.require_trainer()?;

    let client = load_client(&state, &ctx.gym.id, &client_id).await?;
    Ok(Json(ApiResponse::data(client).with_meta(&ctx)))
}

#[derive(Deserialize, Validate)]
struct CreateClientRequest {
    #[validate(email(message = "Please enter a valid email"))]
    email: String,
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    last_name: String,
    user_id: Option<String>,
    program_id: Option<String>,
    #[validate(range(min = 0.0, message = "Weight must be non-negative"))]
    weight: Option<f64>,
    membership_status: Option<ClientStatus>,
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Json(payload): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Client>>)> {
    ctx.require_trainer()?;
    payload
        .validate()
        .map_err(|e| crate::routes::auth::validation_failure(&e))?;

    if let Some(program_id) = &payload.program_id {
        verify_program_template(&state, &ctx.gym.id, program_id).await?;
    }

    let now = now_rfc3339();
    let client = Client {
        id: uuid::Uuid::new_v4().to_string(),
        gym_id: ctx.gym.id.clone(),
        user_id: payload.user_id,
        email: payload.email.to_lowercase(),
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        weight: payload.weight,
        membership_status: payload.membership_status.unwrap_or(ClientStatus::Active),
        joined_at: now.clone(),
        program_id: payload.program_id.clone(),
        current_block: 0,
        current_week: 0,
        program_start_date: payload.program_id.is_some().then(|| now.clone()),
        last_progression_update: Some(now),
        current_benchmarks: Vec::new(),
        historical_benchmarks: Vec::new(),
    };
    state.db.upsert_client(&client).await?;

    tracing::info!(client_id = %client.id, gym_id = %ctx.gym.id, "Client created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(client).with_meta(&ctx)),
    ))
}

#[derive(Deserialize, Validate)]
struct UpdateClientRequest {
    #[validate(email(message = "Please enter a valid email"))]
    email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    last_name: Option<String>,
    #[validate(range(min = 0.0, message = "Weight must be non-negative"))]
    weight: Option<f64>,
    membership_status: Option<ClientStatus>,
}

async fn update_client(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
    Json(payload): Json<UpdateClientRequest>,
) -> Result<Json<ApiResponse<Client>>> {
    ctx.require_trainer()?;
    payload
        .validate()
        .map_err(|e| crate::routes::auth::validation_failure(&e))?;

    let mut client = load_client(&state, &ctx.gym.id, &client_id).await?;

    if let Some(email) = payload.email {
        client.email = email.to_lowercase();
    }
    if let Some(first_name) = payload.first_name {
        client.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        client.last_name = last_name;
    }
    if let Some(weight) = payload.weight {
        client.weight = Some(weight);
    }
    if let Some(status) = payload.membership_status {
        client.membership_status = status;
    }
    state.db.upsert_client(&client).await?;

    Ok(Json(ApiResponse::data(client).with_meta(&ctx)))
}

async fn delete_client(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    ctx.require_owner()?;

    load_client(&state, &ctx.gym.id, &client_id).await?;
    state.db.delete_client(&client_id).await?;

    tracing::info!(client_id, gym_id = %ctx.gym.id, "Client deleted");

    Ok(Json(ApiResponse::message("Client deleted successfully")))
}
