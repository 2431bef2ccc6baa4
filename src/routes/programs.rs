// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Program CRUD and template-assignment routes.

use crate::error::{AppError, Result};
use crate::middleware::gym::GymContext;
use crate::models::{Block, Program};
use crate::routes::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/gyms/{gym_id}/programs",
            get(list_programs).post(create_program),
        )
        .route(
            "/api/gyms/{gym_id}/programs/{program_id}",
            get(get_program).put(update_program).delete(delete_program),
        )
        .route(
            "/api/gyms/{gym_id}/programs/{program_id}/assign/{client_id}",
            post(assign_template),
        )
}

async fn load_program(state: &AppState, gym_id: &str, program_id: &str) -> Result<Program> {
    state
        .db
        .get_program(program_id)
        .await?
        .filter(|p| p.gym_id == gym_id)
        .ok_or_else(|| AppError::NotFound("Program not found".to_string()))
}

#[derive(Deserialize)]
struct ProgramListQuery {
    is_template: Option<bool>,
}

async fn list_programs(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Query(query): Query<ProgramListQuery>,
) -> Result<Json<ApiResponse<Vec<Program>>>> {
    let programs = state
        .db
        .list_programs_for_gym(&ctx.gym.id, query.is_template)
        .await?;

    let count = programs.len();
    Ok(Json(ApiResponse::data(programs).with_count(count).with_meta(&ctx)))
}

async fn get_program(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, program_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Program>>> {
    let program = load_program(&state, &ctx.gym.id, &program_id).await?;
    Ok(Json(ApiResponse::data(program).with_meta(&ctx)))
}

#[derive(Deserialize)]
struct ProgramRequest {
    name: String,
    #[serde(default)]
    blocks: Vec<Block>,
    #[serde(default)]
    is_template: bool,
    client_id: Option<String>,
}

async fn create_program(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Json(payload): Json<ProgramRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Program>>)> {
    ctx.require_trainer()?;

    let errors = Program::validate_structure(&payload.name, &payload.blocks);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let now = now_rfc3339();
    let program = Program {
        id: uuid::Uuid::new_v4().to_string(),
        gym_id: ctx.gym.id.clone(),
        name: payload.name,
        blocks: payload.blocks,
        is_template: payload.is_template,
        template_id: None,
        client_id: payload.client_id,
        created_by: ctx.user.user_id.clone(),
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_program(&program).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(program).with_meta(&ctx)),
    ))
}

/// Update a program. Updating a template best-effort propagates its blocks
/// to the assigned copies derived from it; propagation failures are logged
/// and never fail the primary update.
async fn update_program(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, program_id)): Path<(String, String)>,
    Json(payload): Json<ProgramRequest>,
) -> Result<Json<ApiResponse<Program>>> {
    ctx.require_trainer()?;

    let errors = Program::validate_structure(&payload.name, &payload.blocks);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut program = load_program(&state, &ctx.gym.id, &program_id).await?;
    program.name = payload.name;
    program.blocks = payload.blocks;
    program.is_template = payload.is_template;
    program.updated_at = now_rfc3339();
    state.db.upsert_program(&program).await?;

    if program.is_template {
        propagate_template_blocks(&state, &ctx.gym.id, &program).await;
    }

    Ok(Json(ApiResponse::data(program).with_meta(&ctx)))
}

/// Push a template's current blocks into its assigned copies.
async fn propagate_template_blocks(state: &AppState, gym_id: &str, template: &Program) {
    let assigned = match state
        .db
        .list_programs_for_template(gym_id, &template.id)
        .await
    {
        Ok(assigned) => assigned,
        Err(err) => {
            tracing::warn!(
                template_id = %template.id,
                error = %err,
                "Failed to list assigned programs for template propagation"
            );
            return;
        }
    };

    for mut copy in assigned {
        copy.blocks = template.blocks.clone();
        copy.updated_at = now_rfc3339();
        if let Err(err) = state.db.upsert_program(&copy).await {
            tracing::warn!(
                template_id = %template.id,
                program_id = %copy.id,
                error = %err,
                "Failed to propagate template blocks to assigned program"
            );
        }
    }
}

async fn delete_program(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, program_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    ctx.require_owner()?;

    load_program(&state, &ctx.gym.id, &program_id).await?;
    state.db.delete_program(&program_id).await?;

    Ok(Json(ApiResponse::message("Program deleted successfully")))
}

/// Deep-copy a template into a client-specific program, link it to the
/// client, and reset their progression to the start.
async fn assign_template(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, template_id, client_id)): Path<(String, String, String)>,
) -> Result<(StatusCode, Json<ApiResponse<Program>>)> {
    ctx.require_trainer()?;

    let template = state
        .db
        .get_program(&template_id)
        .await?
        .filter(|p| p.gym_id == ctx.gym.id && p.is_template)
        .ok_or_else(|| AppError::NotFound("Program template not found".to_string()))?;

    state
        .db
        .get_client_doc(&client_id)
        .await?
        .filter(|c| c.gym_id == ctx.gym.id)
        .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

    let now = now_rfc3339();
    let assigned = Program {
        id: uuid::Uuid::new_v4().to_string(),
        gym_id: ctx.gym.id.clone(),
        name: format!("{} - Client Program", template.name),
        blocks: template.blocks.clone(),
        is_template: false,
        template_id: Some(template.id.clone()),
        client_id: Some(client_id.clone()),
        created_by: ctx.user.user_id.clone(),
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_program(&assigned).await?;

    state
        .progression
        .start_program(&client_id, &assigned.id)
        .await?;

    tracing::info!(
        template_id = %template.id,
        program_id = %assigned.id,
        client_id,
        "Program template assigned to client"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(assigned).with_meta(&ctx)),
    ))
}
