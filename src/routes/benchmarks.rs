// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Benchmark-template CRUD and per-client benchmark record routes.
//!
//! Recording a benchmark for a template the client already has moves the
//! superseded record into their history; history is append-only.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::middleware::gym::GymContext;
use crate::models::{
    BenchmarkMeasurement, BenchmarkRecord, BenchmarkTemplate, BenchmarkType, Client, GymRole,
};
use crate::routes::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/benchmark-templates",
            get(list_templates).post(create_template),
        )
        .route(
            "/api/benchmark-templates/{template_id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/benchmarks",
            get(list_client_benchmarks).post(record_benchmark),
        )
        .route(
            "/api/gyms/{gym_id}/clients/{client_id}/benchmarks/{template_id}",
            get(get_client_benchmark).delete(delete_client_benchmark),
        )
}

// ─── Benchmark Templates (global) ────────────────────────────

fn require_admin(auth: &AuthUser) -> Result<()> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin role required".to_string()))
    }
}

async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<BenchmarkTemplate>>>> {
    let templates = state.db.list_benchmark_templates().await?;
    let count = templates.len();
    Ok(Json(ApiResponse::data(templates).with_count(count)))
}

async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<String>,
) -> Result<Json<ApiResponse<BenchmarkTemplate>>> {
    let template = state
        .db
        .get_benchmark_template(&template_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Benchmark template not found".to_string()))?;
    Ok(Json(ApiResponse::data(template)))
}

#[derive(Deserialize)]
struct TemplateRequest {
    name: String,
    notes: Option<String>,
    benchmark_type: BenchmarkType,
}

async fn create_template(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<TemplateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BenchmarkTemplate>>)> {
    require_admin(&auth)?;

    if payload.name.trim().is_empty() || payload.name.len() > 200 {
        return Err(AppError::BadRequest(
            "Name must be between 1 and 200 characters".to_string(),
        ));
    }

    let template = BenchmarkTemplate {
        id: uuid::Uuid::new_v4().to_string(),
        name: payload.name.trim().to_string(),
        notes: payload.notes,
        benchmark_type: payload.benchmark_type,
        created_at: now_rfc3339(),
    };
    state.db.upsert_benchmark_template(&template).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::data(template))))
}

async fn update_template(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(template_id): Path<String>,
    Json(payload): Json<TemplateRequest>,
) -> Result<Json<ApiResponse<BenchmarkTemplate>>> {
    require_admin(&auth)?;

    let mut template = state
        .db
        .get_benchmark_template(&template_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Benchmark template not found".to_string()))?;

    template.name = payload.name;
    template.notes = payload.notes;
    template.benchmark_type = payload.benchmark_type;
    state.db.upsert_benchmark_template(&template).await?;

    Ok(Json(ApiResponse::data(template)))
}

async fn delete_template(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(template_id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    require_admin(&auth)?;

    state
        .db
        .get_benchmark_template(&template_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Benchmark template not found".to_string()))?;
    state.db.delete_benchmark_template(&template_id).await?;

    Ok(Json(ApiResponse::message(
        "Benchmark template deleted successfully",
    )))
}

// ─── Client Benchmark Records ────────────────────────────────

/// Clients may only manage their own benchmarks; trainers and owners may
/// manage any client's.
async fn resolve_client_for_benchmarks(
    state: &AppState,
    ctx: &GymContext,
    client_id: &str,
) -> Result<Client> {
    let client = state
        .db
        .get_client_doc(client_id)
        .await?
        .filter(|c| c.gym_id == ctx.gym.id);

    let client = match client {
        Some(client) => client,
        None => state
            .db
            .get_client_by_user(&ctx.gym.id, client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?,
    };

    if ctx.user_role == GymRole::Client
        && client.user_id.as_deref() != Some(ctx.user.user_id.as_str())
    {
        return Err(AppError::Forbidden(
            "Access denied. You can only manage your own benchmarks.".to_string(),
        ));
    }

    Ok(client)
}

async fn list_client_benchmarks(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Vec<BenchmarkRecord>>>> {
    let client = resolve_client_for_benchmarks(&state, &ctx, &client_id).await?;

    let benchmarks = client.current_benchmarks;
    let count = benchmarks.len();
    Ok(Json(ApiResponse::data(benchmarks).with_count(count).with_meta(&ctx)))
}

async fn get_client_benchmark(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id, template_id)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<BenchmarkRecord>>> {
    let client = resolve_client_for_benchmarks(&state, &ctx, &client_id).await?;

    let benchmark = client
        .current_benchmark(&template_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Benchmark not found".to_string()))?;

    Ok(Json(ApiResponse::data(benchmark).with_meta(&ctx)))
}

#[derive(Deserialize)]
struct RecordBenchmarkRequest {
    benchmark_template_id: String,
    notes: Option<String>,
    #[serde(flatten)]
    measurement: BenchmarkMeasurement,
}

/// Record a benchmark value. Any existing current record for the template
/// moves to the client's history.
async fn record_benchmark(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id)): Path<(String, String)>,
    Json(payload): Json<RecordBenchmarkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BenchmarkRecord>>)> {
    let mut client = resolve_client_for_benchmarks(&state, &ctx, &client_id).await?;

    let template = state
        .db
        .get_benchmark_template(&payload.benchmark_template_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Benchmark template not found".to_string()))?;

    // The measurement variant must match the template's declared type
    match (&payload.measurement, template.benchmark_type) {
        (BenchmarkMeasurement::Lift { weight }, BenchmarkType::Lift) => {
            if *weight < 0.0 {
                return Err(AppError::BadRequest(
                    "Weight cannot be negative".to_string(),
                ));
            }
        }
        (BenchmarkMeasurement::Other { .. }, BenchmarkType::Other) => {}
        _ => {
            return Err(AppError::BadRequest(format!(
                "Measurement type does not match template type {:?}",
                template.benchmark_type
            )));
        }
    }

    let record = BenchmarkRecord {
        name: template.name.clone(),
        notes: payload.notes,
        benchmark_template_id: template.id.clone(),
        recorded_at: now_rfc3339(),
        measurement: payload.measurement,
    };

    // Move any superseded record into history
    if let Some(position) = client
        .current_benchmarks
        .iter()
        .position(|b| b.benchmark_template_id == template.id)
    {
        let superseded = client.current_benchmarks[position].clone();
        client.historical_benchmarks.push(superseded);
        client.current_benchmarks[position] = record.clone();
    } else {
        client.current_benchmarks.push(record.clone());
    }

    state.db.upsert_client(&client).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(record).with_meta(&ctx)),
    ))
}

/// Remove a current benchmark record (it still moves to history).
async fn delete_client_benchmark(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, client_id, template_id)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    let mut client = resolve_client_for_benchmarks(&state, &ctx, &client_id).await?;

    let position = client
        .current_benchmarks
        .iter()
        .position(|b| b.benchmark_template_id == template_id)
        .ok_or_else(|| AppError::NotFound("Benchmark not found".to_string()))?;

    let removed = client.current_benchmarks.remove(position);
    client.historical_benchmarks.push(removed);
    state.db.upsert_client(&client).await?;

    Ok(Json(ApiResponse::message("Benchmark removed")))
}
