// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach management and coach-schedule routes.
//!
//! Coaches are users holding an owner or trainer membership in the gym.
//! Schedules belong to a coach; non-owners may only touch their own.

use crate::error::{AppError, Result};
use crate::middleware::gym::GymContext;
use crate::models::{
    GymMembership, GymRole, MembershipStatus, ScheduleDay, SystemRole, User, WeeklySchedule,
};
use crate::routes::ApiResponse;
use crate::services::scheduling::EnrollmentRequest;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/gyms/{gym_id}/coaches",
            get(list_coaches).post(add_coach),
        )
        .route(
            "/api/gyms/{gym_id}/coaches/{coach_id}",
            put(update_coach).delete(remove_coach),
        )
        .route(
            "/api/gyms/{gym_id}/coaches/{coach_id}/schedules",
            get(list_schedules).post(create_schedule),
        )
        .route(
            "/api/gyms/{gym_id}/coaches/{coach_id}/schedules/{schedule_id}",
            get(get_schedule)
                .put(update_schedule)
                .delete(delete_schedule),
        )
        .route(
            "/api/gyms/{gym_id}/coaches/{coach_id}/schedules/{schedule_id}/enroll",
            post(enroll_client),
        )
        .route(
            "/api/gyms/{gym_id}/coaches/{coach_id}/schedules/{schedule_id}/unenroll",
            delete(unenroll_client),
        )
        .route(
            "/api/gyms/{gym_id}/coaches/{coach_id}/schedules/{schedule_id}/materialize",
            post(materialize_schedule),
        )
        .route(
            "/api/gyms/{gym_id}/coaches/{coach_id}/schedules/{schedule_id}/rollover",
            post(rollover_schedule),
        )
}

/// Coach summary with their schedule count.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CoachResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: GymRole,
    pub schedule_count: usize,
}

/// Verify a user is an active coach (owner or trainer) of the gym.
async fn require_coach_membership(
    state: &AppState,
    gym_id: &str,
    coach_id: &str,
) -> Result<GymMembership> {
    state
        .db
        .get_membership(coach_id, gym_id)
        .await?
        .filter(|m| m.status == MembershipStatus::Active && m.role.is_trainer())
        .ok_or_else(|| {
            AppError::NotFound("Coach not found or not authorized for this gym".to_string())
        })
}

// ─── Coach Management ────────────────────────────────────────

async fn list_coaches(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
) -> Result<Json<ApiResponse<Vec<CoachResponse>>>> {
    let memberships = state.db.list_memberships_for_gym(&ctx.gym.id).await?;

    let mut coaches = Vec::new();
    for membership in memberships
        .into_iter()
        .filter(|m| m.role.is_trainer())
    {
        let Some(user) = state.db.get_user(&membership.user_id).await? else {
            continue;
        };
        let schedule_count = state
            .db
            .count_schedules_for_coach(&ctx.gym.id, &user.id)
            .await?;
        coaches.push(CoachResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: membership.role,
            schedule_count,
        });
    }

    let count = coaches.len();
    Ok(Json(ApiResponse::data(coaches).with_count(count).with_meta(&ctx)))
}

#[derive(Deserialize)]
struct AddCoachRequest {
    email: String,
    name: String,
    password: String,
    role: GymRole,
}

/// Add a coach to the gym (owners only). Creates the user account if the
/// email is new.
async fn add_coach(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Json(payload): Json<AddCoachRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CoachResponse>>)> {
    ctx.require_owner()?;

    if payload.email.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Email, name, password, and role are required".to_string(),
        ));
    }
    if payload.role == GymRole::Client {
        return Err(AppError::BadRequest(
            "Role must be either \"trainer\" or \"owner\"".to_string(),
        ));
    }

    let email = payload.email.to_lowercase();
    let user = match state.db.get_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            let password_hash = bcrypt::hash(&payload.password, 12).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e))
            })?;
            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                email,
                name: payload.name.trim().to_string(),
                password_hash,
                role: SystemRole::User,
                is_active: true,
                created_at: now_rfc3339(),
            };
            state.db.upsert_user(&user).await?;
            user
        }
    };

    if state
        .db
        .get_membership(&user.id, &ctx.gym.id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "User already has a membership in this gym".to_string(),
        ));
    }

    let membership = GymMembership {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        gym_id: ctx.gym.id.clone(),
        role: payload.role,
        status: MembershipStatus::Active,
        joined_at: now_rfc3339(),
    };
    state.db.upsert_membership(&membership).await?;

    let schedule_count = state
        .db
        .count_schedules_for_coach(&ctx.gym.id, &user.id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::data(CoachResponse {
                id: user.id,
                name: user.name,
                email: user.email,
                role: payload.role,
                schedule_count,
            })
            .with_message("Coach added successfully"),
        ),
    ))
}

#[derive(Deserialize)]
struct UpdateCoachRequest {
    name: Option<String>,
    role: Option<GymRole>,
}

async fn update_coach(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id)): Path<(String, String)>,
    Json(payload): Json<UpdateCoachRequest>,
) -> Result<Json<ApiResponse<CoachResponse>>> {
    ctx.require_owner()?;

    let mut user = state
        .db
        .get_user(&coach_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Coach not found".to_string()))?;

    let mut membership = state
        .db
        .get_membership(&coach_id, &ctx.gym.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Coach membership not found in this gym".to_string())
        })?;

    if let Some(name) = payload.name {
        if name != user.name {
            user.name = name;
            state.db.upsert_user(&user).await?;
        }
    }

    if let Some(role) = payload.role {
        if role != GymRole::Client && role != membership.role {
            membership.role = role;
            state.db.upsert_membership(&membership).await?;
        }
    }

    let schedule_count = state
        .db
        .count_schedules_for_coach(&ctx.gym.id, &coach_id)
        .await?;

    Ok(Json(
        ApiResponse::data(CoachResponse {
            id: coach_id,
            name: user.name,
            email: user.email,
            role: membership.role,
            schedule_count,
        })
        .with_message("Coach updated successfully"),
    ))
}

/// Remove a coach from the gym (owners only). Refused while the coach
/// still has schedules.
async fn remove_coach(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    ctx.require_owner()?;

    let membership = state
        .db
        .get_membership(&coach_id, &ctx.gym.id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Coach membership not found in this gym".to_string())
        })?;

    let schedule_count = state
        .db
        .count_schedules_for_coach(&ctx.gym.id, &coach_id)
        .await?;
    if schedule_count > 0 {
        return Err(AppError::BadRequest(format!(
            "Cannot remove coach who has {schedule_count} schedule(s). \
             Please delete or reassign their schedules first."
        )));
    }

    state.db.delete_membership(&membership.id).await?;

    Ok(Json(ApiResponse::message(
        "Coach removed from gym successfully",
    )))
}

// ─── Schedule CRUD ───────────────────────────────────────────

#[derive(Deserialize)]
struct ScheduleListQuery {
    is_template: Option<bool>,
}

async fn list_schedules(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id)): Path<(String, String)>,
    Query(query): Query<ScheduleListQuery>,
) -> Result<Json<ApiResponse<Vec<WeeklySchedule>>>> {
    require_coach_membership(&state, &ctx.gym.id, &coach_id).await?;
    ctx.require_owner_or_self(&coach_id)?;

    let schedules = state
        .db
        .list_schedules_for_coach(&ctx.gym.id, &coach_id, query.is_template)
        .await?;

    let count = schedules.len();
    Ok(Json(
        ApiResponse::data(schedules)
            .with_count(count)
            .with_coach_meta(&ctx, &coach_id),
    ))
}

async fn get_schedule(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id, schedule_id)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<WeeklySchedule>>> {
    ctx.require_owner_or_self(&coach_id)?;

    let schedule = state
        .db
        .get_schedule(&schedule_id)
        .await?
        .filter(|s| s.gym_id == ctx.gym.id && s.coach_id == coach_id)
        .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

    Ok(Json(
        ApiResponse::data(schedule).with_coach_meta(&ctx, &coach_id),
    ))
}

#[derive(Deserialize)]
struct ScheduleRequest {
    name: String,
    description: Option<String>,
    #[serde(default)]
    days: Vec<ScheduleDay>,
    #[serde(default)]
    is_template: bool,
    template_id: Option<String>,
    week_start_date: Option<NaiveDate>,
}

async fn create_schedule(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id)): Path<(String, String)>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WeeklySchedule>>)> {
    ctx.require_trainer()?;
    require_coach_membership(&state, &ctx.gym.id, &coach_id).await?;
    ctx.require_owner_or_self(&coach_id)?;

    let errors = WeeklySchedule::validate_days(&payload.days);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let now = now_rfc3339();
    let schedule = WeeklySchedule {
        id: uuid::Uuid::new_v4().to_string(),
        gym_id: ctx.gym.id.clone(),
        coach_id: coach_id.clone(),
        name: payload.name,
        description: payload.description,
        days: payload.days,
        is_template: payload.is_template,
        template_id: payload.template_id,
        week_start_date: payload.week_start_date,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_schedule(&schedule).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(schedule).with_coach_meta(&ctx, &coach_id)),
    ))
}

async fn update_schedule(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id, schedule_id)): Path<(String, String, String)>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<Json<ApiResponse<WeeklySchedule>>> {
    ctx.require_trainer()?;
    ctx.require_owner_or_self(&coach_id)?;

    let errors = WeeklySchedule::validate_days(&payload.days);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let mut schedule = state
        .db
        .get_schedule(&schedule_id)
        .await?
        .filter(|s| s.gym_id == ctx.gym.id && s.coach_id == coach_id)
        .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

    schedule.name = payload.name;
    schedule.description = payload.description;
    schedule.days = payload.days;
    schedule.is_template = payload.is_template;
    schedule.template_id = payload.template_id;
    schedule.week_start_date = payload.week_start_date;
    schedule.updated_at = now_rfc3339();
    state.db.upsert_schedule(&schedule).await?;

    Ok(Json(
        ApiResponse::data(schedule).with_coach_meta(&ctx, &coach_id),
    ))
}

async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id, schedule_id)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    ctx.require_trainer()?;
    ctx.require_owner_or_self(&coach_id)?;

    state
        .db
        .get_schedule(&schedule_id)
        .await?
        .filter(|s| s.gym_id == ctx.gym.id && s.coach_id == coach_id)
        .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;

    state.db.delete_schedule(&schedule_id).await?;

    Ok(Json(ApiResponse::message("Schedule deleted successfully")))
}

// ─── Enrollment ──────────────────────────────────────────────

async fn enroll_client(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id, schedule_id)): Path<(String, String, String)>,
    Json(payload): Json<EnrollmentRequest>,
) -> Result<Json<ApiResponse<WeeklySchedule>>> {
    ctx.require_trainer()?;

    let schedule = state
        .scheduling
        .enroll(&ctx.gym.id, &coach_id, &schedule_id, &payload)
        .await?;

    Ok(Json(
        ApiResponse::data(schedule).with_message("Client enrolled successfully"),
    ))
}

async fn unenroll_client(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id, schedule_id)): Path<(String, String, String)>,
    Json(payload): Json<EnrollmentRequest>,
) -> Result<Json<ApiResponse<WeeklySchedule>>> {
    ctx.require_trainer()?;

    let schedule = state
        .scheduling
        .unenroll(&ctx.gym.id, &coach_id, &schedule_id, &payload)
        .await?;

    Ok(Json(
        ApiResponse::data(schedule).with_message("Client unenrolled successfully"),
    ))
}

// ─── Template / Active ───────────────────────────────────────

#[derive(Deserialize)]
struct MaterializeRequest {
    week_start_date: NaiveDate,
}

/// Create an active schedule for a concrete week from a template.
async fn materialize_schedule(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id, schedule_id)): Path<(String, String, String)>,
    Json(payload): Json<MaterializeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WeeklySchedule>>)> {
    ctx.require_trainer()?;
    ctx.require_owner_or_self(&coach_id)?;

    let schedule = state
        .scheduling
        .materialize(&ctx.gym.id, &coach_id, &schedule_id, payload.week_start_date)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(schedule).with_coach_meta(&ctx, &coach_id)),
    ))
}

#[derive(Deserialize)]
struct RolloverRequest {
    week_start_date: Option<NaiveDate>,
}

/// Reset an active schedule to its template's enrollment state, optionally
/// advancing its week.
async fn rollover_schedule(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, coach_id, schedule_id)): Path<(String, String, String)>,
    Json(payload): Json<RolloverRequest>,
) -> Result<Json<ApiResponse<WeeklySchedule>>> {
    ctx.require_trainer()?;
    ctx.require_owner_or_self(&coach_id)?;

    let schedule = state
        .scheduling
        .rollover(&ctx.gym.id, &coach_id, &schedule_id, payload.week_start_date)
        .await?;

    Ok(Json(
        ApiResponse::data(schedule).with_message("Schedule rolled over successfully"),
    ))
}
