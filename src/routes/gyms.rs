// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym CRUD and membership management routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::middleware::gym::GymContext;
use crate::models::{Gym, GymMembership, GymRole, MembershipStatus};
use crate::routes::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/gyms", get(list_gyms).post(create_gym))
        .route(
            "/api/gyms/{gym_id}",
            get(get_gym).put(update_gym).delete(delete_gym),
        )
        .route(
            "/api/gyms/{gym_id}/members",
            get(list_members).post(add_member),
        )
        .route(
            "/api/gyms/{gym_id}/members/{user_id}",
            put(update_member).delete(remove_member),
        )
}

fn require_admin(auth: &AuthUser) -> Result<()> {
    if auth.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin role required".to_string()))
    }
}

// ─── Gym CRUD ────────────────────────────────────────────────

/// List all gyms (admins) or the caller's gyms (everyone else).
async fn list_gyms(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<Vec<Gym>>>> {
    let gyms = if auth.is_admin() {
        state.db.list_gyms().await?
    } else {
        let memberships = state.db.list_memberships_for_user(&auth.user_id).await?;
        let mut gyms = Vec::with_capacity(memberships.len());
        for membership in memberships {
            if let Some(gym) = state.db.get_gym(&membership.gym_id).await? {
                gyms.push(gym);
            }
        }
        gyms
    };

    let count = gyms.len();
    Ok(Json(ApiResponse::data(gyms).with_count(count)))
}

async fn get_gym(ctx: GymContext) -> Result<Json<ApiResponse<Gym>>> {
    let gym = ctx.gym.clone();
    Ok(Json(ApiResponse::data(gym).with_meta(&ctx)))
}

#[derive(Deserialize, Validate)]
struct CreateGymRequest {
    #[validate(length(min = 1, max = 100, message = "Gym name must be between 1 and 100 characters"))]
    name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    description: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Address must be between 1 and 200 characters"))]
    address: String,
    #[validate(length(min = 10, message = "Please enter a valid phone number"))]
    phone: String,
    #[validate(email(message = "Please enter a valid email"))]
    email: String,
    /// Optional owner to seed the gym with
    owner_id: Option<String>,
}

/// Create a gym (admins only). If `owner_id` is given, that user gets an
/// owner membership immediately.
async fn create_gym(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateGymRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Gym>>)> {
    require_admin(&auth)?;
    payload
        .validate()
        .map_err(|e| crate::routes::auth::validation_failure(&e))?;

    let email = payload.email.to_lowercase();
    if state.db.get_gym_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(
            "Gym with this email already exists".to_string(),
        ));
    }

    let now = now_rfc3339();
    let gym = Gym {
        id: uuid::Uuid::new_v4().to_string(),
        name: payload.name.trim().to_string(),
        description: payload.description,
        address: payload.address,
        phone: payload.phone,
        email,
        owner_id: payload.owner_id.clone(),
        is_active: true,
        created_at: now.clone(),
    };
    state.db.upsert_gym(&gym).await?;

    if let Some(owner_id) = payload.owner_id {
        let membership = GymMembership {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: owner_id,
            gym_id: gym.id.clone(),
            role: GymRole::Owner,
            status: MembershipStatus::Active,
            joined_at: now,
        };
        state.db.upsert_membership(&membership).await?;
    }

    tracing::info!(gym_id = %gym.id, "Gym created");

    Ok((StatusCode::CREATED, Json(ApiResponse::data(gym))))
}

#[derive(Deserialize)]
struct UpdateGymRequest {
    name: Option<String>,
    description: Option<String>,
    address: Option<String>,
    phone: Option<String>,
}

async fn update_gym(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Json(payload): Json<UpdateGymRequest>,
) -> Result<Json<ApiResponse<Gym>>> {
    ctx.require_owner()?;

    let mut gym = ctx.gym.clone();
    if let Some(name) = payload.name {
        gym.name = name;
    }
    if let Some(description) = payload.description {
        gym.description = Some(description);
    }
    if let Some(address) = payload.address {
        gym.address = address;
    }
    if let Some(phone) = payload.phone {
        gym.phone = phone;
    }
    state.db.upsert_gym(&gym).await?;

    Ok(Json(ApiResponse::data(gym).with_meta(&ctx)))
}

async fn delete_gym(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(gym_id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    require_admin(&auth)?;

    state
        .db
        .get_gym(&gym_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Gym not found".to_string()))?;

    state.db.delete_gym(&gym_id).await?;

    tracing::info!(gym_id, "Gym deleted");

    Ok(Json(ApiResponse::message("Gym deleted successfully")))
}

// ─── Membership Management ───────────────────────────────────

async fn list_members(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
) -> Result<Json<ApiResponse<Vec<GymMembership>>>> {
    ctx.require_owner()?;

    let members = state.db.list_memberships_for_gym(&ctx.gym.id).await?;
    let count = members.len();
    Ok(Json(ApiResponse::data(members).with_count(count).with_meta(&ctx)))
}

#[derive(Deserialize)]
struct AddMemberRequest {
    user_id: String,
    #[serde(default = "default_member_role")]
    role: GymRole,
}

fn default_member_role() -> GymRole {
    GymRole::Client
}

async fn add_member(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Json(payload): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GymMembership>>)> {
    ctx.require_owner()?;

    state
        .db
        .get_user(&payload.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if state
        .db
        .get_membership(&payload.user_id, &ctx.gym.id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "User is already a member of this gym".to_string(),
        ));
    }

    let membership = GymMembership {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: payload.user_id,
        gym_id: ctx.gym.id.clone(),
        role: payload.role,
        status: MembershipStatus::Active,
        joined_at: now_rfc3339(),
    };
    state.db.upsert_membership(&membership).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(membership).with_meta(&ctx)),
    ))
}

#[derive(Deserialize)]
struct UpdateMemberRequest {
    role: Option<GymRole>,
    status: Option<MembershipStatus>,
}

async fn update_member(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, user_id)): Path<(String, String)>,
    Json(payload): Json<UpdateMemberRequest>,
) -> Result<Json<ApiResponse<GymMembership>>> {
    ctx.require_owner()?;

    let mut membership = state
        .db
        .get_membership(&user_id, &ctx.gym.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;

    if let Some(role) = payload.role {
        membership.role = role;
    }
    if let Some(status) = payload.status {
        membership.status = status;
    }
    state.db.upsert_membership(&membership).await?;

    Ok(Json(ApiResponse::data(membership).with_meta(&ctx)))
}

async fn remove_member(
    State(state): State<Arc<AppState>>,
    ctx: GymContext,
    Path((_gym_id, user_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    ctx.require_owner()?;

    let membership = state
        .db
        .get_membership(&user_id, &ctx.gym.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;

    state.db.delete_membership(&membership.id).await?;

    Ok(Json(ApiResponse::message(
        "Member removed from gym successfully",
    )))
}
