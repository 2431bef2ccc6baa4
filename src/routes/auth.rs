// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login, and current-user routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::{SystemRole, User};
use crate::routes::ApiResponse;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Public auth routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Authenticated identity routes (auth middleware applied in routes/mod.rs).
pub fn me_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(get_me))
}

/// User payload for API responses; excludes the password hash.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: SystemRole,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Flatten validator errors into the joined-message 400 shape.
pub(crate) fn validation_failure(errors: &validator::ValidationErrors) -> AppError {
    let messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"))
            })
        })
        .collect();
    AppError::Validation(messages)
}

/// Create a new account with the base `user` system role.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    payload.validate().map_err(|e| validation_failure(&e))?;

    let email = payload.email.to_lowercase();
    if state.db.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(
            "An account with this email already exists".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&payload.password, 12)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

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

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;

    tracing::info!(user_id = %user.id, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(AuthResponse {
            token,
            user: UserResponse::from(&user),
        })),
    ))
}

/// Exchange email + password for a session JWT.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>> {
    let user = state
        .db
        .get_user_by_email(&payload.email.to_lowercase())
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid email or password".to_string()))?;

    let valid = bcrypt::verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification failed: {}", e)))?;

    if !valid || !user.is_active {
        return Err(AppError::BadRequest(
            "Invalid email or password".to_string(),
        ));
    }

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;

    Ok(Json(ApiResponse::data(AuthResponse {
        token,
        user: UserResponse::from(&user),
    })))
}

/// Get the current user's profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth.user_id)))?;

    Ok(Json(ApiResponse::data(UserResponse::from(&user))))
}
