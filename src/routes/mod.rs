// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod benchmarks;
pub mod clients;
pub mod coaches;
pub mod gyms;
pub mod locations;
pub mod overview;
pub mod programs;
pub mod progression;
pub mod tasks;
pub mod workouts;

use crate::middleware::auth::require_auth;
use crate::middleware::gym::GymContext;
use crate::models::GymRole;
use crate::AppState;
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Request metadata echoed back to the frontend.
#[derive(Serialize, Default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<GymRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gym_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<String>,
}

/// Uniform response envelope used by every endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
            meta: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach `{ user_role, gym_id }` metadata from the gym context.
    pub fn with_meta(mut self, ctx: &GymContext) -> Self {
        self.meta = Some(Meta {
            user_role: Some(ctx.user_role),
            gym_id: Some(ctx.gym.id.clone()),
            coach_id: None,
        });
        self
    }

    pub fn with_coach_meta(mut self, ctx: &GymContext, coach_id: &str) -> Self {
        self.meta = Some(Meta {
            user_role: Some(ctx.user_role),
            gym_id: Some(ctx.gym.id.clone()),
            coach_id: Some(coach_id.to_string()),
        });
        self
    }
}

impl ApiResponse<()> {
    /// Success envelope carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            count: None,
            message: Some(message.into()),
            meta: None,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(auth::routes())
        .merge(tasks::routes()); // Task handler (called by Cloud Scheduler)

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .merge(auth::me_routes())
        .merge(gyms::routes())
        .merge(coaches::routes())
        .merge(overview::routes())
        .merge(locations::routes())
        .merge(clients::routes())
        .merge(programs::routes())
        .merge(benchmarks::routes())
        .merge(progression::routes())
        .merge(workouts::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
