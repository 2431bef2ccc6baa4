// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym context resolution for gym-scoped routes.
//!
//! Routes under `/api/gyms/{gym_id}/...` extract a [`GymContext`]: the gym
//! document plus the caller's role within it. System admins get blanket
//! owner-level access to every gym; everyone else needs an active
//! membership. Downstream handlers trust this context and do no further
//! authorization of their own beyond the role guards here.

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::models::{Gym, GymMembership, GymRole};
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    RequestPartsExt,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolved gym-scoped request context.
#[derive(Debug, Clone)]
pub struct GymContext {
    pub gym: Gym,
    /// The caller's membership; `None` for system admins without one
    pub membership: Option<GymMembership>,
    pub user_role: GymRole,
    pub user: AuthUser,
}

impl GymContext {
    /// Require owner or trainer role.
    pub fn require_trainer(&self) -> Result<(), AppError> {
        if self.user_role.is_trainer() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Trainer or owner role required".to_string(),
            ))
        }
    }

    /// Require owner role.
    pub fn require_owner(&self) -> Result<(), AppError> {
        if self.user_role == GymRole::Owner {
            Ok(())
        } else {
            Err(AppError::Forbidden("Owner role required".to_string()))
        }
    }

    /// Coaches may only manage their own resources unless the caller is the
    /// gym owner.
    pub fn require_owner_or_self(&self, coach_id: &str) -> Result<(), AppError> {
        if self.user_role == GymRole::Owner || self.user.user_id == coach_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Not authorized to manage this coach's resources".to_string(),
            ))
        }
    }
}

impl FromRequestParts<Arc<AppState>> for GymContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)?;

        let Path(params) = parts
            .extract::<Path<HashMap<String, String>>>()
            .await
            .map_err(|_| AppError::BadRequest("Missing gym id".to_string()))?;

        let gym_id = params
            .get("gym_id")
            .ok_or_else(|| AppError::BadRequest("Missing gym id".to_string()))?;

        let gym = state
            .db
            .get_gym(gym_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Gym not found".to_string()))?;

        if user.is_admin() {
            return Ok(GymContext {
                gym,
                membership: None,
                user_role: GymRole::Owner,
                user,
            });
        }

        let membership = state
            .db
            .get_membership(&user.user_id, gym_id)
            .await?
            .filter(|m| m.status == crate::models::MembershipStatus::Active)
            .ok_or_else(|| {
                AppError::Forbidden("No active membership in this gym".to_string())
            })?;

        Ok(GymContext {
            user_role: membership.role,
            membership: Some(membership),
            gym,
            user,
        })
    }
}
