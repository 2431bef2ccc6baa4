//! Gym and gym-membership models.

use serde::{Deserialize, Serialize};

/// A gym (tenant). All coach/client/program/schedule data is scoped to one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gym {
    /// Document ID (UUID v4)
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub phone: String,
    /// Contact email, unique across gyms
    pub email: String,
    /// User ID of the owning account, if set
    pub owner_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// Role of a user within one gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GymRole {
    Owner,
    Trainer,
    Client,
}

impl GymRole {
    /// True for roles allowed to manage clients and programs.
    pub fn is_trainer(self) -> bool {
        matches!(self, GymRole::Owner | GymRole::Trainer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
    Active,
    Inactive,
}

/// Links a user to a gym with a role. One membership per (user, gym).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymMembership {
    /// Document ID (UUID v4)
    pub id: String,
    pub user_id: String,
    pub gym_id: String,
    pub role: GymRole,
    pub status: MembershipStatus,
    pub joined_at: String,
}
