//! User account model for storage and API.

use serde::{Deserialize, Serialize};

/// System-wide role, independent of any per-gym role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemRole {
    /// Platform administrator, blanket access to every gym
    Admin,
    Trainer,
    User,
}

/// User account stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document ID (UUID v4)
    pub id: String,
    /// Email address, unique, lowercase
    pub email: String,
    /// Display name
    pub name: String,
    /// Bcrypt password hash. API handlers respond with `UserResponse`,
    /// never this struct, so the hash stays in storage.
    pub password_hash: String,
    pub role: SystemRole,
    pub is_active: bool,
    /// When the account was created (RFC3339)
    pub created_at: String,
}
