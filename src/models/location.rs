//! Training locations (rooms/areas) within a gym.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Document ID (UUID v4)
    pub id: String,
    pub gym_id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: String,
}
