//! Workout session model: set-by-set tracking of one training day.

use serde::{Deserialize, Serialize};

/// A single completed set within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSet {
    pub activity_id: String,
    /// 1-based set number
    pub set_number: u32,
    pub completed_at: String,
}

/// One client's in-progress (or finished) workout, pinned to a specific
/// (block, week, day) of their assigned program. At most one session per
/// client is active at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Document ID (UUID v4)
    pub id: String,
    pub client_id: String,
    pub gym_id: String,
    pub program_id: String,
    pub block: u32,
    pub week: u32,
    pub day: u32,
    pub started_at: String,
    pub completed_at: Option<String>,
    #[serde(default)]
    pub completed_sets: Vec<CompletedSet>,
    pub is_active: bool,
}

impl WorkoutSession {
    /// Number of sets completed for one activity.
    pub fn completed_sets_for(&self, activity_id: &str) -> usize {
        self.completed_sets
            .iter()
            .filter(|s| s.activity_id == activity_id)
            .count()
    }

    /// Whether a specific set was already logged.
    pub fn has_set(&self, activity_id: &str, set_number: u32) -> bool {
        self.completed_sets
            .iter()
            .any(|s| s.activity_id == activity_id && s.set_number == set_number)
    }
}
