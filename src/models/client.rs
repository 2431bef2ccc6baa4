//! Client model: a training member of one gym.

use crate::models::benchmark::BenchmarkRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
    Suspended,
}

/// Client stored in Firestore.
///
/// `current_block` / `current_week` are 0-based indexes into the assigned
/// program; they start at 0 on assignment and are only mutated by the
/// progression engine (advance, reset, weekly auto-advance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Document ID (UUID v4)
    pub id: String,
    pub gym_id: String,
    /// Login account linked to this client, if any
    pub user_id: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Bodyweight, if tracked
    pub weight: Option<f64>,
    pub membership_status: ClientStatus,
    pub joined_at: String,

    /// Assigned program (a client-specific copy, not the shared template)
    pub program_id: Option<String>,
    pub current_block: u32,
    pub current_week: u32,
    pub program_start_date: Option<String>,
    pub last_progression_update: Option<String>,

    /// Latest benchmark per template
    #[serde(default)]
    pub current_benchmarks: Vec<BenchmarkRecord>,
    /// Superseded benchmarks, append-only
    #[serde(default)]
    pub historical_benchmarks: Vec<BenchmarkRecord>,
}

impl Client {
    /// Latest recorded benchmark for a template, if any.
    pub fn current_benchmark(&self, template_id: &str) -> Option<&BenchmarkRecord> {
        self.current_benchmarks
            .iter()
            .find(|b| b.benchmark_template_id == template_id)
    }
}
