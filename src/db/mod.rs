//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const GYMS: &str = "gyms";
    pub const GYM_MEMBERSHIPS: &str = "gym_memberships";
    pub const CLIENTS: &str = "clients";
    pub const PROGRAMS: &str = "programs";
    pub const BENCHMARK_TEMPLATES: &str = "benchmark_templates";
    pub const LOCATIONS: &str = "locations";
    pub const SCHEDULES: &str = "schedules";
    pub const WORKOUT_SESSIONS: &str = "workout_sessions";
}
