// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use gym_tracker::config::Config;
use gym_tracker::db::FirestoreDb;
use gym_tracker::routes::create_router;
use gym_tracker::services::{ProgressionEngine, SchedulingEngine, WorkoutService};
use gym_tracker::AppState;
use std::sync::Arc;

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();

    let state = Arc::new(AppState {
        config,
        progression: ProgressionEngine::new(db.clone()),
        scheduling: SchedulingEngine::new(db.clone()),
        workouts: WorkoutService::new(db.clone()),
        db,
    });

    (create_router(state.clone()), state)
}

/// Create a signed JWT for tests.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    gym_tracker::middleware::auth::create_jwt(user_id, signing_key)
        .expect("Failed to create test JWT")
}
