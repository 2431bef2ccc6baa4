// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gym-Tracker: Multi-tenant gym management backend
//!
//! This crate provides the backend API for gyms, coaches, clients, training
//! programs, benchmarks, weekly class schedules, and client progression
//! through an assigned program over time.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{ProgressionEngine, SchedulingEngine, WorkoutService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub progression: ProgressionEngine,
    pub scheduling: SchedulingEngine,
    pub workouts: WorkoutService,
}
