// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod benchmark;
pub mod client;
pub mod gym;
pub mod location;
pub mod program;
pub mod schedule;
pub mod session;
pub mod user;

pub use benchmark::{BenchmarkMeasurement, BenchmarkRecord, BenchmarkTemplate, BenchmarkType};
pub use client::{Client, ClientStatus};
pub use gym::{Gym, GymMembership, GymRole, MembershipStatus};
pub use location::Location;
pub use program::{ActivityRef, Block, Day, LiftActivity, OtherActivity, Program, Week};
pub use schedule::{ScheduleDay, TimeSlot, WeeklySchedule};
pub use session::{CompletedSet, WorkoutSession};
pub use user::{SystemRole, User};
