// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Business logic services.

pub mod progression;
pub mod scheduling;
pub mod workout;

pub use progression::ProgressionEngine;
pub use scheduling::SchedulingEngine;
pub use workout::WorkoutService;
