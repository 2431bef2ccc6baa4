// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client program progression engine.
//!
//! A client's position in their assigned program is the 0-based pair
//! (current_block, current_week). Advancing walks weeks forward through the
//! block list like a mixed-radix odometer: each block's radix is its own
//! week count. Walking past the last block restarts the program at (0, 0).
//!
//! The odometer itself ([`advance_position`]) is a pure function over the
//! program's shape so every edge case is unit-testable without a database.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{ActivityRef, BenchmarkRecord, Client, Program};
use crate::time_utils::now_rfc3339;
use serde::Serialize;

/// Result of advancing or resetting one client.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressionOutcome {
    pub client_id: String,
    pub previous_block: u32,
    pub previous_week: u32,
    pub new_block: u32,
    pub new_week: u32,
    pub program_restarted: bool,
}

/// Per-client failure captured during a bulk pass.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionFailure {
    pub client_id: String,
    pub error: String,
}

/// Result of a bulk (per-gym or weekly) progression pass.
#[derive(Debug, Clone, Serialize)]
pub struct BulkProgressionOutcome {
    pub total_clients: usize,
    pub successful_updates: usize,
    pub failed_updates: usize,
    pub results: Vec<ProgressionOutcome>,
    pub errors: Vec<ProgressionFailure>,
}

/// New position produced by the odometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advanced {
    pub block: usize,
    pub week: usize,
    pub program_restarted: bool,
}

/// Advance a (block, week) position through a program shape.
///
/// `week_counts` is the number of weeks in each block, in order. Week
/// overflow carries into subsequent blocks, each with its own radix;
/// walking past the last block resets to (0, 0) and flags the restart.
/// A zero-week block encountered while carrying is a data-integrity error,
/// not something to skip over.
pub fn advance_position(
    week_counts: &[usize],
    current_block: usize,
    current_week: usize,
    block_increment: usize,
    week_increment: usize,
) -> Result<Advanced, AppError> {
    let mut block = current_block + block_increment;
    let mut week = current_week + week_increment;

    while block < week_counts.len() && week >= week_counts[block] {
        if week_counts[block] == 0 {
            return Err(AppError::DataIntegrity(format!(
                "Invalid program structure: Block {block} has no weeks"
            )));
        }
        week -= week_counts[block];
        block += 1;
    }

    if block >= week_counts.len() {
        return Ok(Advanced {
            block: 0,
            week: 0,
            program_restarted: true,
        });
    }

    Ok(Advanced {
        block,
        week,
        program_restarted: false,
    })
}

/// Validate an explicit reset target against the program shape.
///
/// Unlike advancing, resets never wrap or clamp: out-of-range targets are
/// rejected and the client's position is left untouched.
pub fn validate_reset_target(
    week_counts: &[usize],
    target_block: usize,
    target_week: usize,
) -> Result<(), AppError> {
    if target_block >= week_counts.len() {
        return Err(AppError::BadRequest(format!(
            "Invalid target block: {target_block}. Program has {} blocks.",
            week_counts.len()
        )));
    }
    if target_week >= week_counts[target_block] {
        return Err(AppError::BadRequest(format!(
            "Invalid target week: {target_week}. Block {target_block} has {} weeks.",
            week_counts[target_block]
        )));
    }
    Ok(())
}

/// Recommended working weight for an activity, if it can be computed.
///
/// Only lifts that carry both a percent-of-max and a benchmark template
/// reference get a weight, and only when the client has a current lift
/// benchmark for that template. Percent values above 1 are whole-number
/// percentages; values at or below 1 are fractions. A missing benchmark is
/// never an error — the field is simply absent.
pub fn recommended_weight(
    activity: ActivityRef<'_>,
    benchmarks: &[BenchmarkRecord],
) -> Option<f64> {
    match activity {
        ActivityRef::PrimaryLift(a) | ActivityRef::AccessoryLift(a) => {
            let template_id = a.benchmark_template_id.as_deref()?;
            if a.percent_of_max <= 0.0 {
                return None;
            }
            let benchmark = benchmarks
                .iter()
                .find(|b| b.benchmark_template_id == template_id)?;
            let weight = benchmark.measurement.lift_weight()?;
            let fraction = if a.percent_of_max > 1.0 {
                a.percent_of_max / 100.0
            } else {
                a.percent_of_max
            };
            Some(weight * fraction)
        }
        ActivityRef::Other(_) => None,
    }
}

/// Progression engine bound to the database.
#[derive(Clone)]
pub struct ProgressionEngine {
    db: FirestoreDb,
}

impl ProgressionEngine {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Load a client and their assigned program.
    async fn load_client_and_program(
        &self,
        client_id: &str,
    ) -> Result<(Client, Program), AppError> {
        let client = self
            .db
            .get_client_doc(client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

        let program_id = client
            .program_id
            .clone()
            .ok_or_else(|| AppError::BadRequest("Client has no assigned program".to_string()))?;

        let program = self.db.get_program(&program_id).await?.ok_or_else(|| {
            AppError::DataIntegrity(format!(
                "Assigned program {program_id} missing for client {client_id}"
            ))
        })?;

        Ok((client, program))
    }

    /// Advance a single client by the given block/week increments.
    pub async fn advance(
        &self,
        client_id: &str,
        block_increment: u32,
        week_increment: u32,
    ) -> Result<ProgressionOutcome, AppError> {
        let (mut client, program) = self.load_client_and_program(client_id).await?;

        let previous_block = client.current_block;
        let previous_week = client.current_week;

        let advanced = advance_position(
            &program.week_counts(),
            client.current_block as usize,
            client.current_week as usize,
            block_increment as usize,
            week_increment as usize,
        )?;

        client.current_block = advanced.block as u32;
        client.current_week = advanced.week as u32;
        client.last_progression_update = Some(now_rfc3339());
        self.db.upsert_client(&client).await?;

        tracing::info!(
            client_id,
            previous_block,
            previous_week,
            new_block = client.current_block,
            new_week = client.current_week,
            restarted = advanced.program_restarted,
            "Client progression advanced"
        );

        Ok(ProgressionOutcome {
            client_id: client.id,
            previous_block,
            previous_week,
            new_block: advanced.block as u32,
            new_week: advanced.week as u32,
            program_restarted: advanced.program_restarted,
        })
    }

    /// Reset a client's position to an explicit (block, week) target.
    pub async fn reset(
        &self,
        client_id: &str,
        target_block: u32,
        target_week: u32,
    ) -> Result<ProgressionOutcome, AppError> {
        let (mut client, program) = self.load_client_and_program(client_id).await?;

        validate_reset_target(
            &program.week_counts(),
            target_block as usize,
            target_week as usize,
        )?;

        let previous_block = client.current_block;
        let previous_week = client.current_week;

        client.current_block = target_block;
        client.current_week = target_week;
        client.last_progression_update = Some(now_rfc3339());
        self.db.upsert_client(&client).await?;

        Ok(ProgressionOutcome {
            client_id: client.id,
            previous_block,
            previous_week,
            new_block: target_block,
            new_week: target_week,
            program_restarted: false,
        })
    }

    /// Point a client at a freshly assigned program, starting at (0, 0).
    pub async fn start_program(&self, client_id: &str, program_id: &str) -> Result<Client, AppError> {
        let mut client = self
            .db
            .get_client_doc(client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

        let now = now_rfc3339();
        client.program_id = Some(program_id.to_string());
        client.current_block = 0;
        client.current_week = 0;
        client.program_start_date = Some(now.clone());
        client.last_progression_update = Some(now);
        self.db.upsert_client(&client).await?;

        Ok(client)
    }

    /// Advance every active client with a program in one gym.
    ///
    /// Clients are processed sequentially; one failure never stops the rest.
    pub async fn bulk_advance(
        &self,
        gym_id: &str,
        block_increment: u32,
        week_increment: u32,
    ) -> Result<BulkProgressionOutcome, AppError> {
        let clients = self
            .db
            .list_active_clients_with_program(Some(gym_id))
            .await?;
        Ok(self
            .advance_clients(clients, block_increment, week_increment)
            .await)
    }

    /// Weekly auto-progression pass: every active client with a program,
    /// across all gyms, advances by exactly one week.
    pub async fn weekly_auto_progression(&self) -> Result<BulkProgressionOutcome, AppError> {
        tracing::info!("Starting weekly auto-progression");
        let clients = self.db.list_active_clients_with_program(None).await?;
        let outcome = self.advance_clients(clients, 0, 1).await;
        tracing::info!(
            successful = outcome.successful_updates,
            failed = outcome.failed_updates,
            "Weekly auto-progression completed"
        );
        Ok(outcome)
    }

    async fn advance_clients(
        &self,
        clients: Vec<Client>,
        block_increment: u32,
        week_increment: u32,
    ) -> BulkProgressionOutcome {
        let total_clients = clients.len();
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for client in clients {
            match self
                .advance(&client.id, block_increment, week_increment)
                .await
            {
                Ok(outcome) => results.push(outcome),
                Err(err) => {
                    tracing::warn!(client_id = %client.id, error = %err, "Failed to progress client");
                    errors.push(ProgressionFailure {
                        client_id: client.id,
                        error: err.to_string(),
                    });
                }
            }
        }

        BulkProgressionOutcome {
            total_clients,
            successful_updates: results.len(),
            failed_updates: errors.len(),
            results,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_within_block() {
        let advanced = advance_position(&[2, 3], 0, 0, 0, 1).unwrap();
        assert_eq!(advanced.block, 0);
        assert_eq!(advanced.week, 1);
        assert!(!advanced.program_restarted);
    }

    #[test]
    fn test_advance_carries_into_next_block() {
        // Program shape [2, 3], client at (0, 1): one more week lands at (1, 0)
        let advanced = advance_position(&[2, 3], 0, 1, 0, 1).unwrap();
        assert_eq!((advanced.block, advanced.week), (1, 0));
        assert!(!advanced.program_restarted);
    }

    #[test]
    fn test_advance_wraps_to_restart() {
        // (1, 2) is the last week of the last block; one more week restarts
        let advanced = advance_position(&[2, 3], 1, 2, 0, 1).unwrap();
        assert_eq!((advanced.block, advanced.week), (0, 0));
        assert!(advanced.program_restarted);
    }

    #[test]
    fn test_advance_to_exact_last_week_does_not_restart() {
        let advanced = advance_position(&[2, 3], 1, 1, 0, 1).unwrap();
        assert_eq!((advanced.block, advanced.week), (1, 2));
        assert!(!advanced.program_restarted);
    }

    #[test]
    fn test_advance_multi_week_carry_spans_blocks() {
        // 4 weeks forward from (0, 0) over shape [2, 3]: 2 carry into block 1
        let advanced = advance_position(&[2, 3], 0, 0, 0, 4).unwrap();
        assert_eq!((advanced.block, advanced.week), (1, 2));
    }

    #[test]
    fn test_advance_block_increment_past_end_restarts() {
        let advanced = advance_position(&[2, 3], 1, 0, 1, 0).unwrap();
        assert_eq!((advanced.block, advanced.week), (0, 0));
        assert!(advanced.program_restarted);
    }

    #[test]
    fn test_advance_is_decomposable_into_unit_steps() {
        // Advancing by N weeks must equal N single-week advances, for any
        // shape and start, as long as no restart happens in between.
        let shapes: [&[usize]; 3] = [&[2, 3], &[1, 1, 1], &[4, 2, 5, 1]];
        for shape in shapes {
            let total_weeks: usize = shape.iter().sum();
            for steps in 0..total_weeks - 1 {
                let stepped = (0..steps).try_fold((0usize, 0usize), |(b, w), _| {
                    let a = advance_position(shape, b, w, 0, 1).unwrap();
                    if a.program_restarted {
                        None
                    } else {
                        Some((a.block, a.week))
                    }
                });
                if let Some((b, w)) = stepped {
                    let direct = advance_position(shape, 0, 0, 0, steps).unwrap();
                    assert_eq!((direct.block, direct.week), (b, w), "shape {shape:?}");
                }
            }
        }
    }

    #[test]
    fn test_advance_rejects_zero_week_block() {
        let err = advance_position(&[2, 0, 3], 0, 1, 0, 1).unwrap_err();
        assert!(matches!(err, AppError::DataIntegrity(_)));
    }

    #[test]
    fn test_advance_does_not_touch_trailing_empty_block() {
        // No carry reaches block 1, so its emptiness goes unnoticed here
        let advanced = advance_position(&[3, 0], 0, 0, 0, 1).unwrap();
        assert_eq!((advanced.block, advanced.week), (0, 1));
    }

    #[test]
    fn test_validate_reset_target_in_range() {
        assert!(validate_reset_target(&[2, 3], 1, 2).is_ok());
        assert!(validate_reset_target(&[2, 3], 0, 0).is_ok());
    }

    #[test]
    fn test_validate_reset_target_out_of_range() {
        assert!(matches!(
            validate_reset_target(&[2, 3], 2, 0),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_reset_target(&[2, 3], 1, 3),
            Err(AppError::BadRequest(_))
        ));
    }

    mod weights {
        use super::super::*;
        use crate::models::{BenchmarkMeasurement, LiftActivity};

        fn lift(percent: f64, template: Option<&str>) -> LiftActivity {
            LiftActivity {
                id: "a1".to_string(),
                name: "Back Squat".to_string(),
                notes: None,
                percent_of_max: percent,
                sets: 5,
                repetitions: 5,
                benchmark_template_id: template.map(str::to_string),
            }
        }

        fn benchmark(template_id: &str, weight: f64) -> BenchmarkRecord {
            BenchmarkRecord {
                name: "Back Squat 1RM".to_string(),
                notes: None,
                benchmark_template_id: template_id.to_string(),
                recorded_at: "2026-01-01T00:00:00Z".to_string(),
                measurement: BenchmarkMeasurement::Lift { weight },
            }
        }

        #[test]
        fn test_whole_number_percent() {
            let activity = lift(80.0, Some("t1"));
            let weight = recommended_weight(
                ActivityRef::PrimaryLift(&activity),
                &[benchmark("t1", 200.0)],
            );
            assert_eq!(weight, Some(160.0));
        }

        #[test]
        fn test_fractional_percent() {
            let activity = lift(0.8, Some("t1"));
            let weight = recommended_weight(
                ActivityRef::AccessoryLift(&activity),
                &[benchmark("t1", 200.0)],
            );
            assert_eq!(weight, Some(160.0));
        }

        #[test]
        fn test_no_benchmark_means_no_weight() {
            let activity = lift(80.0, Some("t1"));
            let weight = recommended_weight(
                ActivityRef::PrimaryLift(&activity),
                &[benchmark("other", 200.0)],
            );
            assert_eq!(weight, None);
        }

        #[test]
        fn test_non_lift_benchmark_means_no_weight() {
            let activity = lift(80.0, Some("t1"));
            let record = BenchmarkRecord {
                measurement: BenchmarkMeasurement::Other {
                    value: Some(480.0),
                    unit: Some("seconds".to_string()),
                    measurement_notes: None,
                },
                ..benchmark("t1", 0.0)
            };
            assert_eq!(
                recommended_weight(ActivityRef::PrimaryLift(&activity), &[record]),
                None
            );
        }

        #[test]
        fn test_missing_template_reference() {
            let activity = lift(80.0, None);
            assert_eq!(
                recommended_weight(
                    ActivityRef::PrimaryLift(&activity),
                    &[benchmark("t1", 200.0)]
                ),
                None
            );
        }
    }
}
