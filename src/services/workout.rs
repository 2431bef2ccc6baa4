// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout session service.
//!
//! Assembles the client's current workout (program position, activities
//! with calculated working weights, any active session) and tracks
//! set-by-set completion through a session's lifecycle.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{ActivityRef, Client, CompletedSet, Day, Program, WorkoutSession};
use crate::services::progression::recommended_weight;
use crate::time_utils::now_rfc3339;
use serde::Serialize;

/// One activity of a workout day, with its computed load if applicable.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityView {
    pub id: String,
    pub name: String,
    /// "primary_lift", "accessory_lift", or "other"
    pub kind: &'static str,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_of_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_notes: Option<String>,
    /// Recommended working weight; absent when it cannot be computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculated_weight: Option<f64>,
}

/// One day of the current training week.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub id: String,
    pub day_index: usize,
    pub activities: Vec<ActivityView>,
}

/// Position metadata for the client's current week.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionMeta {
    pub block: u32,
    pub week: u32,
    pub block_name: String,
    pub week_name: String,
    pub total_blocks: usize,
    pub total_weeks_in_block: usize,
}

/// Full current-workout payload.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentWorkout {
    pub client_id: String,
    pub program_id: String,
    pub program_name: String,
    pub progression: ProgressionMeta,
    /// Today's day (index 0 of the current week)
    pub current_day: DayView,
    /// Every day of the current week
    pub all_days: Vec<DayView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<WorkoutSession>,
}

/// Result of logging one set.
#[derive(Debug, Clone, Serialize)]
pub struct SetCompletionResult {
    /// False when the set was already logged (no-op, not an error)
    pub success: bool,
    pub session: WorkoutSession,
    pub exercise_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_exercise_id: Option<String>,
}

fn activity_view(activity: ActivityRef<'_>, client: &Client) -> ActivityView {
    let calculated_weight = recommended_weight(activity, &client.current_benchmarks);
    let lift_view = |a: &crate::models::LiftActivity, kind: &'static str| ActivityView {
        id: a.id.clone(),
        name: a.name.clone(),
        kind,
        notes: a.notes.clone(),
        percent_of_max: Some(a.percent_of_max),
        sets: Some(a.sets),
        repetitions: Some(a.repetitions),
        benchmark_template_id: a.benchmark_template_id.clone(),
        measurement_notes: None,
        calculated_weight,
    };
    match activity {
        ActivityRef::PrimaryLift(a) => lift_view(a, "primary_lift"),
        ActivityRef::AccessoryLift(a) => lift_view(a, "accessory_lift"),
        ActivityRef::Other(a) => ActivityView {
            id: a.id.clone(),
            name: a.name.clone(),
            kind: "other",
            notes: a.notes.clone(),
            percent_of_max: None,
            sets: None,
            repetitions: None,
            benchmark_template_id: None,
            measurement_notes: a.measurement_notes.clone(),
            calculated_weight,
        },
    }
}

fn day_view(day: &Day, day_index: usize, client: &Client) -> DayView {
    DayView {
        id: day.id.clone(),
        day_index,
        activities: day
            .activities()
            .into_iter()
            .map(|a| activity_view(a, client))
            .collect(),
    }
}

/// Workout session service bound to the database.
#[derive(Clone)]
pub struct WorkoutService {
    db: FirestoreDb,
}

impl WorkoutService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Resolve a client within a gym by client ID, falling back to the
    /// linked user ID (callers pass either).
    async fn resolve_client(
        &self,
        gym_id: &str,
        id_or_user_id: &str,
    ) -> Result<Option<Client>, AppError> {
        if let Some(client) = self
            .db
            .get_client_doc(id_or_user_id)
            .await?
            .filter(|c| c.gym_id == gym_id)
        {
            return Ok(Some(client));
        }
        self.db.get_client_by_user(gym_id, id_or_user_id).await
    }

    /// Build the current workout for a client.
    ///
    /// Returns `None` when the client does not exist or has no assigned
    /// program. A progression pointer outside the program's current shape
    /// is surfaced as an integrity error, never silently clamped — stale
    /// pointers are fixed by an explicit reset.
    pub async fn current_workout(
        &self,
        gym_id: &str,
        client_id: &str,
    ) -> Result<Option<CurrentWorkout>, AppError> {
        let Some(client) = self.resolve_client(gym_id, client_id).await? else {
            return Ok(None);
        };

        let Some(program_id) = client.program_id.clone() else {
            return Ok(None);
        };

        let Some(program) = self.db.get_program(&program_id).await? else {
            return Ok(None);
        };

        let (current_week, progression) = current_week_of(&program, &client)?;

        let all_days: Vec<DayView> = current_week
            .days
            .iter()
            .enumerate()
            .map(|(i, day)| day_view(day, i, &client))
            .collect();

        let current_day = all_days.first().cloned().ok_or_else(|| {
            AppError::DataIntegrity(format!(
                "Week {} of block {} has no days",
                client.current_week, client.current_block
            ))
        })?;

        let session = self
            .db
            .find_active_session(&client.id, gym_id, client.current_block, client.current_week, 0)
            .await?;

        Ok(Some(CurrentWorkout {
            client_id: client.id.clone(),
            program_id,
            program_name: program.name.clone(),
            progression,
            current_day,
            all_days,
            session,
        }))
    }

    /// Start a new session, deactivating any the client already has open.
    pub async fn create_session(
        &self,
        client_id: &str,
        gym_id: &str,
        program_id: &str,
        block: u32,
        week: u32,
        day: u32,
    ) -> Result<WorkoutSession, AppError> {
        let now = now_rfc3339();

        for mut open in self.db.list_active_sessions_for_client(client_id).await? {
            open.is_active = false;
            open.completed_at = Some(now.clone());
            self.db.upsert_session(&open).await?;
        }

        let session = WorkoutSession {
            id: uuid::Uuid::new_v4().to_string(),
            client_id: client_id.to_string(),
            gym_id: gym_id.to_string(),
            program_id: program_id.to_string(),
            block,
            week,
            day,
            started_at: now,
            completed_at: None,
            completed_sets: Vec::new(),
            is_active: true,
        };
        self.db.upsert_session(&session).await?;

        tracing::info!(
            client_id,
            session_id = %session.id,
            block,
            week,
            day,
            "Workout session started"
        );

        Ok(session)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<WorkoutSession>, AppError> {
        self.db.get_session(session_id).await
    }

    /// Log a completed set.
    ///
    /// A duplicate (activity, set) is reported back with `success: false`
    /// rather than an error. Completing the last programmed set of an
    /// activity flags the exercise as done and names the next one.
    pub async fn complete_set(
        &self,
        gym_id: &str,
        session_id: &str,
        activity_id: &str,
        set_number: u32,
    ) -> Result<SetCompletionResult, AppError> {
        let mut session = self
            .db
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Workout session not found".to_string()))?;

        if session.has_set(activity_id, set_number) {
            return Ok(SetCompletionResult {
                success: false,
                session,
                exercise_completed: false,
                next_exercise_id: None,
            });
        }

        session.completed_sets.push(CompletedSet {
            activity_id: activity_id.to_string(),
            set_number,
            completed_at: now_rfc3339(),
        });
        self.db.upsert_session(&session).await?;

        let workout = self
            .current_workout(gym_id, &session.client_id)
            .await?
            .ok_or_else(|| {
                AppError::DataIntegrity(format!(
                    "No current workout for client {} with an open session",
                    session.client_id
                ))
            })?;

        let activities = &workout.current_day.activities;
        let position = activities
            .iter()
            .position(|a| a.id == activity_id)
            .ok_or_else(|| AppError::NotFound("Activity not found".to_string()))?;

        let total_sets = activities[position].sets.unwrap_or(1) as usize;
        let exercise_completed = session.completed_sets_for(activity_id) >= total_sets;

        let next_exercise_id = if exercise_completed {
            activities.get(position + 1).map(|a| a.id.clone())
        } else {
            None
        };

        Ok(SetCompletionResult {
            success: true,
            session,
            exercise_completed,
            next_exercise_id,
        })
    }

    /// Close a session.
    pub async fn end_session(&self, session_id: &str) -> Result<WorkoutSession, AppError> {
        let mut session = self
            .db
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Workout session not found".to_string()))?;

        session.is_active = false;
        session.completed_at = Some(now_rfc3339());
        self.db.upsert_session(&session).await?;

        Ok(session)
    }
}

/// Current week of the program per the client's pointer, with bounds
/// checked against the program's *current* shape.
fn current_week_of<'a>(
    program: &'a Program,
    client: &Client,
) -> Result<(&'a crate::models::Week, ProgressionMeta), AppError> {
    let block = program
        .blocks
        .get(client.current_block as usize)
        .ok_or_else(|| {
            AppError::DataIntegrity("Client block progression is out of bounds".to_string())
        })?;

    let week = block.weeks.get(client.current_week as usize).ok_or_else(|| {
        AppError::DataIntegrity("Client week progression is out of bounds".to_string())
    })?;

    Ok((
        week,
        ProgressionMeta {
            block: client.current_block,
            week: client.current_week,
            block_name: format!("Block {}", client.current_block + 1),
            week_name: format!("Week {}", client.current_week + 1),
            total_blocks: program.blocks.len(),
            total_weeks_in_block: block.weeks.len(),
        },
    ))
}
