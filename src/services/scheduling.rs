// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly schedule engine: enrollment, conflict detection, and
//! template/active materialization.
//!
//! Time ranges are half-open `[start, end)`: two slots conflict when
//! `start1 < end2 && start2 < end1`, so back-to-back classes never collide.
//! Enrollment conflicts are checked against every other active enrollment
//! of the client on that weekday across all non-template schedules in the
//! gym, not just within one schedule.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{TimeSlot, WeeklySchedule};
use crate::time_utils::{now_rfc3339, parse_slot_minutes};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Half-open interval overlap on minutes since midnight.
pub fn ranges_overlap(start1: u32, end1: u32, start2: u32, end2: u32) -> bool {
    start1 < end2 && start2 < end1
}

/// Slot times as minutes since midnight.
///
/// Stored slots are validated at write time, so a parse failure here means
/// the document is corrupt.
pub fn slot_minutes(slot: &TimeSlot) -> Result<(u32, u32), AppError> {
    match (
        parse_slot_minutes(&slot.start_time),
        parse_slot_minutes(&slot.end_time),
    ) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(AppError::DataIntegrity(format!(
            "Stored time slot {}-{} is not valid HH:MM",
            slot.start_time, slot.end_time
        ))),
    }
}

/// Whether two slots overlap in time.
pub fn slots_overlap(a: &TimeSlot, b: &TimeSlot) -> Result<bool, AppError> {
    let (start1, end1) = slot_minutes(a)?;
    let (start2, end2) = slot_minutes(b)?;
    Ok(ranges_overlap(start1, end1, start2, end2))
}

/// Add a client to a slot, enforcing double-enrollment and capacity rules.
pub fn apply_enrollment(slot: &mut TimeSlot, client_id: &str) -> Result<(), AppError> {
    if slot.client_ids.iter().any(|c| c == client_id) {
        return Err(AppError::BadRequest(
            "Client already enrolled in this time slot".to_string(),
        ));
    }
    if slot.client_ids.len() >= slot.max_capacity as usize {
        return Err(AppError::BadRequest(
            "Time slot is at maximum capacity".to_string(),
        ));
    }
    slot.client_ids.push(client_id.to_string());
    Ok(())
}

/// Remove a client from a slot; absence is an explicit error, not a no-op.
pub fn apply_unenrollment(slot: &mut TimeSlot, client_id: &str) -> Result<(), AppError> {
    let position = slot
        .client_ids
        .iter()
        .position(|c| c == client_id)
        .ok_or_else(|| {
            AppError::BadRequest("Client not enrolled in this time slot".to_string())
        })?;
    slot.client_ids.remove(position);
    Ok(())
}

/// Find a slot the client is already enrolled in on this weekday that
/// overlaps the candidate slot. The candidate itself (identified by
/// schedule id + slot index) is skipped.
pub fn find_client_conflict<'a>(
    schedules: &'a [WeeklySchedule],
    target_schedule_id: &str,
    target_slot_index: usize,
    day_of_week: u8,
    slot: &TimeSlot,
    client_id: &str,
) -> Result<Option<&'a TimeSlot>, AppError> {
    for other_schedule in schedules {
        let Some(day) = other_schedule.day(day_of_week) else {
            continue;
        };
        for (other_index, other_slot) in day.time_slots.iter().enumerate() {
            if other_schedule.id == target_schedule_id && other_index == target_slot_index {
                continue;
            }
            if !other_slot.client_ids.iter().any(|c| c == client_id) {
                continue;
            }
            if slots_overlap(slot, other_slot)? {
                return Ok(Some(other_slot));
            }
        }
    }
    Ok(None)
}

/// Enrollment request body, shared by enroll and unenroll.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollmentRequest {
    pub day_of_week: u8,
    pub time_slot_index: usize,
    pub client_id: String,
}

/// One entry of the gym-wide conflict report.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleConflict {
    pub location_id: String,
    pub location_name: String,
    pub day_of_week: u8,
    pub day_name: String,
    pub conflict: ConflictPair,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictPair {
    pub schedule1: ConflictParty,
    pub schedule2: ConflictParty,
    pub overlap_period: OverlapPeriod,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictParty {
    pub id: String,
    pub name: String,
    pub coach_id: String,
    pub coach_name: String,
    pub time_slot: String,
}

/// The shared sub-range of two overlapping slots.
#[derive(Debug, Clone, Serialize)]
pub struct OverlapPeriod {
    pub start: String,
    pub end: String,
}

/// Gym-wide schedule overview, grouped by location and weekday.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOverview {
    pub locations: HashMap<String, LocationOverview>,
    pub coaches: HashMap<String, CoachOverview>,
    pub summary: OverviewSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationOverview {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    /// Always 7 entries, Sunday through Saturday
    pub days: Vec<OverviewDay>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewDay {
    pub day_of_week: u8,
    pub time_slots: Vec<OverviewSlot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewSlot {
    pub start_time: String,
    pub end_time: String,
    pub max_capacity: u32,
    pub client_ids: Vec<String>,
    pub enrolled_count: usize,
    pub available_spots: i64,
    pub notes: Option<String>,
    pub activity_type: Option<String>,
    pub schedule_id: String,
    pub schedule_name: String,
    pub coach_id: String,
    pub coach_name: String,
    pub is_template: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoachOverview {
    pub id: String,
    pub name: String,
    pub email: String,
    pub schedule_count: usize,
    pub total_time_slots: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OverviewSummary {
    pub total_schedules: usize,
    pub total_time_slots: usize,
    pub total_enrollments: usize,
}

/// Sunday-based bounds of the week containing `date`.
fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - chrono::Days::new(date.weekday().num_days_from_sunday() as u64);
    (start, start + chrono::Days::new(6))
}

/// Keep only active schedules whose week contains `date` (if given).
fn filter_by_week(schedules: Vec<WeeklySchedule>, date: Option<NaiveDate>) -> Vec<WeeklySchedule> {
    match date {
        None => schedules,
        Some(date) => {
            let (start, end) = week_bounds(date);
            schedules
                .into_iter()
                .filter(|s| {
                    s.week_start_date
                        .map(|d| d >= start && d <= end)
                        .unwrap_or(false)
                })
                .collect()
        }
    }
}

/// Scheduling engine bound to the database.
#[derive(Clone)]
pub struct SchedulingEngine {
    db: FirestoreDb,
}

impl SchedulingEngine {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Load a schedule and verify it belongs to the gym and coach.
    async fn load_schedule(
        &self,
        gym_id: &str,
        coach_id: &str,
        schedule_id: &str,
    ) -> Result<WeeklySchedule, AppError> {
        self.db
            .get_schedule(schedule_id)
            .await?
            .filter(|s| s.gym_id == gym_id && s.coach_id == coach_id)
            .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))
    }

    /// Check the client's other enrollments on this weekday for overlaps.
    ///
    /// Scans every non-template schedule in the gym; the target slot itself
    /// is skipped (a client cannot conflict with the slot being joined).
    async fn check_enrollment_conflicts(
        &self,
        gym_id: &str,
        target_schedule_id: &str,
        day_of_week: u8,
        slot_index: usize,
        slot: &TimeSlot,
        client_id: &str,
    ) -> Result<(), AppError> {
        let schedules = self.db.list_schedules_for_gym(gym_id, Some(false)).await?;

        if let Some(conflicting) = find_client_conflict(
            &schedules,
            target_schedule_id,
            slot_index,
            day_of_week,
            slot,
            client_id,
        )? {
            return Err(AppError::BadRequest(format!(
                "Client already has a conflicting time slot from {} to {}",
                conflicting.start_time, conflicting.end_time
            )));
        }

        Ok(())
    }

    /// Enroll a client into a time slot.
    ///
    /// Rejects double-enrollment, time conflicts with the client's other
    /// enrollments on that weekday, and full slots. The slot mutation runs
    /// in a transaction so concurrent enrollments cannot both pass the
    /// capacity check. Successful enrollment into a template is mirrored,
    /// best-effort, into every active schedule derived from it.
    pub async fn enroll(
        &self,
        gym_id: &str,
        coach_id: &str,
        schedule_id: &str,
        request: &EnrollmentRequest,
    ) -> Result<WeeklySchedule, AppError> {
        let updated = self.enroll_core(gym_id, coach_id, schedule_id, request).await?;

        if updated.is_template {
            self.mirror_to_active_schedules(&updated, request, MirrorAction::Enroll)
                .await;
        }

        Ok(updated)
    }

    /// The non-mirroring half of [`Self::enroll`]; also what mirroring
    /// applies to each derived active schedule.
    async fn enroll_core(
        &self,
        gym_id: &str,
        coach_id: &str,
        schedule_id: &str,
        request: &EnrollmentRequest,
    ) -> Result<WeeklySchedule, AppError> {
        let schedule = self.load_schedule(gym_id, coach_id, schedule_id).await?;

        let slot = find_slot(&schedule, request.day_of_week, request.time_slot_index)?.clone();

        if slot.client_ids.iter().any(|c| c == &request.client_id) {
            return Err(AppError::BadRequest(
                "Client already enrolled in this time slot".to_string(),
            ));
        }

        self.check_enrollment_conflicts(
            gym_id,
            schedule_id,
            request.day_of_week,
            request.time_slot_index,
            &slot,
            &request.client_id,
        )
        .await?;

        let day_of_week = request.day_of_week;
        let slot_index = request.time_slot_index;
        let client_id = request.client_id.clone();
        let updated = self
            .db
            .mutate_schedule_atomic(schedule_id, move |schedule| {
                let slot = find_slot_mut(schedule, day_of_week, slot_index)?;
                apply_enrollment(slot, &client_id)?;
                schedule.updated_at = now_rfc3339();
                Ok(())
            })
            .await?;

        tracing::info!(
            schedule_id,
            client_id = %request.client_id,
            day_of_week = request.day_of_week,
            "Client enrolled"
        );

        Ok(updated)
    }

    /// Remove a client from a time slot.
    pub async fn unenroll(
        &self,
        gym_id: &str,
        coach_id: &str,
        schedule_id: &str,
        request: &EnrollmentRequest,
    ) -> Result<WeeklySchedule, AppError> {
        let updated = self
            .unenroll_core(gym_id, coach_id, schedule_id, request)
            .await?;

        if updated.is_template {
            self.mirror_to_active_schedules(&updated, request, MirrorAction::Unenroll)
                .await;
        }

        Ok(updated)
    }

    async fn unenroll_core(
        &self,
        gym_id: &str,
        coach_id: &str,
        schedule_id: &str,
        request: &EnrollmentRequest,
    ) -> Result<WeeklySchedule, AppError> {
        // Existence and scope check up front so callers get 404 before 400
        let _ = self.load_schedule(gym_id, coach_id, schedule_id).await?;

        let day_of_week = request.day_of_week;
        let slot_index = request.time_slot_index;
        let client_id = request.client_id.clone();
        let updated = self
            .db
            .mutate_schedule_atomic(schedule_id, move |schedule| {
                let slot = find_slot_mut(schedule, day_of_week, slot_index)?;
                apply_unenrollment(slot, &client_id)?;
                schedule.updated_at = now_rfc3339();
                Ok(())
            })
            .await?;

        tracing::info!(
            schedule_id,
            client_id = %request.client_id,
            day_of_week = request.day_of_week,
            "Client unenrolled"
        );

        Ok(updated)
    }

    /// Best-effort propagation of a template enrollment change to the
    /// active schedules materialized from it. Each target re-runs the
    /// capacity and conflict checks independently; failures are logged and
    /// swallowed so the primary operation stays committed.
    async fn mirror_to_active_schedules(
        &self,
        template: &WeeklySchedule,
        request: &EnrollmentRequest,
        action: MirrorAction,
    ) {
        let actives = match self.db.list_schedules_for_template(&template.id).await {
            Ok(actives) => actives,
            Err(err) => {
                tracing::warn!(
                    template_id = %template.id,
                    error = %err,
                    "Failed to list active schedules for enrollment mirroring"
                );
                return;
            }
        };

        for active in actives {
            let result = match action {
                MirrorAction::Enroll => {
                    self.enroll_core(&active.gym_id, &active.coach_id, &active.id, request)
                        .await
                }
                MirrorAction::Unenroll => {
                    self.unenroll_core(&active.gym_id, &active.coach_id, &active.id, request)
                        .await
                }
            };

            if let Err(err) = result {
                tracing::warn!(
                    template_id = %template.id,
                    schedule_id = %active.id,
                    client_id = %request.client_id,
                    error = %err,
                    "Enrollment mirroring to active schedule failed"
                );
            }
        }
    }

    /// Pairwise conflict report across a gym's active schedules.
    ///
    /// Slots are grouped by (location, weekday) and every pair in a group
    /// is compared. O(n²) per group, which is fine at the handful of slots
    /// a location hosts per day.
    pub async fn find_conflicts(
        &self,
        gym_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<Vec<ScheduleConflict>, AppError> {
        let schedules = filter_by_week(
            self.db.list_schedules_for_gym(gym_id, Some(false)).await?,
            date,
        );

        let mut coach_names: HashMap<String, String> = HashMap::new();
        for schedule in &schedules {
            if !coach_names.contains_key(&schedule.coach_id) {
                let name = self
                    .db
                    .get_user(&schedule.coach_id)
                    .await?
                    .map(|u| u.name)
                    .unwrap_or_else(|| "Unknown Coach".to_string());
                coach_names.insert(schedule.coach_id.clone(), name);
            }
        }

        // Group slots by (location, weekday)
        let mut groups: HashMap<(String, u8), Vec<(&WeeklySchedule, &TimeSlot)>> = HashMap::new();
        for schedule in &schedules {
            for day in &schedule.days {
                for slot in &day.time_slots {
                    groups
                        .entry((slot.location_id.clone(), day.day_of_week))
                        .or_default()
                        .push((schedule, slot));
                }
            }
        }

        let mut location_names: HashMap<String, String> = HashMap::new();
        let mut conflicts = Vec::new();

        for ((location_id, day_of_week), slots) in &groups {
            for i in 0..slots.len() {
                for j in (i + 1)..slots.len() {
                    let (schedule1, slot1) = slots[i];
                    let (schedule2, slot2) = slots[j];

                    if !slots_overlap(slot1, slot2)? {
                        continue;
                    }

                    if !location_names.contains_key(location_id) {
                        let name = self
                            .db
                            .get_location(location_id)
                            .await?
                            .map(|l| l.name)
                            .unwrap_or_else(|| "Unknown Location".to_string());
                        location_names.insert(location_id.clone(), name);
                    }

                    let (start1, end1) = slot_minutes(slot1)?;
                    let (start2, end2) = slot_minutes(slot2)?;

                    conflicts.push(ScheduleConflict {
                        location_id: location_id.clone(),
                        location_name: location_names[location_id].clone(),
                        day_of_week: *day_of_week,
                        day_name: DAY_NAMES[*day_of_week as usize % 7].to_string(),
                        conflict: ConflictPair {
                            schedule1: conflict_party(schedule1, slot1, &coach_names),
                            schedule2: conflict_party(schedule2, slot2, &coach_names),
                            overlap_period: OverlapPeriod {
                                start: if start1 > start2 {
                                    slot1.start_time.clone()
                                } else {
                                    slot2.start_time.clone()
                                },
                                end: if end1 < end2 {
                                    slot1.end_time.clone()
                                } else {
                                    slot2.end_time.clone()
                                },
                            },
                        },
                    });
                }
            }
        }

        Ok(conflicts)
    }

    /// Gym-wide overview of all slots, grouped per location per weekday.
    pub async fn overview(
        &self,
        gym_id: &str,
        is_template: Option<bool>,
        date: Option<NaiveDate>,
    ) -> Result<ScheduleOverview, AppError> {
        let schedules = self.db.list_schedules_for_gym(gym_id, is_template).await?;
        // Date filtering only makes sense for active schedules
        let schedules = if is_template == Some(false) {
            filter_by_week(schedules, date)
        } else {
            schedules
        };

        let mut overview = ScheduleOverview {
            locations: HashMap::new(),
            coaches: HashMap::new(),
            summary: OverviewSummary {
                total_schedules: schedules.len(),
                ..OverviewSummary::default()
            },
        };

        for location in self.db.list_locations_for_gym(gym_id).await? {
            overview.locations.insert(
                location.id.clone(),
                LocationOverview {
                    id: location.id,
                    name: location.name,
                    address: location.address,
                    days: (0..7)
                        .map(|day_of_week| OverviewDay {
                            day_of_week,
                            time_slots: Vec::new(),
                        })
                        .collect(),
                },
            );
        }

        for schedule in &schedules {
            let coach = self.db.get_user(&schedule.coach_id).await?;
            let coach_name = coach
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Unknown Coach".to_string());

            let coach_entry = overview
                .coaches
                .entry(schedule.coach_id.clone())
                .or_insert_with(|| CoachOverview {
                    id: schedule.coach_id.clone(),
                    name: coach_name.clone(),
                    email: coach.as_ref().map(|c| c.email.clone()).unwrap_or_default(),
                    schedule_count: 0,
                    total_time_slots: 0,
                });
            coach_entry.schedule_count += 1;

            for day in &schedule.days {
                for slot in &day.time_slots {
                    let Some(location) = overview.locations.get_mut(&slot.location_id) else {
                        continue;
                    };
                    let Some(overview_day) = location.days.get_mut(day.day_of_week as usize)
                    else {
                        continue;
                    };

                    overview_day.time_slots.push(OverviewSlot {
                        start_time: slot.start_time.clone(),
                        end_time: slot.end_time.clone(),
                        max_capacity: slot.max_capacity,
                        client_ids: slot.client_ids.clone(),
                        enrolled_count: slot.client_ids.len(),
                        available_spots: slot.max_capacity as i64 - slot.client_ids.len() as i64,
                        notes: slot.notes.clone(),
                        activity_type: slot.activity_type.clone(),
                        schedule_id: schedule.id.clone(),
                        schedule_name: schedule.name.clone(),
                        coach_id: schedule.coach_id.clone(),
                        coach_name: coach_name.clone(),
                        is_template: schedule.is_template,
                    });

                    overview.summary.total_time_slots += 1;
                    overview.summary.total_enrollments += slot.client_ids.len();
                    if let Some(entry) = overview.coaches.get_mut(&schedule.coach_id) {
                        entry.total_time_slots += 1;
                    }
                }
            }
        }

        // Sort slots by start time within each day
        for location in overview.locations.values_mut() {
            for day in &mut location.days {
                day.time_slots
                    .sort_by(|a, b| a.start_time.cmp(&b.start_time));
            }
        }

        Ok(overview)
    }

    /// Materialize an active schedule from a template for a concrete week.
    ///
    /// Days are deep-copied including enrollment state: the template's
    /// client lists seed the live week.
    pub async fn materialize(
        &self,
        gym_id: &str,
        coach_id: &str,
        template_id: &str,
        week_start_date: NaiveDate,
    ) -> Result<WeeklySchedule, AppError> {
        let template = self.load_schedule(gym_id, coach_id, template_id).await?;
        if !template.is_template {
            return Err(AppError::BadRequest(
                "Schedule is not a template".to_string(),
            ));
        }

        let now = now_rfc3339();
        let active = WeeklySchedule {
            id: uuid::Uuid::new_v4().to_string(),
            gym_id: template.gym_id.clone(),
            coach_id: template.coach_id.clone(),
            name: template.name.clone(),
            description: template.description.clone(),
            days: template.days.clone(),
            is_template: false,
            template_id: Some(template.id.clone()),
            week_start_date: Some(week_start_date),
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.upsert_schedule(&active).await?;

        tracing::info!(
            template_id,
            schedule_id = %active.id,
            week_start_date = %week_start_date,
            "Active schedule materialized from template"
        );

        Ok(active)
    }

    /// Reset an active schedule back to its template's state, optionally
    /// moving it to a new week.
    pub async fn rollover(
        &self,
        gym_id: &str,
        coach_id: &str,
        schedule_id: &str,
        week_start_date: Option<NaiveDate>,
    ) -> Result<WeeklySchedule, AppError> {
        let mut schedule = self.load_schedule(gym_id, coach_id, schedule_id).await?;
        if schedule.is_template {
            return Err(AppError::BadRequest(
                "Cannot roll over a template".to_string(),
            ));
        }

        let template_id = schedule.template_id.clone().ok_or_else(|| {
            AppError::BadRequest("Schedule has no originating template".to_string())
        })?;

        let template = self
            .db
            .get_schedule(&template_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Originating template not found".to_string()))?;

        schedule.days = template.days.clone();
        if let Some(date) = week_start_date {
            schedule.week_start_date = Some(date);
        }
        schedule.updated_at = now_rfc3339();

        self.db.upsert_schedule(&schedule).await?;

        tracing::info!(
            schedule_id,
            template_id = %template_id,
            "Active schedule rolled over to template state"
        );

        Ok(schedule)
    }
}

#[derive(Clone, Copy)]
enum MirrorAction {
    Enroll,
    Unenroll,
}

fn conflict_party(
    schedule: &WeeklySchedule,
    slot: &TimeSlot,
    coach_names: &HashMap<String, String>,
) -> ConflictParty {
    ConflictParty {
        id: schedule.id.clone(),
        name: schedule.name.clone(),
        coach_id: schedule.coach_id.clone(),
        coach_name: coach_names
            .get(&schedule.coach_id)
            .cloned()
            .unwrap_or_else(|| "Unknown Coach".to_string()),
        time_slot: format!("{} - {}", slot.start_time, slot.end_time),
    }
}

fn find_slot<'a>(
    schedule: &'a WeeklySchedule,
    day_of_week: u8,
    slot_index: usize,
) -> Result<&'a TimeSlot, AppError> {
    schedule
        .day(day_of_week)
        .and_then(|d| d.time_slots.get(slot_index))
        .ok_or_else(|| AppError::BadRequest("Invalid day or time slot".to_string()))
}

fn find_slot_mut<'a>(
    schedule: &'a mut WeeklySchedule,
    day_of_week: u8,
    slot_index: usize,
) -> Result<&'a mut TimeSlot, AppError> {
    schedule
        .day_mut(day_of_week)
        .and_then(|d| d.time_slots.get_mut(slot_index))
        .ok_or_else(|| AppError::BadRequest("Invalid day or time slot".to_string()))
}

/// In-memory pairwise conflict scan over (schedule name, slot) groups.
///
/// Exposed for benchmarking; [`SchedulingEngine::find_conflicts`] is the
/// database-backed wrapper.
pub fn count_overlapping_pairs(slots: &[(u32, u32)]) -> usize {
    let mut count = 0;
    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            if ranges_overlap(slots[i].0, slots[i].1, slots[j].0, slots[j].1) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: &str, end: &str, capacity: u32, clients: &[&str]) -> TimeSlot {
        TimeSlot {
            start_time: start.to_string(),
            end_time: end.to_string(),
            max_capacity: capacity,
            client_ids: clients.iter().map(|c| c.to_string()).collect(),
            location_id: "loc-1".to_string(),
            activity_type: None,
            notes: None,
        }
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let cases = [
            (("09:00", "10:00"), ("09:30", "10:30")),
            (("09:00", "10:00"), ("10:00", "11:00")),
            (("06:00", "07:00"), ("18:00", "19:00")),
            (("09:00", "12:00"), ("10:00", "11:00")),
        ];
        for (a, b) in cases {
            let sa = slot(a.0, a.1, 1, &[]);
            let sb = slot(b.0, b.1, 1, &[]);
            assert_eq!(
                slots_overlap(&sa, &sb).unwrap(),
                slots_overlap(&sb, &sa).unwrap(),
                "overlap must be symmetric for {a:?} vs {b:?}"
            );
        }
    }

    #[test]
    fn test_back_to_back_slots_do_not_overlap() {
        let a = slot("09:00", "10:00", 1, &[]);
        let b = slot("10:00", "11:00", 1, &[]);
        assert!(!slots_overlap(&a, &b).unwrap());
    }

    #[test]
    fn test_partial_overlap_detected() {
        let a = slot("09:00", "10:00", 1, &[]);
        let b = slot("09:30", "10:30", 1, &[]);
        assert!(slots_overlap(&a, &b).unwrap());
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = slot("09:00", "12:00", 1, &[]);
        let inner = slot("10:00", "10:30", 1, &[]);
        assert!(slots_overlap(&outer, &inner).unwrap());
    }

    #[test]
    fn test_corrupt_slot_time_is_integrity_error() {
        let a = slot("9am", "10:00", 1, &[]);
        let b = slot("09:30", "10:30", 1, &[]);
        assert!(matches!(
            slots_overlap(&a, &b),
            Err(AppError::DataIntegrity(_))
        ));
    }

    #[test]
    fn test_week_bounds_sunday_based() {
        // 2026-08-05 is a Wednesday
        let (start, end) = week_bounds(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 2).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 8, 8).unwrap());
    }

    #[test]
    fn test_count_overlapping_pairs() {
        // Three slots: 9-10 and 9:30-10:30 overlap; 10:30-11 is clear
        let slots = [(540, 600), (570, 630), (630, 660)];
        assert_eq!(count_overlapping_pairs(&slots), 1);
    }
}
