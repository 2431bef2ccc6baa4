// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly schedule model: a coach's recurring weekly pattern of time slots.
//!
//! A schedule is either a template (reusable pattern, no calendar week) or
//! an active instance pinned to a `week_start_date`, optionally linked back
//! to the template it was materialized from.

use crate::time_utils::parse_slot_minutes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One bookable class slot within a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    /// "HH:MM", 24-hour
    pub start_time: String,
    /// "HH:MM", strictly after `start_time` within the same day
    pub end_time: String,
    pub max_capacity: u32,
    /// Enrolled clients; mutated only by enroll/unenroll
    #[serde(default)]
    pub client_ids: Vec<String>,
    /// Where the class happens
    pub location_id: String,
    pub activity_type: Option<String>,
    pub notes: Option<String>,
}

/// The slots of one weekday (0 = Sunday .. 6 = Saturday).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDay {
    pub day_of_week: u8,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

/// Weekly schedule document, owned by a coach within a gym.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    /// Document ID (UUID v4)
    pub id: String,
    pub gym_id: String,
    pub coach_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
    pub is_template: bool,
    /// For active instances, the template they were materialized from
    pub template_id: Option<String>,
    /// First calendar day of the week this instance covers (active only)
    pub week_start_date: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

impl WeeklySchedule {
    /// Day entry for a weekday, if the schedule has one.
    pub fn day(&self, day_of_week: u8) -> Option<&ScheduleDay> {
        self.days.iter().find(|d| d.day_of_week == day_of_week)
    }

    pub fn day_mut(&mut self, day_of_week: u8) -> Option<&mut ScheduleDay> {
        self.days.iter_mut().find(|d| d.day_of_week == day_of_week)
    }

    /// Validate day and slot contents for create/update payloads.
    ///
    /// Collects every violation so the API can return them joined in one
    /// message, the way the frontend expects.
    pub fn validate_days(days: &[ScheduleDay]) -> Vec<String> {
        let mut errors = Vec::new();

        for day in days {
            if day.day_of_week > 6 {
                errors.push(format!(
                    "Day of week must be between 0 and 6, got {}",
                    day.day_of_week
                ));
                continue;
            }

            for slot in &day.time_slots {
                if slot.location_id.trim().is_empty() {
                    errors.push("All time slots must have a location specified".to_string());
                }
                if slot.max_capacity < 1 {
                    errors.push(format!(
                        "Max capacity must be at least 1 for time slot {}-{}",
                        slot.start_time, slot.end_time
                    ));
                }

                match (
                    parse_slot_minutes(&slot.start_time),
                    parse_slot_minutes(&slot.end_time),
                ) {
                    (Some(start), Some(end)) => {
                        if end <= start {
                            errors.push(format!(
                                "End time must be after start time for time slot {}-{} on day {}",
                                slot.start_time, slot.end_time, day.day_of_week
                            ));
                        }
                    }
                    _ => {
                        errors.push(format!(
                            "Time slot {}-{} must use HH:MM format",
                            slot.start_time, slot.end_time
                        ));
                    }
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            start_time: start.to_string(),
            end_time: end.to_string(),
            max_capacity: 10,
            client_ids: vec![],
            location_id: "loc-1".to_string(),
            activity_type: None,
            notes: None,
        }
    }

    #[test]
    fn test_validate_days_accepts_well_formed() {
        let days = vec![ScheduleDay {
            day_of_week: 1,
            time_slots: vec![slot("09:00", "10:00"), slot("10:00", "11:00")],
        }];
        assert!(WeeklySchedule::validate_days(&days).is_empty());
    }

    #[test]
    fn test_validate_days_rejects_inverted_times() {
        let days = vec![ScheduleDay {
            day_of_week: 1,
            time_slots: vec![slot("10:00", "09:00")],
        }];
        let errors = WeeklySchedule::validate_days(&days);
        assert!(errors.iter().any(|e| e.contains("after start time")));
    }

    #[test]
    fn test_validate_days_rejects_zero_length_slot() {
        let days = vec![ScheduleDay {
            day_of_week: 2,
            time_slots: vec![slot("09:00", "09:00")],
        }];
        assert!(!WeeklySchedule::validate_days(&days).is_empty());
    }

    #[test]
    fn test_validate_days_rejects_bad_day_and_missing_location() {
        let mut bad_slot = slot("09:00", "10:00");
        bad_slot.location_id = String::new();

        let days = vec![
            ScheduleDay {
                day_of_week: 7,
                time_slots: vec![],
            },
            ScheduleDay {
                day_of_week: 3,
                time_slots: vec![bad_slot],
            },
        ];
        let errors = WeeklySchedule::validate_days(&days);
        assert_eq!(errors.len(), 2);
    }
}
