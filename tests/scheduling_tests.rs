// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Enrollment rule tests: capacity, double-enrollment, and cross-schedule
//! time conflicts, exercised without a database.

use gym_tracker::models::{ScheduleDay, TimeSlot, WeeklySchedule};
use gym_tracker::services::scheduling::{
    apply_enrollment, apply_unenrollment, find_client_conflict,
};

fn slot(start: &str, end: &str, capacity: u32, clients: &[&str]) -> TimeSlot {
    TimeSlot {
        start_time: start.to_string(),
        end_time: end.to_string(),
        max_capacity: capacity,
        client_ids: clients.iter().map(|c| c.to_string()).collect(),
        location_id: "main-floor".to_string(),
        activity_type: None,
        notes: None,
    }
}

fn schedule(id: &str, day_of_week: u8, slots: Vec<TimeSlot>) -> WeeklySchedule {
    WeeklySchedule {
        id: id.to_string(),
        gym_id: "gym-1".to_string(),
        coach_id: "coach-1".to_string(),
        name: format!("Schedule {id}"),
        description: None,
        days: vec![ScheduleDay {
            day_of_week,
            time_slots: slots,
        }],
        is_template: false,
        template_id: None,
        week_start_date: None,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

#[test]
fn test_capacity_limit_enforced() {
    let mut slot = slot("09:00", "10:00", 1, &[]);

    apply_enrollment(&mut slot, "client-x").unwrap();
    let err = apply_enrollment(&mut slot, "client-y").unwrap_err();

    assert!(err.to_string().contains("maximum capacity"));
    assert_eq!(slot.client_ids, vec!["client-x"]);
}

#[test]
fn test_double_enrollment_is_an_error_not_a_noop() {
    let mut slot = slot("09:00", "10:00", 10, &["client-x"]);

    let err = apply_enrollment(&mut slot, "client-x").unwrap_err();

    assert!(err.to_string().contains("already enrolled"));
    assert_eq!(slot.client_ids.len(), 1);
}

#[test]
fn test_unenroll_absent_client_is_an_error() {
    let mut slot = slot("09:00", "10:00", 10, &["client-x"]);

    assert!(apply_unenrollment(&mut slot, "client-y").is_err());
    apply_unenrollment(&mut slot, "client-x").unwrap();
    assert!(slot.client_ids.is_empty());
}

#[test]
fn test_enrollment_respects_capacity_invariant() {
    let mut slot = slot("06:00", "07:00", 3, &[]);

    for i in 0..5 {
        let _ = apply_enrollment(&mut slot, &format!("client-{i}"));
        assert!(slot.client_ids.len() <= slot.max_capacity as usize);
    }
    assert_eq!(slot.client_ids.len(), 3);
}

#[test]
fn test_overlapping_slot_on_other_schedule_conflicts() {
    // Client enrolled Monday 09:00-10:00 at schedule A; enrolling the same
    // client Monday 09:30-10:30 at schedule B must cite the 09:00 slot.
    let schedules = vec![
        schedule("a", 1, vec![slot("09:00", "10:00", 10, &["client-x"])]),
        schedule("b", 1, vec![slot("09:30", "10:30", 10, &[])]),
    ];

    let candidate = slot("09:30", "10:30", 10, &[]);
    let conflict = find_client_conflict(&schedules, "b", 0, 1, &candidate, "client-x")
        .unwrap()
        .expect("overlap must be detected");

    assert_eq!(conflict.start_time, "09:00");
    assert_eq!(conflict.end_time, "10:00");
}

#[test]
fn test_back_to_back_enrollment_allowed() {
    let schedules = vec![
        schedule("a", 1, vec![slot("09:00", "10:00", 10, &["client-x"])]),
        schedule("b", 1, vec![slot("10:00", "11:00", 10, &[])]),
    ];

    let candidate = slot("10:00", "11:00", 10, &[]);
    let conflict =
        find_client_conflict(&schedules, "b", 0, 1, &candidate, "client-x").unwrap();

    assert!(conflict.is_none());
}

#[test]
fn test_same_times_on_different_weekday_do_not_conflict() {
    let schedules = vec![
        schedule("a", 1, vec![slot("09:00", "10:00", 10, &["client-x"])]),
        schedule("b", 2, vec![slot("09:00", "10:00", 10, &[])]),
    ];

    let candidate = slot("09:00", "10:00", 10, &[]);
    let conflict =
        find_client_conflict(&schedules, "b", 0, 2, &candidate, "client-x").unwrap();

    assert!(conflict.is_none());
}

#[test]
fn test_other_clients_enrollments_do_not_conflict() {
    let schedules = vec![schedule(
        "a",
        1,
        vec![slot("09:00", "10:00", 10, &["someone-else"])],
    )];

    let candidate = slot("09:30", "10:30", 10, &[]);
    let conflict =
        find_client_conflict(&schedules, "b", 0, 1, &candidate, "client-x").unwrap();

    assert!(conflict.is_none());
}

#[test]
fn test_conflict_within_same_schedule_other_slot() {
    // The scan covers other slots of the target schedule too
    let schedules = vec![schedule(
        "a",
        1,
        vec![
            slot("09:00", "10:00", 10, &["client-x"]),
            slot("09:30", "10:30", 10, &[]),
        ],
    )];

    let candidate = slot("09:30", "10:30", 10, &[]);
    let conflict = find_client_conflict(&schedules, "a", 1, 1, &candidate, "client-x").unwrap();

    assert!(conflict.is_some());
}

#[test]
fn test_target_slot_itself_is_skipped() {
    let schedules = vec![schedule(
        "a",
        1,
        vec![slot("09:00", "10:00", 10, &["client-x"])],
    )];

    // Checking against the exact slot being mutated must not self-conflict
    let candidate = slot("09:00", "10:00", 10, &["client-x"]);
    let conflict = find_client_conflict(&schedules, "a", 0, 1, &candidate, "client-x").unwrap();

    assert!(conflict.is_none());
}
