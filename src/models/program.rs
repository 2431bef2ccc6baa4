// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training program model: an ordered block → week → day hierarchy where
//! each day holds the concrete activities.
//!
//! Programs exist in two flavors sharing one shape: gym-owned templates
//! (`is_template = true`) and client-specific assigned copies linking back
//! to their template.

use serde::{Deserialize, Serialize};

/// A training program document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Document ID (UUID v4)
    pub id: String,
    pub gym_id: String,
    pub name: String,
    pub blocks: Vec<Block>,
    pub is_template: bool,
    /// For assigned copies, the template they were created from
    pub template_id: Option<String>,
    /// For assigned copies, the client they belong to
    pub client_id: Option<String>,
    /// User ID of the creator
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A multi-week training block. Invariant: at least one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub weeks: Vec<Week>,
}

/// One week of a block. Invariant: at least one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    pub id: String,
    pub days: Vec<Day>,
}

/// The leaf level: a training day with its activity lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Day {
    pub id: String,
    #[serde(default)]
    pub primary_lift_activities: Vec<LiftActivity>,
    #[serde(default)]
    pub accessory_lift_activities: Vec<LiftActivity>,
    #[serde(default)]
    pub other_activities: Vec<OtherActivity>,
}

/// A programmed lift: load expressed as a percentage of a benchmarked max.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiftActivity {
    pub id: String,
    pub name: String,
    pub notes: Option<String>,
    /// Either a fraction (0.825) or a whole-number percentage (82.5)
    pub percent_of_max: f64,
    pub sets: u32,
    pub repetitions: u32,
    /// Benchmark template whose recorded max drives the working weight
    pub benchmark_template_id: Option<String>,
}

/// A non-lift activity (conditioning, mobility, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherActivity {
    pub id: String,
    pub name: String,
    pub notes: Option<String>,
    pub measurement_notes: Option<String>,
}

/// Borrowed view over any activity of a day, tagged by kind.
///
/// The three day-level lists replace the upstream schema-inheritance
/// hierarchy; this union is what the sites that branch on activity kind
/// (weight calculation, validation) match on, exhaustively.
#[derive(Debug, Clone, Copy)]
pub enum ActivityRef<'a> {
    PrimaryLift(&'a LiftActivity),
    AccessoryLift(&'a LiftActivity),
    Other(&'a OtherActivity),
}

impl<'a> ActivityRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            ActivityRef::PrimaryLift(a) | ActivityRef::AccessoryLift(a) => &a.id,
            ActivityRef::Other(a) => &a.id,
        }
    }
}

impl Day {
    /// All activities of the day in workout order: primary lifts, then
    /// accessory lifts, then everything else.
    pub fn activities(&self) -> Vec<ActivityRef<'_>> {
        self.primary_lift_activities
            .iter()
            .map(ActivityRef::PrimaryLift)
            .chain(
                self.accessory_lift_activities
                    .iter()
                    .map(ActivityRef::AccessoryLift),
            )
            .chain(self.other_activities.iter().map(ActivityRef::Other))
            .collect()
    }
}

impl Program {
    /// Week count per block, the "shape" the progression engine walks.
    pub fn week_counts(&self) -> Vec<usize> {
        self.blocks.iter().map(|b| b.weeks.len()).collect()
    }

    /// Structural validation for create/update payload contents.
    pub fn validate_structure(name: &str, blocks: &[Block]) -> Vec<String> {
        let mut errors = Vec::new();

        if name.trim().is_empty() || name.len() > 200 {
            errors.push("Name must be between 1 and 200 characters".to_string());
        }

        for (bi, block) in blocks.iter().enumerate() {
            if block.weeks.is_empty() {
                errors.push(format!("Block {bi} must have at least one week"));
            }
            for (wi, week) in block.weeks.iter().enumerate() {
                if week.days.is_empty() {
                    errors.push(format!("Block {bi} week {wi} must have at least one day"));
                }
                for day in &week.days {
                    for activity in day.activities() {
                        match activity {
                            ActivityRef::PrimaryLift(a) | ActivityRef::AccessoryLift(a) => {
                                if a.percent_of_max < 0.0 || a.percent_of_max > 100.0 {
                                    errors.push(format!(
                                        "Activity '{}': percent of max must be between 0 and 100",
                                        a.name
                                    ));
                                }
                                if a.sets < 1 {
                                    errors.push(format!(
                                        "Activity '{}': sets must be at least 1",
                                        a.name
                                    ));
                                }
                                if a.repetitions < 1 {
                                    errors.push(format!(
                                        "Activity '{}': repetitions must be at least 1",
                                        a.name
                                    ));
                                }
                            }
                            ActivityRef::Other(a) => {
                                if a.name.trim().is_empty() {
                                    errors.push("Activity name is required".to_string());
                                }
                            }
                        }
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

    fn lift(id: &str, percent: f64) -> LiftActivity {
        LiftActivity {
            id: id.to_string(),
            name: format!("lift-{id}"),
            notes: None,
            percent_of_max: percent,
            sets: 3,
            repetitions: 5,
            benchmark_template_id: None,
        }
    }

    fn day_with(primary: Vec<LiftActivity>) -> Day {
        Day {
            id: "d1".to_string(),
            primary_lift_activities: primary,
            accessory_lift_activities: vec![],
            other_activities: vec![],
        }
    }

    #[test]
    fn test_week_counts() {
        let program = Program {
            id: "p".to_string(),
            gym_id: "g".to_string(),
            name: "Strength".to_string(),
            blocks: vec![
                Block {
                    id: "b1".to_string(),
                    weeks: vec![
                        Week {
                            id: "w1".to_string(),
                            days: vec![day_with(vec![])],
                        },
                        Week {
                            id: "w2".to_string(),
                            days: vec![day_with(vec![])],
                        },
                    ],
                },
                Block {
                    id: "b2".to_string(),
                    weeks: vec![Week {
                        id: "w3".to_string(),
                        days: vec![day_with(vec![])],
                    }],
                },
            ],
            is_template: true,
            template_id: None,
            client_id: None,
            created_by: "u".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        };

        assert_eq!(program.week_counts(), vec![2, 1]);
    }

    #[test]
    fn test_day_activity_order() {
        let day = Day {
            id: "d".to_string(),
            primary_lift_activities: vec![lift("p1", 80.0)],
            accessory_lift_activities: vec![lift("a1", 60.0)],
            other_activities: vec![OtherActivity {
                id: "o1".to_string(),
                name: "Row".to_string(),
                notes: None,
                measurement_notes: None,
            }],
        };

        let ids: Vec<&str> = day.activities().iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["p1", "a1", "o1"]);
    }

    #[test]
    fn test_validate_structure_rejects_empty_week_list() {
        let blocks = vec![Block {
            id: "b".to_string(),
            weeks: vec![],
        }];
        let errors = Program::validate_structure("Test", &blocks);
        assert!(errors.iter().any(|e| e.contains("at least one week")));
    }

    #[test]
    fn test_validate_structure_rejects_bad_percent() {
        let blocks = vec![Block {
            id: "b".to_string(),
            weeks: vec![Week {
                id: "w".to_string(),
                days: vec![day_with(vec![lift("x", 140.0)])],
            }],
        }];
        let errors = Program::validate_structure("Test", &blocks);
        assert!(errors.iter().any(|e| e.contains("percent of max")));
    }
}
