//! Benchmark templates and per-client benchmark records.
//!
//! A benchmark template names a measurable thing ("Back Squat 1RM", "2km
//! Row"); clients record values against templates. The `Lift`/`Other`
//! split is a tagged union on `type`, matching the stored discriminator.

use serde::{Deserialize, Serialize};

/// Discriminator for what kind of value a benchmark template expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchmarkType {
    Lift,
    Other,
}

/// A named benchmark definition, shared across gyms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkTemplate {
    /// Document ID (UUID v4)
    pub id: String,
    pub name: String,
    pub notes: Option<String>,
    pub benchmark_type: BenchmarkType,
    pub created_at: String,
}

/// The variant payload of a recorded benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BenchmarkMeasurement {
    /// A lift result in weight units; used for percent-of-max loads.
    Lift { weight: f64 },
    /// Anything else (time, distance, reps...), value plus free-form unit.
    Other {
        value: Option<f64>,
        unit: Option<String>,
        measurement_notes: Option<String>,
    },
}

impl BenchmarkMeasurement {
    /// Weight for load calculations; only lifts carry one.
    pub fn lift_weight(&self) -> Option<f64> {
        match self {
            BenchmarkMeasurement::Lift { weight } => Some(*weight),
            BenchmarkMeasurement::Other { .. } => None,
        }
    }
}

/// A benchmark recorded for a client, embedded in the client document.
///
/// The latest record per template lives in `current_benchmarks`; superseded
/// records are appended to `historical_benchmarks` and never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub name: String,
    pub notes: Option<String>,
    pub benchmark_template_id: String,
    /// When the value was recorded (RFC3339)
    pub recorded_at: String,
    #[serde(flatten)]
    pub measurement: BenchmarkMeasurement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_discriminator_round_trip() {
        let lift = BenchmarkMeasurement::Lift { weight: 142.5 };
        let json = serde_json::to_value(&lift).unwrap();
        assert_eq!(json["type"], "Lift");

        let other = BenchmarkMeasurement::Other {
            value: Some(480.0),
            unit: Some("seconds".to_string()),
            measurement_notes: None,
        };
        let json = serde_json::to_value(&other).unwrap();
        assert_eq!(json["type"], "Other");
        let back: BenchmarkMeasurement = serde_json::from_value(json).unwrap();
        assert_eq!(back.lift_weight(), None);
    }

    #[test]
    fn test_lift_weight_only_for_lifts() {
        assert_eq!(
            BenchmarkMeasurement::Lift { weight: 100.0 }.lift_weight(),
            Some(100.0)
        );
    }
}
