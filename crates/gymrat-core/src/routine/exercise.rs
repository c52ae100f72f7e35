use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum length of an exercise name.
pub const EXERCISE_NAME_MAX: usize = 50;

/// How a single set of an exercise is quantified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExerciseKind {
    /// Performed for a number of repetitions.
    Reps { count: u32 },
    /// Performed for a number of seconds; arms the countdown automatically.
    Timed { seconds: u32 },
}

impl ExerciseKind {
    /// Seconds to arm the countdown with, if this is a timed exercise.
    pub fn duration_secs(self) -> Option<u32> {
        match self {
            ExerciseKind::Timed { seconds } => Some(seconds),
            ExerciseKind::Reps { .. } => None,
        }
    }

    pub fn reps(self) -> Option<u32> {
        match self {
            ExerciseKind::Reps { count } => Some(count),
            ExerciseKind::Timed { .. } => None,
        }
    }
}

/// One movement within a routine.
///
/// Fields are private: an `Exercise` can only be built through
/// [`Exercise::new`] or [`Exercise::try_from`], both of which validate.
/// Serializes in the REST payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExercisePayload", into = "ExercisePayload")]
pub struct Exercise {
    id: Uuid,
    name: String,
    sets: u32,
    kind: ExerciseKind,
}

impl Exercise {
    /// Build a new exercise with a fresh id.
    pub fn new(name: impl Into<String>, sets: u32, kind: ExerciseKind) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), name, sets, kind)
    }

    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        sets: u32,
        kind: ExerciseKind,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        if sets < 1 {
            return Err(ValidationError::TooSmall { field: "Sets", min: 1 });
        }
        match kind {
            ExerciseKind::Reps { count } if count < 1 => {
                return Err(ValidationError::TooSmall { field: "Reps", min: 1 });
            }
            ExerciseKind::Timed { seconds } if seconds < 1 => {
                return Err(ValidationError::TooSmall { field: "Duration", min: 1 });
            }
            _ => {}
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            sets,
            kind,
        })
    }

    /// Shorthand for a rep-based exercise.
    pub fn reps(name: impl Into<String>, sets: u32, reps: u32) -> Result<Self, ValidationError> {
        Self::new(name, sets, ExerciseKind::Reps { count: reps })
    }

    /// Shorthand for a timed exercise.
    pub fn timed(name: impl Into<String>, sets: u32, seconds: u32) -> Result<Self, ValidationError> {
        Self::new(name, sets, ExerciseKind::Timed { seconds })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sets(&self) -> u32 {
        self.sets
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    /// Seconds of work across all sets, zero for rep-based exercises.
    pub fn timed_secs_total(&self) -> u64 {
        self.kind
            .duration_secs()
            .map(|s| u64::from(s) * u64::from(self.sets))
            .unwrap_or(0)
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "Exercise name" });
    }
    if trimmed.chars().count() > EXERCISE_NAME_MAX {
        return Err(ValidationError::TooLong {
            field: "Name",
            max: EXERCISE_NAME_MAX,
        });
    }
    Ok(())
}

/// Exercise as served by the REST API: reps and duration are both optional
/// and only one of them may be populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExercisePayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl TryFrom<ExercisePayload> for Exercise {
    type Error = ValidationError;

    fn try_from(payload: ExercisePayload) -> Result<Self, Self::Error> {
        let has_reps = payload.reps.is_some_and(|r| r > 0);
        let has_duration = payload.duration.is_some_and(|d| d > 0);
        let kind = match (payload.reps, payload.duration) {
            (Some(count), None) => ExerciseKind::Reps { count },
            (None, Some(seconds)) => ExerciseKind::Timed { seconds },
            // A zero on one side is the form's "unused" value.
            (Some(count), Some(_)) if has_reps && !has_duration => ExerciseKind::Reps { count },
            (Some(_), Some(seconds)) if has_duration && !has_reps => ExerciseKind::Timed { seconds },
            (Some(_), Some(_)) if has_reps && has_duration => {
                return Err(ValidationError::AmbiguousQuantity)
            }
            _ => return Err(ValidationError::MissingQuantity),
        };
        let sets = payload.sets.unwrap_or(0);
        match payload.id {
            Some(id) => Exercise::with_id(id, payload.name, sets, kind),
            None => Exercise::new(payload.name, sets, kind),
        }
    }
}

impl From<Exercise> for ExercisePayload {
    fn from(exercise: Exercise) -> Self {
        Self {
            id: Some(exercise.id),
            reps: exercise.kind.reps(),
            duration: exercise.kind.duration_secs(),
            sets: Some(exercise.sets),
            name: exercise.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        let err = Exercise::reps("   ", 3, 10).unwrap_err();
        assert_eq!(err, ValidationError::Required { field: "Exercise name" });
    }

    #[test]
    fn rejects_long_name() {
        let name = "x".repeat(EXERCISE_NAME_MAX + 1);
        assert!(matches!(
            Exercise::reps(name, 3, 10),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn rejects_zero_sets_and_quantities() {
        assert!(Exercise::reps("Squat", 0, 10).is_err());
        assert!(Exercise::reps("Squat", 3, 0).is_err());
        assert!(Exercise::timed("Plank", 3, 0).is_err());
    }

    #[test]
    fn payload_with_reps_only() {
        let payload = ExercisePayload {
            name: "Push-up".into(),
            sets: Some(3),
            reps: Some(12),
            ..Default::default()
        };
        let exercise = Exercise::try_from(payload).unwrap();
        assert_eq!(exercise.kind(), ExerciseKind::Reps { count: 12 });
        assert_eq!(exercise.sets(), 3);
    }

    #[test]
    fn payload_zero_side_is_ignored() {
        let payload = ExercisePayload {
            name: "Plank".into(),
            sets: Some(2),
            reps: Some(0),
            duration: Some(45),
            ..Default::default()
        };
        let exercise = Exercise::try_from(payload).unwrap();
        assert_eq!(exercise.kind(), ExerciseKind::Timed { seconds: 45 });
    }

    #[test]
    fn payload_with_both_or_neither_is_rejected() {
        let both = ExercisePayload {
            name: "Odd".into(),
            sets: Some(1),
            reps: Some(5),
            duration: Some(30),
            ..Default::default()
        };
        assert_eq!(
            Exercise::try_from(both).unwrap_err(),
            ValidationError::AmbiguousQuantity
        );

        let neither = ExercisePayload {
            name: "Odd".into(),
            sets: Some(1),
            ..Default::default()
        };
        assert_eq!(
            Exercise::try_from(neither).unwrap_err(),
            ValidationError::MissingQuantity
        );
    }

    #[test]
    fn payload_without_sets_is_rejected() {
        let payload = ExercisePayload {
            name: "Row".into(),
            reps: Some(8),
            ..Default::default()
        };
        assert_eq!(
            Exercise::try_from(payload).unwrap_err(),
            ValidationError::TooSmall { field: "Sets", min: 1 }
        );
    }

    #[test]
    fn serializes_in_payload_shape() {
        let exercise = Exercise::timed("Plank", 2, 30).unwrap();
        let json = serde_json::to_value(&exercise).unwrap();
        assert_eq!(json["duration"], 30);
        assert!(json["reps"].is_null());

        let back: Exercise = serde_json::from_value(json).unwrap();
        assert_eq!(back, exercise);
    }

    #[test]
    fn deserializing_validates() {
        let json = serde_json::json!({ "name": "Bad", "sets": 0, "reps": 5 });
        assert!(serde_json::from_value::<Exercise>(json).is_err());
    }

    #[test]
    fn timed_total_counts_all_sets() {
        let plank = Exercise::timed("Plank", 3, 40).unwrap();
        assert_eq!(plank.timed_secs_total(), 120);
        let squat = Exercise::reps("Squat", 3, 10).unwrap();
        assert_eq!(squat.timed_secs_total(), 0);
    }
}
