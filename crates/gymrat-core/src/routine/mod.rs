//! Routines and exercises.
//!
//! Routines are owned by the remote API; this module holds the validated
//! domain types, the wire payload shapes, and the [`RoutineSource`] seam the
//! workout flow fetches them through.

mod exercise;
mod source;

pub use exercise::{Exercise, ExerciseKind, ExercisePayload, EXERCISE_NAME_MAX};
pub use source::{JsonRoutineSource, MemoryRoutineSource, RoutineSource};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SourceError, ValidationError};

/// Maximum length of a routine name.
pub const ROUTINE_NAME_MAX: usize = 20;

/// A named, ordered collection of exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Routine {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_routine_name(&name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: description.into(),
            exercises: Vec::new(),
        })
    }

    pub fn with_exercises(mut self, exercises: Vec<Exercise>) -> Self {
        self.exercises = exercises;
        self
    }

    /// Sum of sets over every exercise.
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(Exercise::sets).sum()
    }

    /// Seconds of timed work, ignoring rest and rep-based exercises.
    pub fn timed_secs_total(&self) -> u64 {
        self.exercises.iter().map(Exercise::timed_secs_total).sum()
    }

    /// Rests taken during a full run: one after every set except the last.
    pub fn rest_count(&self) -> u32 {
        self.total_sets().saturating_sub(1)
    }
}

pub(crate) fn validate_routine_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "Name" });
    }
    if trimmed.chars().count() > ROUTINE_NAME_MAX {
        return Err(ValidationError::TooLong {
            field: "Name",
            max: ROUTINE_NAME_MAX,
        });
    }
    Ok(())
}

/// Routine as served by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutinePayload {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exercises: Vec<ExercisePayload>,
}

impl TryFrom<RoutinePayload> for Routine {
    type Error = SourceError;

    fn try_from(payload: RoutinePayload) -> Result<Self, Self::Error> {
        let routine_label = payload.name.clone();
        validate_routine_name(&payload.name).map_err(|source| SourceError::Invalid {
            routine: routine_label.clone(),
            exercise: String::new(),
            source,
        })?;

        let exercises = payload
            .exercises
            .into_iter()
            .map(|ex| {
                let exercise_label = ex.name.clone();
                Exercise::try_from(ex).map_err(|source| SourceError::Invalid {
                    routine: routine_label.clone(),
                    exercise: exercise_label,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: payload.id,
            name: payload.name.trim().to_string(),
            description: payload.description.unwrap_or_default(),
            exercises,
        })
    }
}
