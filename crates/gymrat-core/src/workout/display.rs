//! Session display adapter.
//!
//! A pure function from session state to what a workout screen shows.
//! Rendering is left to the front end.

use serde::{Deserialize, Serialize};

use super::{Phase, WorkoutSession};
use crate::routine::{Exercise, ExerciseKind};

pub const REST_EXERCISE_LABEL: &str = "Rest Time";
pub const REST_SET_LABEL: &str = "Rest";
pub const COMPLETE_LABEL: &str = "Workout Complete!";
pub const COMPLETE_SET_LABEL: &str = "Great job! You've finished your workout.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub exercise_label: String,
    pub set_label: String,
    /// 0.0 .. 1.0
    pub progress_fraction: f64,
}

impl SessionView {
    pub fn progress_pct(&self) -> f64 {
        self.progress_fraction * 100.0
    }
}

pub fn view(session: &WorkoutSession) -> SessionView {
    let (exercise_label, set_label) = match session.phase() {
        Phase::Inactive => (String::new(), String::new()),
        Phase::Resting => (REST_EXERCISE_LABEL.to_string(), REST_SET_LABEL.to_string()),
        Phase::Complete => (COMPLETE_LABEL.to_string(), COMPLETE_SET_LABEL.to_string()),
        Phase::Exercising => match session.current_exercise() {
            Some(exercise) => (
                exercise.name().to_string(),
                set_label(session.current_set(), exercise),
            ),
            None => (String::new(), String::new()),
        },
    };

    SessionView {
        exercise_label,
        set_label,
        progress_fraction: session.progress(),
    }
}

/// `"Set 2 of 3 - 10 reps"` or `"Set 1 of 2 - 45s"`.
pub fn set_label(current_set: u32, exercise: &Exercise) -> String {
    let quantity = match exercise.kind() {
        ExerciseKind::Reps { count } => format!("{count} reps"),
        ExerciseKind::Timed { seconds } => format!("{seconds}s"),
    };
    format!("Set {current_set} of {} - {quantity}", exercise.sets())
}
