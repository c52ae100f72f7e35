use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::Generation;
use crate::workout::{Phase, SessionView};

/// Every state change in the timer and the workout session produces an Event.
/// Front ends render from them; the cue dispatcher turns some into sounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerSet {
        seconds: u32,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_secs: u32,
        generation: Generation,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerTicked {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. Emitted exactly once per arming.
    TimerCompleted {
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    WorkoutStarted {
        routine_id: Uuid,
        routine_name: String,
        exercise_count: usize,
        total_sets: u32,
        at: DateTime<Utc>,
    },
    SetCompleted {
        exercise_index: usize,
        set: u32,
        at: DateTime<Utc>,
    },
    RestStarted {
        seconds: u32,
        at: DateTime<Utc>,
    },
    RestFinished {
        skipped: bool,
        at: DateTime<Utc>,
    },
    WorkoutCompleted {
        at: DateTime<Utc>,
    },
    WorkoutEnded {
        at: DateTime<Utc>,
    },
    /// Published after every session transition with the refreshed view.
    SessionUpdated {
        phase: Phase,
        view: SessionView,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name of the variant, matching the serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerSet { .. } => "timer_set",
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerTicked { .. } => "timer_ticked",
            Event::TimerCompleted { .. } => "timer_completed",
            Event::TimerReset { .. } => "timer_reset",
            Event::WorkoutStarted { .. } => "workout_started",
            Event::SetCompleted { .. } => "set_completed",
            Event::RestStarted { .. } => "rest_started",
            Event::RestFinished { .. } => "rest_finished",
            Event::WorkoutCompleted { .. } => "workout_completed",
            Event::WorkoutEnded { .. } => "workout_ended",
            Event::SessionUpdated { .. } => "session_updated",
        }
    }
}
