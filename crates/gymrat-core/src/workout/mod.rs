//! Guided workout flow.
//!
//! [`WorkoutSession`] sequences a routine's exercises, sets and rest periods
//! and drives the [`Countdown`](crate::timer::Countdown) it owns through
//! them. [`display::view`] turns the session into the labels and progress a
//! front end shows.

pub mod display;
mod session;

pub use display::SessionView;
pub use session::WorkoutSession;

use serde::{Deserialize, Serialize};

use crate::storage::WorkoutConfig;

/// Rest between sets when nothing else is configured.
pub const DEFAULT_REST_SECS: u32 = 120;

/// How long a finished workout stays on screen before closing itself.
pub const DEFAULT_COMPLETE_LINGER_SECS: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Inactive,
    Exercising,
    Resting,
    Complete,
}

/// Per-session timing policy, fixed when the session is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSettings {
    rest_secs: u32,
    complete_linger_secs: u32,
}

impl WorkoutSettings {
    /// A zero rest would never complete, so it is raised to one second.
    pub fn new(rest_secs: u32, complete_linger_secs: u32) -> Self {
        Self {
            rest_secs: rest_secs.max(1),
            complete_linger_secs,
        }
    }

    pub fn rest_secs(&self) -> u32 {
        self.rest_secs
    }

    pub fn complete_linger_secs(&self) -> u32 {
        self.complete_linger_secs
    }
}

impl Default for WorkoutSettings {
    fn default() -> Self {
        Self::new(DEFAULT_REST_SECS, DEFAULT_COMPLETE_LINGER_SECS)
    }
}

impl From<&WorkoutConfig> for WorkoutSettings {
    fn from(config: &WorkoutConfig) -> Self {
        Self::new(config.rest_seconds, config.complete_linger_secs)
    }
}
