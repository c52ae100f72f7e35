//! # GymRat Core Library
//!
//! Core logic for the GymRat workout timer. Everything a front end needs is
//! here; the `gymrat-cli` binary is a thin terminal layer over it.
//!
//! ## Architecture
//!
//! - **Timer**: A tick-driven countdown. It has no clock of its own; the
//!   caller delivers one tick per second, tagged with the generation the
//!   countdown handed out when it started
//! - **Workout**: Session state machine (inactive, exercising, resting,
//!   complete) that owns one countdown and reacts to its completion
//! - **Driver**: tokio task that supplies ticks and serializes user commands
//! - **Routines**: Validated routine/exercise model and pluggable sources
//! - **Storage**: TOML configuration
//!
//! ## Key Components
//!
//! - [`Countdown`]: Countdown state machine
//! - [`WorkoutSession`]: Workout session controller
//! - [`SessionView`]: Labels and progress derived from a session
//! - [`Driver`]: Async tick and command loop
//! - [`Config`]: Application configuration management

pub mod cues;
pub mod driver;
pub mod error;
pub mod events;
pub mod routine;
pub mod storage;
pub mod timer;
pub mod workout;

pub use cues::{Cue, CuePolicy, CueSink, SilentSink};
pub use driver::{CommandSender, Driven, Driver, SessionCommand};
pub use error::{ConfigError, CoreError, CueError, SourceError, ValidationError, WorkoutError};
pub use events::Event;
pub use routine::{Exercise, ExerciseKind, JsonRoutineSource, Routine, RoutineSource};
pub use storage::Config;
pub use timer::{Countdown, CustomTime, Generation, StandaloneTimer, TickOutcome, TimerCommand};
pub use workout::{Phase, SessionView, WorkoutSession, WorkoutSettings};
