//! Core error types for gymrat-core.
//!
//! Every fallible operation in the library reports one of the enums below;
//! [`CoreError`] wraps them all for callers that do not care which layer
//! failed.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gymrat-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Workout session errors
    #[error("Workout error: {0}")]
    Workout(#[from] WorkoutError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Routine source errors
    #[error("Routine source error: {0}")]
    Source(#[from] SourceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the workout session controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkoutError {
    /// A workout was started with an empty exercise list.
    #[error("No exercises in this routine!")]
    NoExercises,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Could not determine where the configuration lives
    #[error("Configuration directory unavailable: {0}")]
    NoDataDir(String),
}

/// Validation errors for user supplied data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field missing or blank
    #[error("{field} is required.")]
    Required { field: &'static str },

    /// Text field exceeds its maximum length
    #[error("{field} must be {max} characters or less.")]
    TooLong { field: &'static str, max: usize },

    /// Numeric field below its minimum
    #[error("{field} must be at least {min}.")]
    TooSmall { field: &'static str, min: u32 },

    /// Numeric field above its maximum
    #[error("{field} cannot exceed {max}.")]
    TooLarge { field: &'static str, max: u32 },

    /// An exercise must be either rep-based or timed
    #[error("Exercise must have either reps or duration")]
    MissingQuantity,

    /// An exercise cannot be both rep-based and timed
    #[error("Exercise cannot have both reps and duration")]
    AmbiguousQuantity,

    /// Time input was negative
    #[error("Time cannot be negative.")]
    NegativeTime,

    /// Seconds component was 60 or more
    #[error("Seconds must be less than 60.")]
    SecondsOutOfRange,

    /// Time input adds up to zero
    #[error("Time must be greater than zero.")]
    ZeroTime,
}

/// Errors raised while fetching routines from an external source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Reading the backing file failed
    #[error("Failed to read routines from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Payload was not valid JSON for the routine shape
    #[error("Malformed routine payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No routine with the requested id
    #[error("Routine not found: {0}")]
    NotFound(String),

    /// Routine payload failed domain validation
    #[error("Invalid exercise '{exercise}' in routine '{routine}': {source}")]
    Invalid {
        routine: String,
        exercise: String,
        #[source]
        source: ValidationError,
    },
}

/// Failure delivering an audio/visual cue. Never propagated past the
/// dispatcher in [`crate::cues`].
#[derive(Error, Debug)]
pub enum CueError {
    /// Output device rejected the cue
    #[error("Cue output unavailable: {0}")]
    Unavailable(String),

    /// IO failure writing the cue
    #[error("Cue write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
