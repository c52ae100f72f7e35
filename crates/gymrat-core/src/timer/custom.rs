use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const SECONDS_PER_MINUTE: u32 = 60;

/// Default upper bound for the minutes field of a custom time.
pub const DEFAULT_MAX_MINUTES: u32 = 99;

/// Largest minutes cap for which `minutes:59` still fits in a `u32` of
/// seconds. Caps above it are lowered to it.
pub const MAX_MINUTES_LIMIT: u32 = u32::MAX / SECONDS_PER_MINUTE - 1;

/// A user-entered `minutes:seconds` duration for the standalone timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTime {
    minutes: u32,
    seconds: u32,
}

impl CustomTime {
    /// Validate raw form input. Reports the first problem found, checking in
    /// order: negative values, seconds overflow, zero total, minutes cap.
    pub fn new(minutes: i64, seconds: i64, max_minutes: u32) -> Result<Self, ValidationError> {
        if minutes < 0 || seconds < 0 {
            return Err(ValidationError::NegativeTime);
        }
        if seconds >= i64::from(SECONDS_PER_MINUTE) {
            return Err(ValidationError::SecondsOutOfRange);
        }
        if minutes == 0 && seconds == 0 {
            return Err(ValidationError::ZeroTime);
        }
        let max_minutes = max_minutes.min(MAX_MINUTES_LIMIT);
        if minutes > i64::from(max_minutes) {
            return Err(ValidationError::TooLarge {
                field: "Minutes",
                max: max_minutes,
            });
        }
        // Both bounded above, the casts cannot truncate.
        Ok(Self {
            minutes: minutes as u32,
            seconds: seconds as u32,
        })
    }

    /// Saturates for a deserialized value that bypassed `new`.
    pub fn total_secs(self) -> u32 {
        self.minutes
            .saturating_mul(SECONDS_PER_MINUTE)
            .saturating_add(self.seconds)
    }
}
