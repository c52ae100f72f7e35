mod countdown;
mod custom;
mod standalone;

pub use countdown::{format_mmss, Countdown, Generation, TickOutcome};
pub use custom::{CustomTime, DEFAULT_MAX_MINUTES, MAX_MINUTES_LIMIT};
pub use standalone::{StandaloneTimer, TimerCommand};
