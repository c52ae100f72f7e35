//! Countdown timer.
//!
//! The countdown is a tick-driven state machine in whole seconds. It owns no
//! thread or interval - whoever started it drives it by calling `tick()` once
//! per tick interval, passing the [`Generation`] that `start()` armed.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start--> Running --tick(0 left)--> Stopped (completed)
//!    ^                  |
//!    +----pause/stop----+
//! ```
//!
//! Every `start()` arms a new generation. A tick tagged with any other
//! generation, or arriving while stopped, is ignored, so a tick source that
//! outlives a pause, reset or re-arm can never move the countdown.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Identifies one arming of the countdown's tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Result of feeding one tick to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick belonged to a stopped or superseded arming.
    Stale,
    /// One second elapsed, time remains.
    Ticked { remaining_secs: u32 },
    /// One second elapsed and the countdown hit zero.
    Completed,
}

impl TickOutcome {
    pub fn is_completed(self) -> bool {
        matches!(self, TickOutcome::Completed)
    }

    /// Events describing the tick. The final tick reports both the display
    /// refresh and the completion.
    pub fn into_events(self) -> Vec<Event> {
        let at = Utc::now();
        match self {
            TickOutcome::Stale => Vec::new(),
            TickOutcome::Ticked { remaining_secs } => {
                vec![Event::TimerTicked { remaining_secs, at }]
            }
            TickOutcome::Completed => vec![
                Event::TimerTicked {
                    remaining_secs: 0,
                    at,
                },
                Event::TimerCompleted { at },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Countdown {
    remaining_secs: u32,
    initial_secs: u32,
    running: bool,
    /// Bumped on every `start()`.
    generation: u64,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stopped countdown already set to `seconds`.
    pub fn with_time(seconds: u32) -> Self {
        Self {
            remaining_secs: seconds,
            initial_secs: seconds,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn initial_secs(&self) -> u32 {
        self.initial_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Generation ticks must carry, while running.
    pub fn generation(&self) -> Option<Generation> {
        self.running.then_some(Generation(self.generation))
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_mmss(self.remaining_secs)
    }

    /// Window/tab title: `"MM:SS - base"` while counting, `base` otherwise.
    pub fn title(&self, base: &str) -> String {
        if self.running && self.remaining_secs > 0 {
            format!("{} - {base}", self.display())
        } else {
            base.to_string()
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Stop, then load `seconds` as both remaining and initial time.
    pub fn set_time(&mut self, seconds: u32) -> Event {
        self.halt();
        self.remaining_secs = seconds;
        self.initial_secs = seconds;
        Event::TimerSet {
            seconds,
            at: Utc::now(),
        }
    }

    /// Begin counting down. No-op when nothing is left or already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.remaining_secs == 0 || self.running {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        self.running = true;
        Some(Event::TimerStarted {
            remaining_secs: self.remaining_secs,
            generation: Generation(self.generation),
            at: Utc::now(),
        })
    }

    /// Halt counting, keeping the remaining time.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.halt();
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Same as [`Countdown::pause`]; the name callers use when tearing down.
    pub fn stop(&mut self) -> Option<Event> {
        self.pause()
    }

    /// Stop and rewind to the last `set_time` value.
    pub fn reset(&mut self) -> Event {
        self.halt();
        self.remaining_secs = self.initial_secs;
        Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance by one second if `generation` is the live arming.
    pub fn tick(&mut self, generation: Generation) -> TickOutcome {
        if !self.running || generation.0 != self.generation {
            tracing::trace!(
                tick = generation.0,
                live = self.generation,
                running = self.running,
                "ignoring stale tick"
            );
            return TickOutcome::Stale;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.halt();
            return TickOutcome::Completed;
        }
        TickOutcome::Ticked {
            remaining_secs: self.remaining_secs,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn halt(&mut self) {
        self.running = false;
    }
}

/// Format whole seconds as zero-padded `MM:SS`. Minutes are not capped.
pub fn format_mmss(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}
