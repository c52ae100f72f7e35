//! Audio/visual cues.
//!
//! Cues are strictly best-effort: a sink that fails is logged and ignored,
//! and nothing in the timer or session ever waits on one.

use serde::{Deserialize, Serialize};

use crate::error::CueError;
use crate::events::Event;
use crate::storage::CuesConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Once per countdown second.
    Tick,
    /// Button press.
    Click,
    /// Countdown finished.
    Completion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

/// Synthesis parameters for a cue, for sinks that produce sound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub waveform: Waveform,
    pub duration_ms: u32,
    pub gain: f32,
}

impl Cue {
    pub fn tone(self) -> Tone {
        match self {
            Cue::Tick => Tone {
                frequency_hz: 440,
                waveform: Waveform::Square,
                duration_ms: 50,
                gain: 0.05,
            },
            Cue::Click => Tone {
                frequency_hz: 300,
                waveform: Waveform::Triangle,
                duration_ms: 100,
                gain: 0.1,
            },
            Cue::Completion => Tone {
                frequency_hz: 800,
                waveform: Waveform::Sine,
                duration_ms: 500,
                gain: 0.3,
            },
        }
    }
}

/// Anything that can play a cue: a speaker, a terminal bell, a test recorder.
pub trait CueSink {
    fn play(&mut self, cue: Cue) -> Result<(), CueError>;
}

/// Sink that drops every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl CueSink for SilentSink {
    fn play(&mut self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }
}

/// Which events produce cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuePolicy {
    pub enabled: bool,
    pub ticks: bool,
}

impl Default for CuePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            ticks: true,
        }
    }
}

impl From<&CuesConfig> for CuePolicy {
    fn from(config: &CuesConfig) -> Self {
        Self {
            enabled: config.enabled,
            ticks: config.tick,
        }
    }
}

impl CuePolicy {
    pub fn cue_for(&self, event: &Event) -> Option<Cue> {
        if !self.enabled {
            return None;
        }
        match event {
            Event::TimerTicked { .. } if self.ticks => Some(Cue::Tick),
            Event::TimerCompleted { .. } => Some(Cue::Completion),
            _ => None,
        }
    }
}

/// Play `cue`, logging instead of propagating any failure.
pub fn dispatch(sink: &mut dyn CueSink, cue: Cue) {
    if let Err(e) = sink.play(cue) {
        tracing::warn!(?cue, error = %e, "cue failed");
    }
}

/// Play the cues for a batch of events under `policy`.
pub fn dispatch_events(sink: &mut dyn CueSink, policy: &CuePolicy, events: &[Event]) {
    for cue in events.iter().filter_map(|e| policy.cue_for(e)) {
        dispatch(sink, cue);
    }
}
