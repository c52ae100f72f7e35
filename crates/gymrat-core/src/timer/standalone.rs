use super::{Countdown, Generation, TickOutcome};
use crate::events::Event;

/// Commands a standalone timer screen can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start when stopped, pause when running.
    StartPause,
    Reset,
    /// Load a new duration (stops the countdown).
    Set(u32),
    Close,
}

/// The countdown outside of a workout: completion plays a cue and nothing
/// else happens.
#[derive(Debug, Clone, Default)]
pub struct StandaloneTimer {
    countdown: Countdown,
    exit_on_complete: bool,
    completed: bool,
    closed: bool,
}

impl StandaloneTimer {
    pub fn new(seconds: u32) -> Self {
        Self {
            countdown: Countdown::with_time(seconds),
            ..Self::default()
        }
    }

    /// Treat the first completion as the end of the timer's life.
    pub fn exit_on_complete(mut self) -> Self {
        self.exit_on_complete = true;
        self
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn is_finished(&self) -> bool {
        self.closed || (self.exit_on_complete && self.completed)
    }

    pub fn generation(&self) -> Option<Generation> {
        self.countdown.generation()
    }

    pub fn tick(&mut self, generation: Generation) -> Vec<Event> {
        let outcome = self.countdown.tick(generation);
        if outcome == TickOutcome::Completed {
            self.completed = true;
        }
        outcome.into_events()
    }

    pub fn apply(&mut self, command: TimerCommand) -> Vec<Event> {
        match command {
            TimerCommand::StartPause => {
                if self.countdown.is_running() {
                    self.countdown.pause().into_iter().collect()
                } else {
                    self.completed = false;
                    self.countdown.start().into_iter().collect()
                }
            }
            TimerCommand::Reset => vec![self.countdown.reset()],
            TimerCommand::Set(seconds) => {
                self.completed = false;
                vec![self.countdown.set_time(seconds)]
            }
            TimerCommand::Close => {
                self.closed = true;
                self.countdown.stop().into_iter().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pause_toggles() {
        let mut timer = StandaloneTimer::new(30);
        assert_eq!(timer.apply(TimerCommand::StartPause)[0].kind(), "timer_started");
        assert!(timer.countdown().is_running());
        assert_eq!(timer.apply(TimerCommand::StartPause)[0].kind(), "timer_paused");
        assert!(!timer.countdown().is_running());
    }

    #[test]
    fn finishes_on_completion_when_asked() {
        let mut timer = StandaloneTimer::new(2).exit_on_complete();
        timer.apply(TimerCommand::StartPause);
        let generation = timer.generation().unwrap();
        timer.tick(generation);
        assert!(!timer.is_finished());
        let events = timer.tick(generation);
        assert!(events.iter().any(|e| e.kind() == "timer_completed"));
        assert!(timer.is_finished());
    }

    #[test]
    fn completion_alone_does_not_close_by_default() {
        let mut timer = StandaloneTimer::new(1);
        timer.apply(TimerCommand::StartPause);
        let generation = timer.generation().unwrap();
        timer.tick(generation);
        assert!(!timer.is_finished());
        timer.apply(TimerCommand::Close);
        assert!(timer.is_finished());
    }

    #[test]
    fn set_replaces_time_and_stops() {
        let mut timer = StandaloneTimer::new(10);
        timer.apply(TimerCommand::StartPause);
        let old = timer.generation().unwrap();
        timer.apply(TimerCommand::Set(90));
        assert_eq!(timer.countdown().remaining_secs(), 90);
        assert!(timer.tick(old).is_empty());
    }
}
