//! Async tick driver.
//!
//! The timer and the workout session are plain state machines that wait to
//! be ticked. [`Driver`] supplies the ticks from a tokio interval and feeds
//! user commands in through the same channel, so every state change happens
//! on one task, one input at a time.
//!
//! Each arming of the countdown gets its own ticker task tagged with the
//! countdown's [`Generation`]. When the generation changes the old ticker is
//! aborted; any of its ticks still queued are rejected by the countdown.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::cues::{self, Cue, CuePolicy, CueSink};
use crate::events::Event;
use crate::timer::{Generation, StandaloneTimer, TimerCommand};
use crate::workout::WorkoutSession;

/// A state machine the driver can run.
pub trait Driven {
    type Command: Send + 'static;

    /// Generation of the live tick source, `None` when nothing should tick.
    fn generation(&self) -> Option<Generation>;

    fn on_tick(&mut self, generation: Generation) -> Vec<Event>;

    fn on_command(&mut self, command: Self::Command) -> Vec<Event>;

    /// The driver returns once this is true.
    fn is_finished(&self) -> bool;
}

/// Commands a workout screen can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    CompleteSet,
    SkipRest,
    /// Pause the running countdown or resume a paused one.
    TogglePause,
    /// User confirmed ending the workout early.
    End,
}

impl Driven for WorkoutSession {
    type Command = SessionCommand;

    fn generation(&self) -> Option<Generation> {
        self.timer_generation()
    }

    fn on_tick(&mut self, generation: Generation) -> Vec<Event> {
        self.tick(generation)
    }

    fn on_command(&mut self, command: SessionCommand) -> Vec<Event> {
        match command {
            SessionCommand::CompleteSet => self.complete_set(),
            SessionCommand::SkipRest => self.skip_rest(),
            SessionCommand::TogglePause => {
                let toggled = if self.timer().is_running() {
                    self.pause_timer()
                } else {
                    self.resume_timer()
                };
                toggled.into_iter().collect()
            }
            SessionCommand::End => self.end_workout(),
        }
    }

    fn is_finished(&self) -> bool {
        !self.is_active()
    }
}

impl Driven for StandaloneTimer {
    type Command = TimerCommand;

    fn generation(&self) -> Option<Generation> {
        StandaloneTimer::generation(self)
    }

    fn on_tick(&mut self, generation: Generation) -> Vec<Event> {
        self.tick(generation)
    }

    fn on_command(&mut self, command: TimerCommand) -> Vec<Event> {
        self.apply(command)
    }

    fn is_finished(&self) -> bool {
        StandaloneTimer::is_finished(self)
    }
}

enum Input<C> {
    Tick(Generation),
    Command(C),
}

/// Handle for sending commands into a running driver.
pub struct CommandSender<C> {
    tx: mpsc::UnboundedSender<Input<C>>,
}

impl<C> Clone for CommandSender<C> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<C> CommandSender<C> {
    /// Queue a command. Returns `false` once the driver has gone away.
    pub fn send(&self, command: C) -> bool {
        self.tx.send(Input::Command(command)).is_ok()
    }
}

struct Ticker {
    generation: Generation,
    handle: JoinHandle<()>,
}

pub struct Driver<T: Driven, S: CueSink> {
    target: T,
    sink: S,
    policy: CuePolicy,
    period: Duration,
    tx: mpsc::UnboundedSender<Input<T::Command>>,
    rx: mpsc::UnboundedReceiver<Input<T::Command>>,
    ticker: Option<Ticker>,
}

impl<T: Driven, S: CueSink> Driver<T, S> {
    pub fn new(target: T, sink: S, policy: CuePolicy, period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            target,
            sink,
            policy,
            period,
            tx,
            rx,
            ticker: None,
        }
    }

    pub fn commands(&self) -> CommandSender<T::Command> {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Run until the target reports finished, calling `on_event` for every
    /// event with the state as of after the input that produced it.
    pub async fn run<F>(mut self, mut on_event: F) -> T
    where
        F: FnMut(&T, &Event),
    {
        loop {
            self.sync_ticker();
            if self.target.is_finished() {
                break;
            }

            // The driver holds a sender itself, so recv never yields None.
            let Some(input) = self.rx.recv().await else {
                break;
            };
            let events = match input {
                Input::Tick(generation) => self.target.on_tick(generation),
                Input::Command(command) => {
                    if self.policy.enabled {
                        cues::dispatch(&mut self.sink, Cue::Click);
                    }
                    self.target.on_command(command)
                }
            };

            cues::dispatch_events(&mut self.sink, &self.policy, &events);
            for event in &events {
                on_event(&self.target, event);
            }
        }

        self.stop_ticker();
        self.target
    }

    /// Make the live ticker match the target's current generation.
    fn sync_ticker(&mut self) {
        let wanted = self.target.generation();
        if self.ticker.as_ref().map(|t| t.generation) == wanted {
            return;
        }
        self.stop_ticker();
        if let Some(generation) = wanted {
            tracing::trace!(generation = generation.get(), "arming ticker");
            self.ticker = Some(Ticker {
                generation,
                handle: spawn_ticker(self.tx.clone(), generation, self.period),
            });
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.handle.abort();
        }
    }
}

fn spawn_ticker<C: Send + 'static>(
    tx: mpsc::UnboundedSender<Input<C>>,
    generation: Generation,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // First tick one full period after arming, not immediately.
        let mut interval = time::interval_at(Instant::now() + period, period);
        loop {
            interval.tick().await;
            if tx.send(Input::Tick(generation)).is_err() {
                break;
            }
        }
    })
}
