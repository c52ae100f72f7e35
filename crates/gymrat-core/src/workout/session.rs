//! Workout session controller.
//!
//! ## State Transitions
//!
//! ```text
//! Inactive --start_workout--> Exercising
//! Exercising --complete_set--> Resting | Complete
//! Resting --rest timer done | skip_rest--> Exercising
//! Complete --linger elapsed--> Inactive
//! * --end_workout--> Inactive
//! ```
//!
//! The set/exercise cursor is advanced when a set is completed, never when a
//! rest ends. Every command returns the events it produced, ending with a
//! `SessionUpdated` carrying the refreshed [`SessionView`] whenever the
//! session changed.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::display::{self, SessionView};
use super::{Phase, WorkoutSettings};
use crate::error::{Result, WorkoutError};
use crate::events::Event;
use crate::routine::{Exercise, ExerciseKind, Routine, RoutineSource};
use crate::timer::{Countdown, Generation, TickOutcome};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSession {
    settings: WorkoutSettings,
    phase: Phase,
    routine_id: Option<Uuid>,
    routine_name: String,
    /// Snapshot taken at start; never mutated while the session runs.
    exercises: Vec<Exercise>,
    exercise_index: usize,
    current_set: u32,
    timer: Countdown,
}

impl Default for WorkoutSession {
    fn default() -> Self {
        Self::new(WorkoutSettings::default())
    }
}

impl WorkoutSession {
    pub fn new(settings: WorkoutSettings) -> Self {
        Self {
            settings,
            phase: Phase::Inactive,
            routine_id: None,
            routine_name: String::new(),
            exercises: Vec::new(),
            exercise_index: 0,
            current_set: 1,
            timer: Countdown::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Inactive
    }

    pub fn settings(&self) -> WorkoutSettings {
        self.settings
    }

    pub fn routine_id(&self) -> Option<Uuid> {
        self.routine_id
    }

    pub fn routine_name(&self) -> &str {
        &self.routine_name
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    /// Exercise under the cursor; `None` when inactive or complete.
    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.exercises.get(self.exercise_index)
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    /// Generation ticks must carry to reach the session's timer.
    pub fn timer_generation(&self) -> Option<Generation> {
        self.timer.generation()
    }

    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(Exercise::sets).sum()
    }

    /// Sets of every exercise before the cursor plus finished sets of the
    /// current one.
    pub fn completed_sets(&self) -> u32 {
        let before: u32 = self
            .exercises
            .iter()
            .take(self.exercise_index)
            .map(Exercise::sets)
            .sum();
        if self.exercise_index < self.exercises.len() {
            before + self.current_set.saturating_sub(1)
        } else {
            before
        }
    }

    /// 0.0 .. 1.0, reaching 1.0 only once every set is done.
    pub fn progress(&self) -> f64 {
        let total = self.total_sets();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.completed_sets()) / f64::from(total)
    }

    pub fn view(&self) -> SessionView {
        display::view(self)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a guided workout over a copy of `exercises`.
    ///
    /// An empty list is rejected and leaves the session untouched. Starting
    /// while another workout runs ends that one first.
    pub fn start_workout(
        &mut self,
        routine_id: Uuid,
        routine_name: impl Into<String>,
        exercises: &[Exercise],
    ) -> Result<Vec<Event>, WorkoutError> {
        if exercises.is_empty() {
            tracing::warn!(%routine_id, "refusing to start workout without exercises");
            return Err(WorkoutError::NoExercises);
        }

        let mut events = self.end_workout();

        self.phase = Phase::Exercising;
        self.routine_id = Some(routine_id);
        self.routine_name = routine_name.into();
        self.exercises = exercises.to_vec();
        self.exercise_index = 0;
        self.current_set = 1;

        tracing::info!(
            %routine_id,
            routine = %self.routine_name,
            exercises = self.exercises.len(),
            total_sets = self.total_sets(),
            "workout started"
        );
        events.push(Event::WorkoutStarted {
            routine_id,
            routine_name: self.routine_name.clone(),
            exercise_count: self.exercises.len(),
            total_sets: self.total_sets(),
            at: Utc::now(),
        });
        self.arm_current_exercise(&mut events);
        Ok(self.updated(events))
    }

    /// Convenience over [`WorkoutSession::start_workout`] for a whole routine.
    pub fn start_routine(&mut self, routine: &Routine) -> Result<Vec<Event>, WorkoutError> {
        self.start_workout(routine.id, routine.name.clone(), &routine.exercises)
    }

    /// Fetch routine `id` from `source` and start it.
    ///
    /// A failed fetch leaves the session untouched, like an empty routine.
    pub fn start_from_source(&mut self, source: &dyn RoutineSource, id: &str) -> Result<Vec<Event>> {
        let routine = source.fetch_routine(id)?;
        Ok(self.start_routine(&routine)?)
    }

    /// Finish the current set and move to rest or to completion.
    pub fn complete_set(&mut self) -> Vec<Event> {
        if self.phase != Phase::Exercising {
            return Vec::new();
        }
        let Some(sets) = self.current_exercise().map(Exercise::sets) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        events.extend(self.timer.stop());
        events.push(Event::SetCompleted {
            exercise_index: self.exercise_index,
            set: self.current_set,
            at: Utc::now(),
        });

        if self.current_set < sets {
            self.current_set += 1;
            self.begin_rest(&mut events);
        } else {
            self.exercise_index += 1;
            self.current_set = 1;
            if self.exercise_index == self.exercises.len() {
                self.begin_complete(&mut events);
            } else {
                self.begin_rest(&mut events);
            }
        }

        tracing::debug!(
            phase = ?self.phase,
            exercise_index = self.exercise_index,
            set = self.current_set,
            "set completed"
        );
        self.updated(events)
    }

    /// Cut the rest short and go straight to the next set.
    pub fn skip_rest(&mut self) -> Vec<Event> {
        if self.phase != Phase::Resting {
            return Vec::new();
        }
        let mut events: Vec<Event> = self.timer.stop().into_iter().collect();
        self.finish_rest(true, &mut events);
        self.updated(events)
    }

    /// Feed one tick from the tick source armed for `generation`.
    ///
    /// Ticks for a stopped or replaced timer are dropped without touching
    /// the session.
    pub fn tick(&mut self, generation: Generation) -> Vec<Event> {
        if !self.is_active() {
            return Vec::new();
        }
        let outcome = self.timer.tick(generation);
        match (self.phase, outcome) {
            (_, TickOutcome::Stale) => Vec::new(),
            // Linger ticks are silent; only the close is reported.
            (Phase::Complete, TickOutcome::Ticked { .. }) => Vec::new(),
            (Phase::Complete, TickOutcome::Completed) => self.end_workout(),
            (Phase::Resting, TickOutcome::Completed) => {
                let mut events = outcome.into_events();
                self.finish_rest(false, &mut events);
                self.updated(events)
            }
            _ => outcome.into_events(),
        }
    }

    /// Pause the exercise or rest countdown. The completion linger can't be
    /// paused.
    pub fn pause_timer(&mut self) -> Option<Event> {
        if !matches!(self.phase, Phase::Exercising | Phase::Resting) {
            return None;
        }
        self.timer.pause()
    }

    /// Resume a paused exercise or rest countdown.
    pub fn resume_timer(&mut self) -> Option<Event> {
        if !matches!(self.phase, Phase::Exercising | Phase::Resting) {
            return None;
        }
        self.timer.start()
    }

    /// Tear the session down. Safe to call in any phase, any number of times.
    pub fn end_workout(&mut self) -> Vec<Event> {
        if !self.is_active() {
            return Vec::new();
        }

        let mut events: Vec<Event> = self.timer.stop().into_iter().collect();
        events.push(self.timer.reset());
        // Leave nothing armed for the next owner.
        events.push(self.timer.set_time(0));

        tracing::info!(
            routine = %self.routine_name,
            completed_sets = self.completed_sets(),
            total_sets = self.total_sets(),
            "workout ended"
        );

        self.phase = Phase::Inactive;
        self.routine_id = None;
        self.routine_name.clear();
        self.exercises.clear();
        self.exercise_index = 0;
        self.current_set = 1;

        events.push(Event::WorkoutEnded { at: Utc::now() });
        self.updated(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_rest(&mut self, events: &mut Vec<Event>) {
        let seconds = self.settings.rest_secs();
        self.phase = Phase::Resting;
        events.push(self.timer.set_time(seconds));
        events.push(Event::RestStarted {
            seconds,
            at: Utc::now(),
        });
        events.extend(self.timer.start());
    }

    /// Resting -> Exercising. The cursor was already advanced by
    /// `complete_set`, so no bounds are rechecked here.
    fn finish_rest(&mut self, skipped: bool, events: &mut Vec<Event>) {
        self.phase = Phase::Exercising;
        events.push(Event::RestFinished {
            skipped,
            at: Utc::now(),
        });
        self.arm_current_exercise(events);
    }

    fn begin_complete(&mut self, events: &mut Vec<Event>) {
        self.phase = Phase::Complete;
        events.push(Event::WorkoutCompleted { at: Utc::now() });
        tracing::info!(routine = %self.routine_name, "workout complete");

        let linger = self.settings.complete_linger_secs();
        events.push(self.timer.set_time(linger));
        if linger == 0 {
            events.extend(self.end_workout());
        } else {
            self.timer.start();
        }
    }

    /// Timed exercises count down on their own; rep exercises leave the
    /// timer cleared.
    fn arm_current_exercise(&mut self, events: &mut Vec<Event>) {
        match self.current_exercise().map(Exercise::kind) {
            Some(ExerciseKind::Timed { seconds }) => {
                events.push(self.timer.set_time(seconds));
                events.extend(self.timer.start());
            }
            Some(ExerciseKind::Reps { .. }) | None => {
                events.push(self.timer.set_time(0));
            }
        }
    }

    fn updated(&self, mut events: Vec<Event>) -> Vec<Event> {
        events.push(Event::SessionUpdated {
            phase: self.phase,
            view: self.view(),
            at: Utc::now(),
        });
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, SourceError};
    use crate::routine::MemoryRoutineSource;

    fn squat(sets: u32) -> Exercise {
        Exercise::reps("Squat", sets, 10).unwrap()
    }

    fn plank(sets: u32, seconds: u32) -> Exercise {
        Exercise::timed("Plank", sets, seconds).unwrap()
    }

    fn session() -> WorkoutSession {
        WorkoutSession::new(WorkoutSettings::new(3, 2))
    }

    fn started(exercises: &[Exercise]) -> WorkoutSession {
        let mut s = session();
        s.start_workout(Uuid::new_v4(), "Legs", exercises).unwrap();
        s
    }

    /// Tick the currently armed timer until it stops or is replaced.
    fn run_timer_out(s: &mut WorkoutSession) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(generation) = s.timer_generation() else {
            return events;
        };
        while s.timer_generation() == Some(generation) {
            events.extend(s.tick(generation));
        }
        events
    }

    fn kinds(events: &[Event]) -> Vec<&'static str> {
        events.iter().map(Event::kind).collect()
    }

    #[test]
    fn empty_routine_is_rejected() {
        let mut s = session();
        let err = s.start_workout(Uuid::new_v4(), "Nothing", &[]).unwrap_err();
        assert_eq!(err, WorkoutError::NoExercises);
        assert_eq!(s.phase(), Phase::Inactive);
        assert!(!s.is_active());
    }

    #[test]
    fn empty_routine_does_not_disturb_running_workout() {
        let mut s = started(&[squat(2)]);
        assert!(s.start_workout(Uuid::new_v4(), "Other", &[]).is_err());
        assert_eq!(s.phase(), Phase::Exercising);
        assert_eq!(s.routine_name(), "Legs");
    }

    #[test]
    fn two_set_trace_reaches_complete() {
        let mut s = started(&[squat(2)]);
        assert_eq!((s.phase(), s.current_set()), (Phase::Exercising, 1));

        s.complete_set();
        assert_eq!(s.phase(), Phase::Resting);
        assert_eq!(s.current_set(), 2);

        s.skip_rest();
        assert_eq!((s.phase(), s.current_set()), (Phase::Exercising, 2));

        s.complete_set();
        assert_eq!(s.phase(), Phase::Complete);
        assert_eq!(s.exercise_index(), 1);
        assert_eq!(s.current_set(), 1);
        assert_eq!(s.progress(), 1.0);
    }

    #[test]
    fn last_set_of_exercise_rests_before_next_exercise() {
        let mut s = started(&[squat(1), plank(1, 30)]);
        s.complete_set();
        assert_eq!(s.phase(), Phase::Resting);
        assert_eq!(s.exercise_index(), 1);
        assert_eq!(s.current_set(), 1);
        assert_eq!(s.timer().remaining_secs(), 3);
    }

    #[test]
    fn rep_exercise_leaves_timer_unarmed() {
        let s = started(&[squat(3)]);
        assert!(!s.timer().is_running());
        assert_eq!(s.timer().remaining_secs(), 0);
    }

    #[test]
    fn timed_exercise_arms_and_starts_timer() {
        let s = started(&[plank(2, 45)]);
        assert!(s.timer().is_running());
        assert_eq!(s.timer().remaining_secs(), 45);
    }

    #[test]
    fn timed_exercise_completion_waits_for_user() {
        let mut s = started(&[plank(2, 2)]);
        let events = run_timer_out(&mut s);
        assert!(kinds(&events).contains(&"timer_completed"));
        assert_eq!(s.phase(), Phase::Exercising);
        assert_eq!(s.current_set(), 1);
    }

    #[test]
    fn complete_set_stops_running_exercise_timer() {
        let mut s = started(&[plank(2, 45)]);
        let events = s.complete_set();
        assert_eq!(kinds(&events)[0], "timer_paused");
        assert_eq!(s.phase(), Phase::Resting);
        assert_eq!(s.timer().remaining_secs(), 3);
    }

    #[test]
    fn rest_completion_returns_to_exercise() {
        let mut s = started(&[plank(2, 20)]);
        s.complete_set();
        let events = run_timer_out(&mut s);

        assert!(kinds(&events).contains(&"rest_finished"));
        assert_eq!(s.phase(), Phase::Exercising);
        assert_eq!(s.current_set(), 2);
        // Next timed set armed automatically.
        assert!(s.timer().is_running());
        assert_eq!(s.timer().remaining_secs(), 20);
    }

    #[test]
    fn skip_and_natural_rest_end_agree() {
        let exercises = [squat(2), plank(1, 10)];
        let mut skipped = started(&exercises);
        let mut waited = started(&exercises);
        for s in [&mut skipped, &mut waited] {
            s.complete_set();
            s.skip_rest();
            s.complete_set();
            assert_eq!(s.phase(), Phase::Resting);
        }

        skipped.skip_rest();
        run_timer_out(&mut waited);

        assert_eq!(skipped.phase(), waited.phase());
        assert_eq!(skipped.exercise_index(), waited.exercise_index());
        assert_eq!(skipped.current_set(), waited.current_set());
        assert_eq!(skipped.timer().remaining_secs(), waited.timer().remaining_secs());
    }

    #[test]
    fn stale_rest_tick_after_skip_is_ignored() {
        let mut s = started(&[squat(3)]);
        s.complete_set();
        let rest_generation = s.timer_generation().unwrap();

        s.skip_rest();
        let before = (s.phase(), s.exercise_index(), s.current_set());
        for _ in 0..10 {
            assert!(s.tick(rest_generation).is_empty());
        }
        assert_eq!((s.phase(), s.exercise_index(), s.current_set()), before);
    }

    #[test]
    fn stale_tick_from_previous_rest_cannot_end_next_rest() {
        let mut s = started(&[squat(3)]);
        s.complete_set();
        let first_rest = s.timer_generation().unwrap();
        s.skip_rest();
        s.complete_set();
        assert_eq!(s.phase(), Phase::Resting);

        for _ in 0..10 {
            s.tick(first_rest);
        }
        assert_eq!(s.phase(), Phase::Resting);
        assert_eq!(s.timer().remaining_secs(), 3);
    }

    #[test]
    fn complete_lingers_then_closes() {
        let mut s = started(&[squat(1)]);
        s.complete_set();
        assert_eq!(s.phase(), Phase::Complete);

        let events = run_timer_out(&mut s);
        assert_eq!(s.phase(), Phase::Inactive);
        assert!(kinds(&events).contains(&"workout_ended"));
        assert!(!kinds(&events).contains(&"timer_ticked"));
    }

    #[test]
    fn zero_linger_closes_immediately() {
        let mut s = WorkoutSession::new(WorkoutSettings::new(3, 0));
        s.start_workout(Uuid::new_v4(), "Quick", &[squat(1)]).unwrap();
        let events = s.complete_set();
        assert!(kinds(&events).contains(&"workout_completed"));
        assert_eq!(s.phase(), Phase::Inactive);
    }

    #[test]
    fn end_workout_is_idempotent() {
        let mut s = started(&[plank(2, 30)]);
        s.complete_set();

        let first = s.end_workout();
        assert!(kinds(&first).contains(&"workout_ended"));
        let snapshot = serde_json::to_value(&s).unwrap();

        assert!(s.end_workout().is_empty());
        assert_eq!(serde_json::to_value(&s).unwrap(), snapshot);
        assert_eq!(s.phase(), Phase::Inactive);
        assert!(!s.timer().is_running());
    }

    #[test]
    fn commands_are_noops_while_inactive() {
        let mut s = session();
        assert!(s.complete_set().is_empty());
        assert!(s.skip_rest().is_empty());
        assert!(s.pause_timer().is_none());
        assert!(s.resume_timer().is_none());
        assert!(s.end_workout().is_empty());
        assert_eq!(s.phase(), Phase::Inactive);
    }

    #[test]
    fn complete_set_during_rest_is_ignored() {
        let mut s = started(&[squat(3)]);
        s.complete_set();
        assert!(s.complete_set().is_empty());
        assert_eq!(s.current_set(), 2);
    }

    #[test]
    fn snapshot_is_independent_of_caller() {
        let mut exercises = vec![squat(2)];
        let s = started(&exercises);
        exercises.push(plank(3, 30));
        assert_eq!(s.exercises().len(), 1);
        assert_eq!(s.total_sets(), 2);
    }

    #[test]
    fn restart_replaces_previous_session() {
        let mut s = started(&[plank(2, 30)]);
        let old_generation = s.timer_generation().unwrap();
        let events = s
            .start_workout(Uuid::new_v4(), "Arms", &[squat(1)])
            .unwrap();
        assert_eq!(kinds(&events).first(), Some(&"timer_paused"));
        assert!(kinds(&events).contains(&"workout_ended"));
        assert_eq!(s.routine_name(), "Arms");
        assert!(s.tick(old_generation).is_empty());
    }

    #[test]
    fn pause_and_resume_rest() {
        let mut s = started(&[squat(2)]);
        s.complete_set();
        let generation = s.timer_generation().unwrap();
        s.tick(generation);
        assert!(s.pause_timer().is_some());
        assert!(s.tick(generation).is_empty());
        assert!(s.resume_timer().is_some());
        let resumed = s.timer_generation().unwrap();
        assert_ne!(resumed, generation);
        assert_eq!(s.timer().remaining_secs(), 2);
    }

    #[test]
    fn start_from_source_runs_fetched_routine() {
        let routine = Routine::new("Arms", "")
            .unwrap()
            .with_exercises(vec![squat(2)]);
        let id = routine.id.to_string();
        let mut source = MemoryRoutineSource::new();
        source.insert(routine);

        let mut s = session();
        let events = s.start_from_source(&source, &id).unwrap();
        assert_eq!(kinds(&events).first(), Some(&"workout_started"));
        assert_eq!(s.phase(), Phase::Exercising);
        assert_eq!(s.routine_name(), "Arms");
    }

    #[test]
    fn start_from_source_reports_fetch_and_start_failures() {
        let empty = Routine::new("Nothing", "").unwrap();
        let empty_id = empty.id.to_string();
        let mut source = MemoryRoutineSource::new();
        source.insert(empty);

        let mut s = started(&[squat(2)]);
        assert!(matches!(
            s.start_from_source(&source, "missing"),
            Err(CoreError::Source(SourceError::NotFound(_)))
        ));
        assert!(matches!(
            s.start_from_source(&source, &empty_id),
            Err(CoreError::Workout(WorkoutError::NoExercises))
        ));
        assert_eq!(s.phase(), Phase::Exercising);
        assert_eq!(s.routine_name(), "Legs");
    }

    #[test]
    fn every_transition_ends_with_session_update() {
        let mut s = session();
        let events = s
            .start_workout(Uuid::new_v4(), "Legs", &[squat(2)])
            .unwrap();
        assert_eq!(kinds(&events).last(), Some(&"session_updated"));
        assert_eq!(kinds(&s.complete_set()).last(), Some(&"session_updated"));
        assert_eq!(kinds(&s.skip_rest()).last(), Some(&"session_updated"));
        assert_eq!(kinds(&s.end_workout()).last(), Some(&"session_updated"));
    }
}
