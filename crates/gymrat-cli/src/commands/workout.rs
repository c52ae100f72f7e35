use std::path::PathBuf;

use clap::Subcommand;
use gymrat_core::timer::format_mmss;
use gymrat_core::{
    Config, Event, JsonRoutineSource, Phase, SessionCommand, WorkoutSession,
    WorkoutSettings,
};

use crate::terminal::{self, InputLines};

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Run a guided workout.
    ///
    /// Type c + Enter to complete a set, s to skip rest, p to pause/resume,
    /// q to end early.
    Run {
        /// Routine file (one routine object or an array)
        file: PathBuf,
        /// Routine ID
        id: String,
        /// Override the configured rest between sets, in seconds
        #[arg(long)]
        rest: Option<u32>,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

const KEY_HELP: &str = "c: complete set   s: skip rest   p: pause/resume   q: end workout";

fn parse_key(line: &str, lines: &mut InputLines) -> Option<SessionCommand> {
    match line {
        "c" => Some(SessionCommand::CompleteSet),
        "s" => Some(SessionCommand::SkipRest),
        "p" => Some(SessionCommand::TogglePause),
        "q" => terminal::confirm("End workout?", lines).then_some(SessionCommand::End),
        _ => None,
    }
}

fn render(event: &Event) {
    match event {
        Event::SessionUpdated { phase: Phase::Inactive, .. } => println!("Workout ended."),
        Event::SessionUpdated { view, .. } => println!(
            "{} | {} | {:.0}%",
            view.exercise_label,
            view.set_label,
            view.progress_pct()
        ),
        Event::RestStarted { seconds, .. } => println!("Rest {}", format_mmss(*seconds)),
        Event::TimerTicked { remaining_secs, .. } => println!("  {}", format_mmss(*remaining_secs)),
        Event::TimerPaused { remaining_secs, .. } => {
            println!("  paused at {}", format_mmss(*remaining_secs))
        }
        Event::TimerCompleted { .. } => println!("  time!"),
        _ => {}
    }
}

fn emit(event: &Event, json: bool) {
    if json {
        terminal::print_json(event);
    } else {
        render(event);
    }
}

pub fn run(action: WorkoutAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WorkoutAction::Run { file, id, rest, json } => {
            let config = Config::load()?;
            let mut settings = WorkoutSettings::from(&config.workout);
            if let Some(rest) = rest {
                settings = WorkoutSettings::new(rest, settings.complete_linger_secs());
            }

            let mut session = WorkoutSession::new(settings);
            let started = session.start_from_source(&JsonRoutineSource::new(file), &id)?;

            if !json {
                eprintln!("{KEY_HELP}");
            }
            for event in &started {
                emit(event, json);
            }

            let driver = terminal::driver(session, &config);
            terminal::forward_stdin(driver.commands(), parse_key);
            terminal::runtime()?.block_on(driver.run(|_, event| emit(event, json)));
        }
    }
    Ok(())
}
