use std::path::PathBuf;

use clap::Subcommand;
use gymrat_core::routine::{ExerciseKind, Routine};
use gymrat_core::timer::format_mmss;
use gymrat_core::{JsonRoutineSource, RoutineSource};
use serde::Serialize;

#[derive(Subcommand)]
pub enum RoutineAction {
    /// List routines in a JSON file
    List {
        /// Routine file (one routine object or an array)
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Show one routine's exercises
    Show {
        file: PathBuf,
        /// Routine ID
        id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct RoutineSummary<'a> {
    id: String,
    name: &'a str,
    description: &'a str,
    exercise_count: usize,
    total_sets: u32,
}

impl<'a> From<&'a Routine> for RoutineSummary<'a> {
    fn from(routine: &'a Routine) -> Self {
        Self {
            id: routine.id.to_string(),
            name: &routine.name,
            description: &routine.description,
            exercise_count: routine.exercises.len(),
            total_sets: routine.total_sets(),
        }
    }
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RoutineAction::List { file, json } => {
            let routines = JsonRoutineSource::new(file).list_routines()?;
            if json {
                let summaries: Vec<RoutineSummary> = routines.iter().map(RoutineSummary::from).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if routines.is_empty() {
                println!("No routines found.");
            } else {
                for routine in &routines {
                    println!(
                        "{}  {:<20}  {} exercises, {} sets",
                        routine.id,
                        routine.name,
                        routine.exercises.len(),
                        routine.total_sets()
                    );
                }
            }
        }
        RoutineAction::Show { file, id, json } => {
            let routine = JsonRoutineSource::new(file).fetch_routine(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&routine)?);
                return Ok(());
            }

            println!("{}", routine.name);
            if !routine.description.is_empty() {
                println!("{}", routine.description);
            }
            for (i, exercise) in routine.exercises.iter().enumerate() {
                let quantity = match exercise.kind() {
                    ExerciseKind::Reps { count } => format!("{count} reps"),
                    ExerciseKind::Timed { seconds } => format_mmss(seconds),
                };
                println!(
                    "  {}. {} ({} sets - {})",
                    i + 1,
                    exercise.name(),
                    exercise.sets(),
                    quantity
                );
            }
            println!(
                "Estimated time: {} timed, {} rests",
                format_mmss(u32::try_from(routine.timed_secs_total()).unwrap_or(u32::MAX)),
                routine.rest_count()
            );
        }
    }
    Ok(())
}
