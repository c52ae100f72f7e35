use clap::Subcommand;
use gymrat_core::timer::format_mmss;
use gymrat_core::{Config, CustomTime, Event, StandaloneTimer, TimerCommand};

use crate::terminal;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Count down a custom duration or a preset.
    ///
    /// Type p + Enter to pause/resume, r to reset, q to quit.
    Run {
        /// Minutes
        #[arg(long, allow_negative_numbers = true, conflicts_with = "preset")]
        minutes: Option<i64>,
        /// Seconds (0-59)
        #[arg(long, allow_negative_numbers = true, conflicts_with = "preset")]
        seconds: Option<i64>,
        /// One of the configured preset durations, in seconds (see `timer presets`)
        #[arg(long)]
        preset: Option<u32>,
        /// Keep running after the countdown finishes
        #[arg(long)]
        keep_open: bool,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// List preset durations
    Presets,
}

fn parse_key(line: &str) -> Option<TimerCommand> {
    match line {
        "p" | "" => Some(TimerCommand::StartPause),
        "r" => Some(TimerCommand::Reset),
        "q" => Some(TimerCommand::Close),
        _ => None,
    }
}

/// Only durations listed under `timer.presets` may be used as presets.
fn configured_preset(presets: &[u32], secs: u32) -> Result<u32, String> {
    if presets.contains(&secs) {
        return Ok(secs);
    }
    let available: Vec<String> = presets.iter().map(u32::to_string).collect();
    Err(format!(
        "{secs} is not a configured preset (available: {})",
        available.join(", ")
    ))
}

fn render(timer: &StandaloneTimer, event: &Event) {
    match event {
        Event::TimerTicked { remaining_secs, .. } => println!("{}", format_mmss(*remaining_secs)),
        Event::TimerStarted { remaining_secs, .. } => {
            println!("started at {}", format_mmss(*remaining_secs))
        }
        Event::TimerPaused { remaining_secs, .. } => {
            println!("paused at {}", format_mmss(*remaining_secs))
        }
        Event::TimerReset { remaining_secs, .. } => {
            println!("reset to {}", format_mmss(*remaining_secs))
        }
        Event::TimerCompleted { .. } => println!("{}", timer.countdown().title("Time's up!")),
        _ => {}
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        TimerAction::Run {
            minutes,
            seconds,
            preset,
            keep_open,
            json,
        } => {
            let total = match preset {
                Some(secs) => configured_preset(&config.timer.presets, secs)?,
                None => CustomTime::new(
                    minutes.unwrap_or(0),
                    seconds.unwrap_or(0),
                    config.timer.max_custom_minutes,
                )?
                .total_secs(),
            };
            if total == 0 {
                return Err("duration must be greater than zero".into());
            }

            let mut timer = StandaloneTimer::new(total);
            if !keep_open {
                timer = timer.exit_on_complete();
            }
            let started = timer.apply(TimerCommand::StartPause);

            let driver = terminal::driver(timer, &config);
            terminal::forward_stdin(driver.commands(), |line, _| parse_key(line));

            for event in &started {
                if json {
                    terminal::print_json(event);
                } else {
                    render(driver.target(), event);
                }
            }

            terminal::runtime()?.block_on(driver.run(|timer, event| {
                if json {
                    terminal::print_json(event);
                } else {
                    render(timer, event);
                }
            }));
        }
        TimerAction::Presets => {
            for secs in &config.timer.presets {
                println!("{secs:>5}  {}", format_mmss(*secs));
            }
        }
    }
    Ok(())
}
