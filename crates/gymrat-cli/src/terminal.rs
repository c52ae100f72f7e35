//! Terminal plumbing shared by the interactive commands.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use gymrat_core::driver::{CommandSender, Driven, Driver};
use gymrat_core::{Config, Cue, CueError, CuePolicy, CueSink, Event};

pub type InputLines = io::Lines<io::StdinLock<'static>>;

/// Rings the terminal bell when a countdown finishes.
pub struct BellSink;

impl CueSink for BellSink {
    fn play(&mut self, cue: Cue) -> Result<(), CueError> {
        if cue == Cue::Completion {
            let mut err = io::stderr().lock();
            err.write_all(b"\x07")?;
            err.flush()?;
        }
        Ok(())
    }
}

/// Forward stdin lines as commands until stdin closes or the driver stops.
///
/// Runs on a plain thread: a blocked stdin read must not keep the runtime
/// alive after the driver returns.
pub fn forward_stdin<C, F>(commands: CommandSender<C>, mut parse: F)
where
    C: Send + 'static,
    F: FnMut(&str, &mut InputLines) -> Option<C> + Send + 'static,
{
    std::thread::spawn(move || {
        let mut lines = io::stdin().lock().lines();
        while let Some(Ok(line)) = lines.next() {
            if let Some(command) = parse(line.trim(), &mut lines) {
                if !commands.send(command) {
                    break;
                }
            }
        }
    });
}

/// Ask a yes/no question on stderr; anything but y/yes is a no.
pub fn confirm(prompt: &str, lines: &mut InputLines) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    matches!(
        lines.next(),
        Some(Ok(answer)) if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    )
}

/// Print an event as one JSON line.
pub fn print_json(event: &Event) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!(error = %e, "failed to encode event"),
    }
}

/// Build a driver for `target` using the configured tick interval and cues.
pub fn driver<T: Driven>(target: T, config: &Config) -> Driver<T, BellSink> {
    Driver::new(
        target,
        BellSink,
        CuePolicy::from(&config.cues),
        Duration::from_millis(config.timer.tick_interval_ms),
    )
}

pub fn runtime() -> io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
