/*!
 * Runtime settings and process-level plumbing
 *
 * Command-line settings, terminal geometry and the shutdown signal handler.
 */

use clap::ArgMatches;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use terminal_size::{terminal_size, Width};

pub const VERSION: &str = "0.1.2-latest";
pub const DEFAULT_URL: &str = "tcp://127.0.0.1:7600";
pub const DEFAULT_HISTORY_FILE: &str = "resql-history.txt";

/// Used when stdout is not a terminal or reports zero columns.
pub const FALLBACK_TERMINAL_WIDTH: usize = 120;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "RESQL_CLI_LOG";

/// Exit code when a second signal forces the process down (128 + SIGINT).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub url: String,
    /// One-shot commands; when non-empty the session is not interactive.
    pub commands: Vec<String>,
    pub history_path: PathBuf,
    pub verbose: bool,
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let url = matches
            .get_one::<String>("url")
            .cloned()
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let commands = matches
            .get_many::<String>("command")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let history_path = matches
            .get_one::<String>("history")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE));

        Self {
            url,
            commands,
            history_path,
            verbose: matches.get_flag("verbose"),
        }
    }

    pub fn is_one_shot(&self) -> bool {
        !self.commands.is_empty()
    }
}

/// Current terminal width in columns.
pub fn terminal_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .filter(|w| *w > 0)
        .unwrap_or(FALLBACK_TERMINAL_WIDTH)
}

/// Install the SIGINT/SIGTERM handler.
///
/// The first signal announces the shutdown and raises the returned token,
/// which the session checks between lines. A second signal exits
/// immediately.
pub fn setup_signal_handler() -> anyhow::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);

    ctrlc::set_handler(move || {
        if on_signal(&handler_flag, &mut io::stdout()) {
            std::process::exit(EXIT_CODE_INTERRUPTED);
        }
    })?;

    Ok(flag)
}

/// Returns true when the signal is a repeat and the process should exit.
fn on_signal(token: &AtomicBool, out: &mut dyn Write) -> bool {
    if token.swap(true, Ordering::SeqCst) {
        return true;
    }

    tracing::info!("shutdown requested");
    if let Err(e) = writeln!(out, "\nShutting down.. ").and_then(|_| out.flush()) {
        tracing::warn!(error = %e, "failed to announce shutdown");
    }
    false
}
