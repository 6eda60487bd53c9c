/*!
 * Interactive session
 *
 * Owns the connection and the vertical flag, routes every line through the
 * dispatcher and runs either the line-editor loop or the one-shot batch.
 * Every exit from the interactive loop goes through `shut_down`.
 */

use crate::commands::{help_text, Input, MetaCommand, QueryExecutor};
use crate::completion::ResqlHelper;
use crate::config::Settings;
use crate::database::QueryClient;
use crate::error::{CliError, ClientError};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::{DefaultHistory, History};
use rustyline::{CompletionType, Config, EditMode, Editor};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

const PROMPT: &str = "resql> ";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

pub struct Cli<C: QueryClient> {
    client: Arc<Mutex<C>>,
    query_executor: QueryExecutor,
    vertical: bool,
    commands: Vec<String>,
    history_path: PathBuf,
    shutdown: Arc<AtomicBool>,
}

impl<C: QueryClient> Cli<C> {
    pub fn new(client: C, settings: &Settings, shutdown: Arc<AtomicBool>) -> Self {
        Self::with_executor(client, settings, shutdown, QueryExecutor::new())
    }

    pub fn with_executor(
        client: C,
        settings: &Settings,
        shutdown: Arc<AtomicBool>,
        query_executor: QueryExecutor,
    ) -> Self {
        Self {
            client: Arc::new(Mutex::new(client)),
            query_executor,
            vertical: false,
            commands: settings.commands.clone(),
            history_path: settings.history_path.clone(),
            shutdown,
        }
    }

    pub fn run(&mut self) -> Result<Outcome> {
        if self.commands.is_empty() {
            self.run_interactive()
        } else {
            self.run_commands(&mut io::stdout().lock())
        }
    }

    /// Run the `-c` commands in order, stopping at the first failure.
    pub fn run_commands(&mut self, out: &mut dyn Write) -> Result<Outcome> {
        let commands = std::mem::take(&mut self.commands);

        for command in &commands {
            if self.shutdown_requested() {
                return self.shut_down(out);
            }

            if let Err(e) = self.dispatch(command, out) {
                self.report(&e, out)?;
                return Ok(Outcome::Failure);
            }
        }

        Ok(Outcome::Success)
    }

    fn run_interactive(&mut self) -> Result<Outcome> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor: Editor<ResqlHelper<C>, DefaultHistory> = Editor::with_config(config)?;
        editor.set_helper(Some(ResqlHelper::new(Arc::clone(&self.client))));

        let mut stdout = io::stdout();
        self.print_banner(&mut stdout)?;

        if let Err(e) = editor.load_history(&self.history_path) {
            match e {
                ReadlineError::Io(ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(path = %self.history_path.display(), "no history file yet");
                }
                _ => {
                    tracing::warn!(path = %self.history_path.display(), error = %e, "failed to load history");
                }
            }
        }

        loop {
            if self.shutdown_requested() {
                return self.shut_down(&mut stdout);
            }

            let readline = editor.readline(PROMPT);

            // A completion or hint callback may have lost the connection.
            if let Some(err) = editor.helper().and_then(|h| h.take_disconnect()) {
                self.report(&CliError::Client(err), &mut stdout)?;
                return Ok(Outcome::Failure);
            }

            match readline {
                Ok(line) => {
                    if let Some(outcome) =
                        self.submit(&line, editor.history_mut(), &mut stdout)?
                    {
                        return Ok(outcome);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    return self.shut_down(&mut stdout);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Dispatch an interactive line, report its errors and record it.
    ///
    /// Returns the session outcome when the line ended the session.
    fn submit<H: History>(
        &mut self,
        line: &str,
        history: &mut H,
        out: &mut dyn Write,
    ) -> Result<Option<Outcome>> {
        let accepted = match self.dispatch(line, out) {
            Ok(accepted) => accepted,
            Err(e) if e.is_fatal() => {
                self.report(&e, out)?;
                return Ok(Some(Outcome::Failure));
            }
            Err(e) => {
                self.report(&e, out)?;
                true
            }
        };

        if accepted {
            self.remember(history, line.trim());
            writeln!(out)?;
        }
        Ok(None)
    }

    /// Handle one submitted line.
    ///
    /// Returns whether the line was accepted, i.e. belongs in history.
    /// Query errors come back as `Err` for the caller to report.
    pub fn dispatch(&mut self, line: &str, out: &mut dyn Write) -> Result<bool, CliError> {
        let command = match Input::classify(line) {
            Input::Empty => return Ok(false),
            Input::Sql(sql) => {
                self.execute(&sql, out)?;
                return Ok(true);
            }
            Input::Meta(command) => command,
        };

        match command {
            MetaCommand::Help => write!(out, "{}", help_text())?,
            MetaCommand::ToggleVertical => {
                self.vertical = !self.vertical;
                let mode = if self.vertical { "true" } else { "auto" };
                writeln!(out, "Vertical : {} ", mode)?;
            }
            MetaCommand::Schema(None) => writeln!(out, "Syntax : .schema mytable")?,
            MetaCommand::Unrecognized(line) => {
                writeln!(out, "Unrecognized command: {}\n", line)?;
                write!(out, "{}", help_text())?;
                return Ok(false);
            }
            command => {
                if let Some(sql) = command.sql() {
                    self.execute(&sql, out)?;
                }
            }
        }

        Ok(true)
    }

    fn execute(&self, sql: &str, out: &mut dyn Write) -> Result<(), CliError> {
        let mut client = self
            .client
            .lock()
            .map_err(|_| ClientError::Connection("connection lock poisoned".to_string()))?;
        self.query_executor
            .execute(&mut *client, sql, self.vertical, out)
    }

    fn report(&self, err: &CliError, out: &mut dyn Write) -> Result<()> {
        match err {
            CliError::Client(ClientError::Connection(msg)) => {
                writeln!(out, "Disconnected : {} ", msg)?;
            }
            CliError::Client(ClientError::Query(msg)) => {
                writeln!(out, "Error : {} ", msg)?;
            }
            CliError::Io(e) => {
                tracing::error!(error = %e, "failed to write output");
                return Err(anyhow::anyhow!("failed to write output: {}", e));
            }
        }
        Ok(())
    }

    fn print_banner(&self, out: &mut dyn Write) -> Result<()> {
        let version = match self.client.lock() {
            Ok(client) => client.server_version(),
            Err(_) => None,
        };

        writeln!(out, "Connected ")?;
        if let Some(version) = version {
            writeln!(out, "Server version : {} ", version)?;
        }
        writeln!(out, "\nType .help for usage. \n")?;
        Ok(())
    }

    /// Add an accepted line to history and rewrite the history file.
    fn remember<H: History>(&self, history: &mut H, line: &str) {
        if let Err(e) = history.add(line) {
            tracing::warn!(error = %e, "failed to add history entry");
            return;
        }
        if let Err(e) = history.save(&self.history_path) {
            tracing::warn!(path = %self.history_path.display(), error = %e, "failed to save history");
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    fn shut_down(&self, out: &mut dyn Write) -> Result<Outcome> {
        tracing::info!("shutting down");
        // A signalled shutdown was already announced by the handler.
        if !self.shutdown_requested() {
            writeln!(out, "Shutting down.. ")?;
        }
        Ok(Outcome::Success)
    }
}
