/*!
 * resql completion helper
 *
 * Main interface integrating completion and hints, implementing the rustyline
 * traits. Callbacks run on every keystroke and block on the oracle, so a lost
 * connection cannot be raised here; it is recorded for the session loop to
 * act on once `readline` returns.
 */

use super::engine::CompletionEngine;
use super::hint::{HintEngine, HINT_STYLE};
use super::oracle::CompletionOracle;
use crate::commands::META_COMMANDS;
use crate::database::QueryClient;
use crate::error::ClientError;
use regex::Regex;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Context;
use std::borrow::Cow;
use std::io;
use std::sync::{Arc, Mutex};

/// resql Helper (integrating all functionality)
pub struct ResqlHelper<C> {
    completion: CompletionEngine<C>,
    hints: HintEngine<C>,
    command_pattern: Option<Regex>,
    disconnected: Mutex<Option<ClientError>>,
}

impl<C: QueryClient> ResqlHelper<C> {
    pub fn new(client: Arc<Mutex<C>>) -> Self {
        let oracle = CompletionOracle::new(client);
        let commands: Vec<String> = META_COMMANDS.iter().map(|c| regex::escape(c)).collect();
        let pattern = format!(r"^(?:{})\b", commands.join("|"));

        Self {
            completion: CompletionEngine::new(oracle.clone()),
            hints: HintEngine::new(oracle),
            command_pattern: Regex::new(&pattern).ok(),
            disconnected: Mutex::new(None),
        }
    }

    /// Connection error seen by a callback since the last call.
    pub fn take_disconnect(&self) -> Option<ClientError> {
        self.disconnected.lock().ok().and_then(|mut slot| slot.take())
    }

    fn record_disconnect(&self, err: ClientError) {
        tracing::warn!(error = %err, "connection lost during completion");
        if let Ok(mut slot) = self.disconnected.lock() {
            slot.get_or_insert(err);
        }
    }
}

impl<C: QueryClient> Completer for ResqlHelper<C> {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        match self.completion.complete(&line[..pos]) {
            // Completions are whole lines, so they replace from the start.
            Ok(lines) => Ok((
                0,
                lines
                    .into_iter()
                    .map(|line| Pair {
                        display: line.clone(),
                        replacement: line,
                    })
                    .collect(),
            )),
            Err(err) => {
                self.record_disconnect(err.clone());
                Err(ReadlineError::Io(io::Error::new(
                    io::ErrorKind::ConnectionAborted,
                    err,
                )))
            }
        }
    }
}

impl<C: QueryClient> Hinter for ResqlHelper<C> {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }

        match self.hints.hint(line) {
            Ok(hint) => hint.and_then(|h| h.remainder().map(str::to_string)),
            Err(err) => {
                self.record_disconnect(err);
                None
            }
        }
    }
}

impl<C: QueryClient> Highlighter for ResqlHelper<C> {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        // Bold a recognised dot-command at the start of the line
        match &self.command_pattern {
            Some(re) => re.replace(line, "\x1b[1m$0\x1b[0m"),
            None => Cow::Borrowed(line),
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(HINT_STYLE.paint(hint))
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('.')
    }
}

impl<C: QueryClient> Validator for ResqlHelper<C> {}

impl<C: QueryClient> rustyline::Helper for ResqlHelper<C> {}
