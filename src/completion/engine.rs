/*!
 * Completion engine
 *
 * Decides what the line being typed needs:
 * - Dot-commands are completed locally from the static command list
 * - A trailing partial identifier is completed by the server's oracle
 */

use super::oracle::CompletionOracle;
use super::ranker::rank;
use crate::commands::META_COMMANDS;
use crate::database::QueryClient;
use crate::error::ClientError;

/// Size of the line buffer completions are spliced into, terminator included.
pub const LINE_BUFFER_LEN: usize = 1000;

/// Lines longer than this are not completed at all.
pub const MAX_COMPLETION_LINE: usize = LINE_BUFFER_LEN - 30;

/// Input context analysis result
#[derive(Debug, PartialEq)]
pub enum InputContext {
    /// Line is a dot-command other than `.schema <table>`
    MetaCommand,
    /// Partial identifier starting at byte `head`
    Identifier { head: usize },
    /// Nothing to complete
    NoCompletion,
}

/// Analyze input context
pub fn analyze_context(line: &str) -> InputContext {
    if line.starts_with('.') && !line.starts_with(".schema ") {
        return InputContext::MetaCommand;
    }

    match identifier_boundary(line) {
        Some(head) => InputContext::Identifier { head },
        None => InputContext::NoCompletion,
    }
}

/// Start of the trailing partial identifier (ASCII alphanumerics and `_`).
///
/// `None` when the whole line is one identifier, or when the line does not
/// end in an identifier character.
pub fn identifier_boundary(line: &str) -> Option<usize> {
    let tail = line
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    let head = line.len() - tail;

    (head > 0 && head < line.len()).then_some(head)
}

/// Full-line completions for the line being typed.
pub struct CompletionEngine<C> {
    oracle: CompletionOracle<C>,
}

impl<C: QueryClient> CompletionEngine<C> {
    pub fn new(oracle: CompletionOracle<C>) -> Self {
        Self { oracle }
    }

    /// Candidate replacement lines, best first.
    ///
    /// Only a lost connection is an error; anything else yields no
    /// candidates.
    pub fn complete(&self, line: &str) -> Result<Vec<String>, ClientError> {
        if line.len() > MAX_COMPLETION_LINE {
            return Ok(Vec::new());
        }

        match analyze_context(line) {
            InputContext::MetaCommand => Ok(rank(&META_COMMANDS, line)
                .into_iter()
                .map(str::to_string)
                .collect()),
            InputContext::Identifier { head } => {
                let candidates = self.oracle.candidates(&line[head..], line)?;
                Ok(candidates
                    .into_iter()
                    .filter(|c| head + c.len() < LINE_BUFFER_LEN - 1)
                    .map(|c| format!("{}{}", &line[..head], c))
                    .collect())
            }
            InputContext::NoCompletion => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
