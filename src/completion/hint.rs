/*!
 * Inline hints
 *
 * Greyed-out suggestion shown after the cursor: the top-ranked dot-command,
 * or the first oracle candidate for a partial identifier.
 */

use super::engine::{analyze_context, InputContext};
use super::oracle::CompletionOracle;
use super::ranker::rank;
use crate::commands::META_COMMANDS;
use crate::database::QueryClient;
use crate::error::ClientError;

/// Lines shorter than this get the generic `.tables` nudge.
const HINT_MIN_LEN: usize = 2;

/// Terminal attributes of the hint overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintStyle {
    pub color: u8,
    pub bold: bool,
}

pub const HINT_STYLE: HintStyle = HintStyle {
    color: 35,
    bold: false,
};

impl HintStyle {
    pub fn paint(&self, text: &str) -> String {
        format!("\x1b[{};{}m{}\x1b[0m", u8::from(self.bold), self.color, text)
    }
}

/// Single inline suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    /// The suggested candidate.
    pub text: String,
    pub style: HintStyle,
    /// The typed token the candidate is meant to extend.
    typed: String,
}

impl Hint {
    fn new(text: impl Into<String>, typed: &str) -> Self {
        Self {
            text: text.into(),
            style: HINT_STYLE,
            typed: typed.to_string(),
        }
    }

    /// Characters of the candidate past what was typed, if the candidate
    /// extends the typed token (ignoring ASCII case).
    pub fn remainder(&self) -> Option<&str> {
        let n = self.typed.len();
        if self.text.len() <= n || !self.text.is_char_boundary(n) {
            return None;
        }
        self.text[..n]
            .eq_ignore_ascii_case(&self.typed)
            .then(|| &self.text[n..])
    }
}

/// Produces the greyed-out suggestion shown while typing.
pub struct HintEngine<C> {
    oracle: CompletionOracle<C>,
}

impl<C: QueryClient> HintEngine<C> {
    pub fn new(oracle: CompletionOracle<C>) -> Self {
        Self { oracle }
    }

    pub fn hint(&self, line: &str) -> Result<Option<Hint>, ClientError> {
        match analyze_context(line) {
            InputContext::MetaCommand => Ok(meta_hint(line)),
            InputContext::Identifier { head } => {
                let partial = &line[head..];
                let first = self.oracle.candidates(partial, line)?.into_iter().next();
                Ok(first.map(|candidate| Hint::new(candidate, partial)))
            }
            InputContext::NoCompletion => Ok(None),
        }
    }
}

/// Hint for a dot-command line.
pub fn meta_hint(line: &str) -> Option<Hint> {
    if line.len() < HINT_MIN_LEN {
        return Some(Hint::new(META_COMMANDS[0], line));
    }

    if META_COMMANDS.contains(&line) {
        return None;
    }

    let ranked = rank(&META_COMMANDS, line);
    let top = ranked.first()?;
    (top.as_bytes().first() == line.as_bytes().first()).then(|| Hint::new(*top, line))
}
