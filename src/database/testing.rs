/*!
 * Scripted in-memory client for unit tests.
 */

use super::client::{QueryClient, Statement};
use super::result::{Cell, ResultSet};
use crate::error::ClientError;

pub struct ScriptedClient {
    rules: Vec<(String, Result<ResultSet, ClientError>)>,
    pub executed: Vec<Statement>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            executed: Vec::new(),
        }
    }

    /// Reply with `reply` to any statement whose SQL contains `fragment`.
    pub fn on(mut self, fragment: &str, reply: Result<ResultSet, ClientError>) -> Self {
        self.rules.push((fragment.to_string(), reply));
        self
    }

    /// Reply to the completion oracle with the given candidates.
    pub fn with_candidates(self, candidates: &[&str]) -> Self {
        let rows = candidates
            .iter()
            .map(|c| vec![Cell::Text(c.to_string())])
            .collect();
        self.on(
            "FROM completion(",
            Ok(ResultSet::new(vec!["candidate".to_string()], rows)),
        )
    }

    pub fn executed_sql(&self) -> Vec<&str> {
        self.executed.iter().map(|s| s.sql()).collect()
    }
}

impl QueryClient for ScriptedClient {
    fn execute(&mut self, statement: &Statement) -> Result<ResultSet, ClientError> {
        self.executed.push(statement.clone());
        self.rules
            .iter()
            .find(|(fragment, _)| statement.sql().contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Ok(ResultSet::without_rows()))
    }
}
