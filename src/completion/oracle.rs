/*!
 * Completion oracle
 *
 * Identifier candidates come from the server, not from a local catalog.
 */

use crate::database::{QueryClient, ResultCursor, Statement};
use crate::error::ClientError;
use std::sync::{Arc, Mutex};

const COMPLETION_SQL: &str =
    "SELECT DISTINCT candidate COLLATE nocase FROM completion(:head, :all) ORDER BY 1";

/// Server-side identifier completion.
pub struct CompletionOracle<C> {
    client: Arc<Mutex<C>>,
}

impl<C> Clone for CompletionOracle<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: QueryClient> CompletionOracle<C> {
    pub fn new(client: Arc<Mutex<C>>) -> Self {
        Self { client }
    }

    /// Candidates for the partial token `head` typed at the end of `line`,
    /// in server order.
    ///
    /// Only connection errors are returned; a rejected completion query
    /// means there is nothing to offer.
    pub fn candidates(&self, head: &str, line: &str) -> Result<Vec<String>, ClientError> {
        let statement = Statement::new(COMPLETION_SQL)
            .query()
            .bind(":head", head)
            .bind(":all", line);

        let result = {
            let mut client = self
                .client
                .lock()
                .map_err(|_| ClientError::Connection("client lock poisoned".to_string()))?;
            client.execute(&statement)
        };

        let mut rs = match result {
            Ok(rs) => rs,
            Err(e) if e.is_connection() => return Err(e),
            Err(e) => {
                tracing::debug!(error = %e, head, "completion query failed");
                return Ok(Vec::new());
            }
        };

        let mut candidates = Vec::new();
        while let Ok(Some(row)) = rs.next_row() {
            if let Some(text) = row.cells().first().and_then(|c| c.as_text()) {
                candidates.push(text.to_string());
            }
        }
        Ok(candidates)
    }
}
