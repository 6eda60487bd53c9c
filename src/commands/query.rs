/*!
 * Statement execution
 *
 * Runs one statement, hands the result to the renderer and prints the row
 * summary.
 */

use super::render::{RenderOutcome, TableRenderer};
use crate::database::{QueryClient, Statement};
use crate::error::{CliError, RenderError};
use std::io::Write;
use std::time::Instant;

pub struct QueryExecutor {
    renderer: TableRenderer,
}

impl QueryExecutor {
    pub fn new() -> Self {
        Self::with_renderer(TableRenderer::new())
    }

    pub fn with_renderer(renderer: TableRenderer) -> Self {
        QueryExecutor { renderer }
    }

    /// Run one statement and print its result.
    ///
    /// Client errors are returned untouched so the caller can decide between
    /// reporting and exiting. A corrupt result only aborts this render.
    pub fn execute<C: QueryClient + ?Sized>(
        &self,
        client: &mut C,
        query: &str,
        vertical: bool,
        out: &mut dyn Write,
    ) -> Result<(), CliError> {
        let start_time = Instant::now();

        if query.trim().is_empty() {
            return Ok(());
        }

        let mut result = client.execute(&Statement::new(query))?;

        match self.renderer.render(out, &mut result, vertical) {
            Ok(RenderOutcome::NoRows) => {}
            Ok(RenderOutcome::Table { rows }) | Ok(RenderOutcome::Vertical { rows }) => {
                let duration = start_time.elapsed();
                if rows == 1 {
                    writeln!(out, "{} row in set ({:.3} sec)", rows, duration.as_secs_f64())?;
                } else {
                    writeln!(out, "{} rows in set ({:.3} sec)", rows, duration.as_secs_f64())?;
                }
            }
            Err(RenderError::Corrupt(e)) => {
                tracing::error!(error = %e, query, "corrupt result set");
                writeln!(out, "Error, result set corrupt! ")?;
            }
            Err(RenderError::Io(e)) => return Err(e.into()),
        }

        Ok(())
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}
