/*!
 * Error types
 *
 * Splits failures into the kinds the session reacts to differently:
 * connection loss is fatal, query errors are reported and the session goes on,
 * corrupt results only abort the current render.
 */

use thiserror::Error;

/// Failure reported by a query client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The service is unreachable or dropped the connection.
    #[error("{0}")]
    Connection(String),

    /// The statement was rejected.
    #[error("{0}")]
    Query(String),
}

impl ClientError {
    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Connection(_))
    }
}

/// A row does not match the shape of its result set.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {row} has {actual} cells, result set has {expected} columns")]
pub struct CorruptResult {
    pub row: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Rendering failure.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("result set corrupt: {0}")]
    Corrupt(#[from] CorruptResult),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure while dispatching a submitted line.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Connection loss and a broken stdout both end the session.
    pub fn is_fatal(&self) -> bool {
        match self {
            CliError::Client(e) => e.is_connection(),
            CliError::Io(_) => true,
        }
    }
}
