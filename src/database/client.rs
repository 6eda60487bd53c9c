use super::result::ResultSet;
use crate::error::ClientError;

/// SQL text plus its named parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<(String, String)>,
    is_query: bool,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            is_query: false,
        }
    }

    /// Mark the statement as read-only.
    pub fn query(mut self) -> Self {
        self.is_query = true;
        self
    }

    /// Bind a text value to a named parameter such as `:head`.
    pub fn bind(mut self, name: &str, value: &str) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_query(&self) -> bool {
        self.is_query
    }
}

/// Connection to the SQL service.
///
/// Implementations report transport failures as [`ClientError::Connection`]
/// and rejected statements as [`ClientError::Query`].
pub trait QueryClient {
    fn execute(&mut self, statement: &Statement) -> Result<ResultSet, ClientError>;

    /// Version string shown in the interactive banner.
    fn server_version(&self) -> Option<String> {
        None
    }
}
