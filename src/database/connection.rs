use super::client::{QueryClient, Statement};
use super::result::{Cell, ResultSet};
use crate::error::ClientError;
use rusqlite::types::{ToSql, ValueRef};
use rusqlite::{ErrorCode, OpenFlags};
use std::path::Path;
use std::time::Instant;

/// SQL connection over the embedded SQLite engine.
pub struct Connection {
    conn: rusqlite::Connection,
    url: String,
    server_version: String,
}

impl Connection {
    pub fn new(url: &str) -> Result<Self, ClientError> {
        let conn = open_url(url)?;

        let server_version: String = conn
            .query_row("SELECT sqlite_version()", [], |row| row.get(0))
            .map_err(classify)?;

        tracing::debug!(url, %server_version, "connection established");

        Ok(Self {
            conn,
            url: url.to_string(),
            server_version,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn run(&mut self, statement: &Statement) -> Result<ResultSet, ClientError> {
        let mut stmt = self.conn.prepare(statement.sql()).map_err(classify)?;

        if statement.is_query() && !stmt.readonly() {
            return Err(ClientError::Query(
                "statement is not read-only".to_string(),
            ));
        }

        let params: Vec<(&str, &dyn ToSql)> = statement
            .params()
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        let column_count = stmt.column_count();
        if column_count == 0 {
            stmt.execute(params.as_slice()).map_err(classify)?;
            return Ok(ResultSet::without_rows());
        }

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut data = Vec::new();
        let mut rows = stmt.query(params.as_slice()).map_err(classify)?;
        while let Some(row) = rows.next().map_err(classify)? {
            let mut cells = Vec::with_capacity(column_count);
            for i in 0..column_count {
                cells.push(cell_from_value(row.get_ref(i).map_err(classify)?));
            }
            data.push(cells);
        }

        Ok(ResultSet::new(columns, data))
    }
}

impl QueryClient for Connection {
    fn execute(&mut self, statement: &Statement) -> Result<ResultSet, ClientError> {
        let start_time = Instant::now();
        let result = self.run(statement);

        tracing::debug!(
            sql = statement.sql(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "statement executed"
        );

        result
    }

    fn server_version(&self) -> Option<String> {
        Some(format!("SQLite {}", self.server_version))
    }
}

fn open_url(url: &str) -> Result<rusqlite::Connection, ClientError> {
    if url == ":memory:" || url == "memory://" {
        return rusqlite::Connection::open_in_memory().map_err(classify);
    }

    let path = url
        .strip_prefix("file://")
        .or_else(|| url.strip_prefix("sqlite://"));

    match path {
        Some(path) if !path.is_empty() => {
            let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX;
            rusqlite::Connection::open_with_flags(Path::new(path), flags).map_err(classify)
        }
        Some(_) => Err(ClientError::Connection(format!("missing path in url {}", url))),
        None if url.starts_with("tcp://") => Err(ClientError::Connection(format!(
            "no transport available for {}",
            url
        ))),
        None => Err(ClientError::Connection(format!("unsupported url {}", url))),
    }
}

/// Storage and open failures mean the database is gone; everything else is
/// a problem with the statement.
fn classify(err: rusqlite::Error) -> ClientError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                ErrorCode::CannotOpen
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::NotADatabase
                    | ErrorCode::DatabaseCorrupt
            ) =>
        {
            ClientError::Connection(err.to_string())
        }
        _ => ClientError::Query(err.to_string()),
    }
}

fn cell_from_value(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(i) => Cell::Integer(i),
        ValueRef::Real(f) => Cell::Float(f),
        ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Cell::Blob(bytes.to_vec()),
    }
}
