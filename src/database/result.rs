/*!
 * Query results
 *
 * A result is consumed twice by the renderer (measure, then print), so the
 * cursor contract is restartable but scoped to the single statement that
 * produced it.
 */

use crate::error::CorruptResult;
use std::borrow::Cow;
use std::fmt;
use unicode_width::UnicodeWidthStr;

/// One typed value of a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Integer(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    Null,
}

impl Cell {
    /// Value as printed inside a table cell.
    pub fn table_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => single_line(s),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Terminal columns taken by [`Cell::table_text`].
    pub fn display_len(&self) -> usize {
        self.table_text().width()
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Integer(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{:.6}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Blob(bytes) => write!(f, "{} bytes", bytes.len()),
            Cell::Null => f.write_str("null"),
        }
    }
}

/// Escape line breaks and tabs so a table row stays on one line.
pub fn single_line(s: &str) -> Cow<'_, str> {
    if !s.contains(|c| matches!(c, '\n' | '\r' | '\t')) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        match ch {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Terminal columns taken by `s` once escaped for a table cell.
pub fn text_width(s: &str) -> usize {
    single_line(s).width()
}

/// A named cell of the current row.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub value: &'a Cell,
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    names: &'a [String],
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    pub fn columns(&self) -> impl Iterator<Item = Column<'a>> + 'a {
        let (names, cells) = (self.names, self.cells);
        names
            .iter()
            .zip(cells.iter())
            .map(|(name, value)| Column { name, value })
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }
}

/// Restartable cursor over the rows of one executed statement.
pub trait ResultCursor {
    /// Column names, in result order.
    fn columns(&self) -> &[String];

    /// Number of rows, or `None` when the statement does not produce rows.
    fn row_count(&self) -> Option<u64>;

    /// Next row, `Ok(None)` once the rows are exhausted.
    fn next_row(&mut self) -> Result<Option<Row<'_>>, CorruptResult>;

    /// Rewind to the first row without re-executing the statement.
    fn reset(&mut self);
}

/// Fully buffered result, as returned by every client.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    has_rows: bool,
    position: usize,
}

impl ResultSet {
    /// Result of a statement that returns rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            columns,
            rows,
            has_rows: true,
            position: 0,
        }
    }

    /// Result of a statement with no row output (DDL, DML).
    pub fn without_rows() -> Self {
        Self::default()
    }

    /// All rows, ignoring the cursor position.
    #[cfg(test)]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }
}

impl ResultCursor for ResultSet {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn row_count(&self) -> Option<u64> {
        self.has_rows.then_some(self.rows.len() as u64)
    }

    fn next_row(&mut self) -> Result<Option<Row<'_>>, CorruptResult> {
        let index = self.position;
        let Some(cells) = self.rows.get(index) else {
            return Ok(None);
        };

        if cells.len() != self.columns.len() {
            return Err(CorruptResult {
                row: index,
                expected: self.columns.len(),
                actual: cells.len(),
            });
        }

        self.position += 1;
        Ok(Some(Row {
            names: &self.columns,
            cells,
        }))
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        ResultSet::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![Cell::Integer(1), Cell::Text("alice".to_string())],
                vec![Cell::Integer(2), Cell::Null],
            ],
        )
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Cell::Integer(-42).to_string(), "-42");
        assert_eq!(Cell::Float(1.5).to_string(), "1.500000");
        assert_eq!(Cell::Text("héllo".to_string()).display_len(), 5);
        assert_eq!(Cell::Blob(vec![0; 12]).to_string(), "12 bytes");
        assert_eq!(Cell::Null.display_len(), 4);
    }

    #[test]
    fn test_table_text_is_single_line() {
        let cell = Cell::Text("a\nb\tc".to_string());
        assert_eq!(cell.table_text(), "a\\nb\\tc");
        assert_eq!(cell.display_len(), 7);
        assert!(matches!(single_line("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_wide_characters_count_terminal_columns() {
        assert_eq!(Cell::Text("日本語".to_string()).display_len(), 6);
        assert_eq!(text_width("名前"), 4);
    }

    #[test]
    fn test_cursor_reset_replays_rows() {
        let mut rs = sample();
        let mut first_pass = 0;
        while rs.next_row().unwrap().is_some() {
            first_pass += 1;
        }
        assert_eq!(first_pass, 2);
        assert!(rs.next_row().unwrap().is_none());

        rs.reset();
        let row = rs.next_row().unwrap().unwrap();
        let names: Vec<&str> = row.columns().map(|c| c.name).collect();
        assert_eq!(names, vec!["id", "name"]);
        assert_eq!(row.cells()[0], Cell::Integer(1));
    }

    #[test]
    fn test_row_count_signal() {
        assert_eq!(sample().row_count(), Some(2));
        assert_eq!(ResultSet::without_rows().row_count(), None);
        assert_eq!(ResultSet::new(vec!["x".to_string()], vec![]).row_count(), Some(0));
    }

    #[test]
    fn test_ragged_row_is_corrupt() {
        let mut rs = ResultSet::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Cell::Integer(1)]],
        );
        let err = rs.next_row().unwrap_err();
        assert_eq!(
            err,
            CorruptResult {
                row: 0,
                expected: 2,
                actual: 1
            }
        );
    }
}
