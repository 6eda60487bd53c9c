/*!
 * Result rendering
 *
 * Two passes over the cursor: the first measures every column, the second
 * prints. The measured widths decide the layout and are the widths printed,
 * so a table line is always `total_width` columns long.
 */

use crate::config;
use crate::database::result::{single_line, text_width, Cell, ResultCursor};
use crate::error::{CorruptResult, RenderError};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{
    Cell as TableCell, Color, ColumnConstraint, ContentArrangement, Table, TableComponent, Width,
};
use std::io::{self, IsTerminal, Write};

/// Narrowest label column in the vertical layout.
const MIN_LABEL_WIDTH: usize = 15;
const VERTICAL_DIVIDER: &str = "--------------------------";

/// Layout that was used for a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    NoRows,
    Table { rows: usize },
    Vertical { rows: usize },
}

/// Prints result sets as a bordered table, falling back to one field per
/// line when the table is wider than the terminal.
pub struct TableRenderer {
    terminal_width: Option<usize>,
    styled: bool,
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            terminal_width: None,
            styled: io::stdout().is_terminal(),
        }
    }

    /// Renderer with a fixed terminal width and no colors.
    pub fn with_terminal_width(width: usize) -> Self {
        Self {
            terminal_width: Some(width),
            styled: false,
        }
    }

    pub fn render(
        &self,
        out: &mut dyn Write,
        cursor: &mut dyn ResultCursor,
        vertical: bool,
    ) -> Result<RenderOutcome, RenderError> {
        if cursor.row_count().is_none() {
            writeln!(out, "Done. No rows returned. ")?;
            return Ok(RenderOutcome::NoRows);
        }

        let widths = measure(cursor)?;
        cursor.reset();

        let total = total_width(&widths);
        let terminal_width = self
            .terminal_width
            .unwrap_or_else(config::terminal_width);

        if vertical || total > terminal_width {
            tracing::debug!(total, terminal_width, forced = vertical, "vertical layout");
            let rows = print_vertical(out, cursor)?;
            Ok(RenderOutcome::Vertical { rows })
        } else {
            let rows = self.print_table(out, cursor, &widths)?;
            Ok(RenderOutcome::Table { rows })
        }
    }

    fn print_table(
        &self,
        out: &mut dyn Write,
        cursor: &mut dyn ResultCursor,
        widths: &[usize],
    ) -> Result<usize, RenderError> {
        let mut table = Table::new();
        table
            .load_preset(ASCII_FULL)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_style(TableComponent::HeaderLines, '-')
            .set_style(TableComponent::LeftHeaderIntersection, '+')
            .set_style(TableComponent::MiddleHeaderIntersections, '+')
            .set_style(TableComponent::RightHeaderIntersection, '+')
            .set_style(TableComponent::LeftBorderIntersections, '+')
            .set_style(TableComponent::RightBorderIntersections, '+');

        if self.styled {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }

        let header: Vec<TableCell> = cursor
            .columns()
            .iter()
            .map(|name| TableCell::new(single_line(name)).fg(Color::Magenta))
            .collect();
        table.set_header(header);
        // Constraint widths include the one-space padding on each side.
        table.set_constraints(widths.iter().map(|w| {
            ColumnConstraint::Absolute(Width::Fixed(u16::try_from(w + 2).unwrap_or(u16::MAX)))
        }));

        let mut rows = 0;
        while let Some(row) = cursor.next_row()? {
            let cells: Vec<TableCell> = row
                .cells()
                .iter()
                .map(|cell| TableCell::new(cell.table_text()))
                .collect();
            table.add_row(cells);
            rows += 1;
        }

        writeln!(out, "{table}")?;
        Ok(rows)
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Width of every column: the longest of its name and its rendered values.
pub fn measure(cursor: &mut dyn ResultCursor) -> Result<Vec<usize>, CorruptResult> {
    let mut widths: Vec<usize> = cursor.columns().iter().map(|name| text_width(name)).collect();

    while let Some(row) = cursor.next_row()? {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.display_len());
        }
    }

    Ok(widths)
}

/// Printed line length of a table: a leading border plus "| value " per column.
pub fn total_width(widths: &[usize]) -> usize {
    1 + widths.iter().map(|w| w + 3).sum::<usize>()
}

fn print_vertical(out: &mut dyn Write, cursor: &mut dyn ResultCursor) -> Result<usize, RenderError> {
    let label_width = cursor
        .columns()
        .iter()
        .map(|name| name.chars().count())
        .fold(MIN_LABEL_WIDTH, usize::max);

    let mut row_number = 0;
    while let Some(row) = cursor.next_row()? {
        write!(out, "\n{:<label_width$} : {} \n\n", "Row number", row_number)?;
        for column in row.columns() {
            match column.value {
                Cell::Integer(i) => {
                    writeln!(out, "{:<label_width$} : {:<15} ", column.name, i)?
                }
                value => writeln!(out, "{:<label_width$} : {} ", column.name, value)?,
            }
        }
        writeln!(out, "{}", VERTICAL_DIVIDER)?;
        row_number += 1;
    }

    Ok(row_number)
}
