//! Column-aligned text tables.

use std::io::Write;

/// Marker appended to truncated cells.
pub const TRUNCATION_MARKER: &str = "...";

/// Space between columns.
const GUTTER: usize = 2;

/// Shorten `value` to at most `max` characters, ending in `...` when cut.
///
/// Budgets too small to hold the marker cut without one.
pub fn truncate(value: &str, max: usize) -> String {
    let count = value.chars().count();
    if count <= max {
        return value.to_string();
    }
    if max <= TRUNCATION_MARKER.len() {
        return value.chars().take(max).collect();
    }
    let kept: String = value.chars().take(max - TRUNCATION_MARKER.len()).collect();
    format!("{}{}", kept, TRUNCATION_MARKER)
}

#[derive(Debug, Clone)]
struct Column {
    header: String,
    max_width: Option<usize>,
}

/// A header line plus rows, aligned on output.
///
/// Cells longer than a column's budget are truncated when added. The last
/// column is never padded.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unbounded column.
    pub fn column(mut self, header: impl Into<String>) -> Self {
        self.columns.push(Column {
            header: header.into(),
            max_width: None,
        });
        self
    }

    /// Append a column whose cells are truncated to `max_width` characters.
    pub fn truncated(mut self, header: impl Into<String>, max_width: usize) -> Self {
        self.columns.push(Column {
            header: header.into(),
            max_width: Some(max_width),
        });
        self
    }

    /// Table with one unbounded column per header.
    pub fn with_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        headers.into_iter().fold(Self::new(), Table::column)
    }

    /// Add a row. Missing trailing cells render empty; extra cells are dropped.
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.columns.len(), String::new());
        for (cell, column) in cells.iter_mut().zip(&self.columns) {
            if let Some(max) = column.max_width {
                *cell = truncate(cell, max);
            }
        }
        self.rows.push(cells);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(column.header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn write_line(out: &mut dyn Write, cells: &[&str], widths: &[usize]) -> std::io::Result<()> {
        let mut line = String::new();
        let last = cells.len().saturating_sub(1);
        for (i, cell) in cells.iter().enumerate() {
            line.push_str(cell);
            if i < last {
                let pad = widths[i] - cell.chars().count() + GUTTER;
                line.extend(std::iter::repeat_n(' ', pad));
            }
        }
        writeln!(out, "{}", line)
    }

    /// Write the header line and all rows.
    pub fn render(&self, out: &mut dyn Write) -> std::io::Result<()> {
        let widths = self.widths();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header.as_str()).collect();
        Self::write_line(out, &headers, &widths)?;
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            Self::write_line(out, &cells, &widths)?;
        }
        Ok(())
    }

    /// Render to a string.
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail.
        let _ = self.render(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_at_and_over_budget() {
        assert_eq!(truncate("Acme", 4), "Acme");
        assert_eq!(truncate("Acme", 10), "Acme");
        assert_eq!(truncate("Acme Hauling", 8), "Acme ...");
        assert_eq!(truncate("Acme Hauling", 3), "Acm");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("Café Olé", 8), "Café Olé");
        assert_eq!(truncate("Café Olé!", 8), "Café ...");
    }

    #[test]
    fn test_render_aligns_columns_and_leaves_last_unpadded() {
        let mut table = Table::new().column("ID").truncated("NAME", 8).column("STATUS");
        table.add_row(["1", "Acme Hauling", "active"]);
        table.add_row(["200", "Bo", ""]);

        assert_eq!(
            table.to_text(),
            "ID   NAME      STATUS\n\
             1    Acme ...  active\n\
             200  Bo        \n"
        );
    }

    #[test]
    fn test_short_rows_render_empty_cells() {
        let mut table = Table::with_headers(["A", "B", "C"]);
        table.add_row(["x"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.to_text(), "A  B  C\nx     \n");
    }
}
