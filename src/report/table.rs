//! Generic named-column tables handed to the renderers.

use serde::Serialize;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Integer(u64),
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Text value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Cell::Integer(n)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Cell::Integer(n as u64)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Integer(n as u64)
    }
}

/// An ordered table with named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Report or section name (used as the worksheet name).
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in the named column.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)
    }

    /// All cells of the named column.
    pub fn column(&self, column: &str) -> Vec<&Cell> {
        match self.column_index(column) {
            Some(col) => self.rows.iter().filter_map(|r| r.get(col)).collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_pads_to_columns() {
        let mut table = Table::new("T", ["A", "B", "C"]);
        table.push_row(vec![Cell::from("x")]);
        assert_eq!(table.rows[0], vec![Cell::from("x"), Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn test_cell_lookup() {
        let mut table = Table::new("T", ["Qty", "Tag"]);
        table.push_row(vec![Cell::from(3u32), Cell::from("A")]);
        assert_eq!(table.cell(0, "Qty").and_then(Cell::as_f64), Some(3.0));
        assert_eq!(table.cell(0, "Tag").and_then(Cell::as_str), Some("A"));
        assert!(table.cell(0, "Missing").is_none());
        assert!(table.cell(1, "Qty").is_none());
    }
}
