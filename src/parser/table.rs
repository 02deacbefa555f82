//! Comma-separated unit table parser.

use crate::error::{CutlistError, Result};
use crate::model::UnitRow;
use std::path::Path;
use tracing::debug;

/// Overall opening width column.
pub const COL_WIDTH: &str = "Overall Width in";
/// Overall opening height column.
pub const COL_HEIGHT: &str = "Overall Height in";
/// Unit quantity column.
pub const COL_QTY: &str = "Qty";
/// Tag column.
pub const COL_TAG: &str = "Tag";

/// Columns every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_WIDTH, COL_HEIGHT, COL_QTY, COL_TAG];

/// Parse a unit table file.
pub fn parse_unit_file(path: &Path) -> Result<Vec<UnitRow>> {
    let content = std::fs::read_to_string(path)?;
    UnitTableParser::new(&content).parse()
}

/// Input template: header row and one example unit.
pub fn template_csv() -> String {
    format!("{}\n40,60,1,T1\n", REQUIRED_COLUMNS.join(","))
}

/// Unit table parser.
pub struct UnitTableParser {
    /// Non-blank records with the 1-based line number they start on.
    lines: Vec<(usize, String)>,
}

/// Column positions of the required fields.
struct ColumnMap {
    width: usize,
    height: usize,
    qty: usize,
    tag: usize,
}

impl UnitTableParser {
    /// Create a new parser from file content.
    ///
    /// A quoted field may span several physical lines; the record keeps the
    /// line number it starts on.
    pub fn new(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let lines = split_records(content)
            .into_iter()
            .filter(|(_, record)| !is_blank_record(record))
            .collect();
        Self { lines }
    }

    /// Parse all unit rows. Fails on the first malformed row.
    pub fn parse(&self) -> Result<Vec<UnitRow>> {
        let Some(((header_line, header), records)) = self.lines.split_first() else {
            return Err(CutlistError::EmptyInput);
        };

        let columns = Self::map_columns(*header_line, header)?;

        if records.is_empty() {
            return Err(CutlistError::EmptyInput);
        }

        let rows = records
            .iter()
            .enumerate()
            .map(|(idx, (line_no, line))| Self::parse_record(&columns, idx + 1, *line_no, line))
            .collect::<Result<Vec<_>>>()?;

        debug!("Parsed {} unit row(s)", rows.len());

        Ok(rows)
    }

    /// Locate the required columns in the header.
    fn map_columns(line_no: usize, header: &str) -> Result<ColumnMap> {
        let names: Vec<String> = parse_csv_line(header)
            .into_iter()
            .map(|n| n.trim().to_string())
            .collect();

        let find = |column: &str| -> Result<usize> {
            names
                .iter()
                .position(|n| n == column)
                .ok_or_else(|| CutlistError::MissingColumn {
                    column: column.to_string(),
                })
        };

        let columns = ColumnMap {
            width: find(COL_WIDTH)?,
            height: find(COL_HEIGHT)?,
            qty: find(COL_QTY)?,
            tag: find(COL_TAG)?,
        };

        debug!("Header at line {}: {} column(s)", line_no, names.len());

        Ok(columns)
    }

    /// Parse one data record.
    fn parse_record(
        columns: &ColumnMap,
        row: usize,
        line_no: usize,
        line: &str,
    ) -> Result<UnitRow> {
        let fields = parse_csv_line(line);

        let width = field(&fields, columns.width, COL_WIDTH, line_no)?;
        let height = field(&fields, columns.height, COL_HEIGHT, line_no)?;
        let qty = field(&fields, columns.qty, COL_QTY, line_no)?;
        let tag = field(&fields, columns.tag, COL_TAG, line_no)?;

        let overall_width_in = parse_length(width, COL_WIDTH, line_no)?;
        let overall_height_in = parse_length(height, COL_HEIGHT, line_no)?;
        let qty = parse_qty(qty, line_no)?;

        Ok(UnitRow::new(row, overall_width_in, overall_height_in, qty, tag))
    }
}

/// Get a trimmed, non-empty field value.
fn field<'a>(fields: &'a [String], idx: usize, column: &str, line_no: usize) -> Result<&'a str> {
    fields
        .get(idx)
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .ok_or_else(|| CutlistError::input(line_no, format!("missing value for '{}'", column)))
}

/// Parse a positive, finite length.
fn parse_length(value: &str, column: &str, line_no: usize) -> Result<f64> {
    let parsed: f64 = value.parse().map_err(|_| {
        CutlistError::input(line_no, format!("'{}' is not a number: '{}'", column, value))
    })?;

    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(CutlistError::input(
            line_no,
            format!("'{}' must be greater than zero, got {}", column, value),
        ));
    }

    Ok(parsed)
}

/// Parse a positive integer quantity. Whole-valued decimals such as `2.0` are accepted.
fn parse_qty(value: &str, line_no: usize) -> Result<u32> {
    let invalid = || {
        CutlistError::input(
            line_no,
            format!("'{}' must be a positive integer, got '{}'", COL_QTY, value),
        )
    };

    let qty = match value.parse::<u32>() {
        Ok(q) => q,
        Err(_) => {
            let f: f64 = value.parse().map_err(|_| invalid())?;
            if f.fract() != 0.0 || f < 0.0 || f > u32::MAX as f64 {
                return Err(invalid());
            }
            f as u32
        }
    };

    if qty == 0 {
        return Err(invalid());
    }

    Ok(qty)
}

/// Join physical lines into CSV records, keeping newlines inside quotes.
fn split_records(content: &str) -> Vec<(usize, String)> {
    let mut records = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (i, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        let (start, record) = match pending.take() {
            Some((start, mut record)) => {
                record.push('\n');
                record.push_str(line);
                (start, record)
            }
            None => (i + 1, line.to_string()),
        };

        // `""` escapes count twice, so an odd count means an open quote.
        if record.matches('"').count() % 2 == 1 {
            pending = Some((start, record));
        } else {
            records.push((start, record));
        }
    }

    // An unterminated quote runs to the end of input.
    records.extend(pending);
    records
}

/// A record with no content, e.g. a blank line or a row of bare commas.
fn is_blank_record(line: &str) -> bool {
    line.chars().all(|c| c == ',' || c.is_whitespace())
}

/// Split one CSV line into fields, honoring double quotes and `""` escapes.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Overall Width in,Overall Height in,Qty,Tag";

    fn parse(content: &str) -> Result<Vec<UnitRow>> {
        UnitTableParser::new(content).parse()
    }

    // ==================== CSV line tests ====================

    #[test]
    fn test_parse_csv_line_plain() {
        assert_eq!(parse_csv_line("a,b,,c"), vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_parse_csv_line_quoted() {
        assert_eq!(
            parse_csv_line(r#""Tag, with comma","say ""hi""",3"#),
            vec!["Tag, with comma", r#"say "hi""#, "3"]
        );
    }

    #[test]
    fn test_split_records_quoted_newline() {
        let records = split_records("a,b\r\n1,\"two\nlines\"\n3,4\n");
        assert_eq!(
            records,
            vec![
                (1, "a,b".to_string()),
                (2, "1,\"two\nlines\"".to_string()),
                (4, "3,4".to_string()),
            ]
        );
    }

    // ==================== Table parsing tests ====================

    #[test]
    fn test_parse_basic_table() {
        let rows = parse(&format!("{}\n40,60,1,T1\n36.5,48.25,3,T2\n", HEADER)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], UnitRow::new(1, 40.0, 60.0, 1, "T1"));
        assert_eq!(rows[1], UnitRow::new(2, 36.5, 48.25, 3, "T2"));
    }

    #[test]
    fn test_parse_reordered_and_extra_columns() {
        let rows =
            parse("Tag,Notes,Qty,Overall Height in,Overall Width in\nA,lobby,2,30,20\n").unwrap();
        assert_eq!(rows[0], UnitRow::new(1, 20.0, 30.0, 2, "A"));
    }

    #[test]
    fn test_parse_skips_blank_lines_and_bom() {
        let content = format!("\u{feff}{}\r\n\r\n40,60,1,T1\r\n,,,\r\n", HEADER);
        let rows = parse(&content).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tag, "T1");
    }

    #[test]
    fn test_parse_tag_with_quoted_newline() {
        let content = format!("{}\n40,60,1,\"North\nElevation\"\nx,60,1,T2\n", HEADER);
        let err = parse(&content).unwrap_err();
        assert!(matches!(err, CutlistError::InputSchema { line: 4, .. }));

        let rows = parse(&format!("{}\n40,60,1,\"North\nElevation\"\n", HEADER)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tag, "North\nElevation");
    }

    #[test]
    fn test_parse_whole_decimal_qty() {
        let rows = parse(&format!("{}\n40,60,2.0,T1\n", HEADER)).unwrap();
        assert_eq!(rows[0].qty, 2);
    }

    #[test]
    fn test_missing_column() {
        let err = parse("Overall Width in,Overall Height in,Tag\n40,60,T1\n").unwrap_err();
        match err {
            CutlistError::MissingColumn { column } => assert_eq!(column, "Qty"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_width_reports_line() {
        let err = parse(&format!("{}\n40,60,1,T1\nabc,60,1,T2\n", HEADER)).unwrap_err();
        match err {
            CutlistError::InputSchema { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains(COL_WIDTH));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_qty() {
        for qty in ["0", "-1", "1.5", "two"] {
            let err = parse(&format!("{}\n40,60,{},T1\n", HEADER, qty)).unwrap_err();
            assert!(
                matches!(err, CutlistError::InputSchema { line: 2, .. }),
                "qty {}",
                qty
            );
        }
    }

    #[test]
    fn test_rejects_non_positive_dimension() {
        let err = parse(&format!("{}\n40,0,1,T1\n", HEADER)).unwrap_err();
        assert!(matches!(err, CutlistError::InputSchema { .. }));
    }

    #[test]
    fn test_rejects_empty_tag() {
        let err = parse(&format!("{}\n40,60,1,  \n", HEADER)).unwrap_err();
        match err {
            CutlistError::InputSchema { message, .. } => assert!(message.contains("Tag")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_header_only_is_empty_input() {
        assert!(matches!(parse(HEADER), Err(CutlistError::EmptyInput)));
        assert!(matches!(parse(""), Err(CutlistError::EmptyInput)));
    }

    #[test]
    fn test_template_parses() {
        let rows = parse(&template_csv()).unwrap();
        assert_eq!(rows, vec![UnitRow::new(1, 40.0, 60.0, 1, "T1")]);
    }
}
