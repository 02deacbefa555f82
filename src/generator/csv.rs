//! CSV text rendering.

use super::header_rows;
use crate::report::{Cell, ReportHeader, Table};

/// Decimal places kept in text output.
const TEXT_DECIMALS: usize = 4;

/// Render a table as CSV, optionally preceded by the metadata block and a blank line.
pub fn table_to_csv(table: &Table, header: Option<&ReportHeader>) -> String {
    let mut out = String::new();

    if let Some(header) = header {
        for (label, value) in header_rows(header) {
            push_record(&mut out, [escape_field(label), escape_field(value)]);
        }
        out.push('\n');
    }

    push_record(&mut out, table.columns.iter().map(|c| escape_field(c)));

    for row in &table.rows {
        push_record(&mut out, row.iter().map(format_cell));
    }

    out
}

fn push_record(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let line = fields.into_iter().collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => escape_field(s),
        Cell::Number(n) => format_number(*n),
        Cell::Integer(n) => n.to_string(),
        Cell::Empty => String::new(),
    }
}

/// Format a number with at most four decimals, trailing zeros removed.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    let s = format!("{:.*}", TEXT_DECIMALS, value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Quote a field if it contains a comma, quote or newline.
fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_line;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(40.0), "40");
        assert_eq!(format_number(39.40385826771654), "39.4039");
        assert_eq!(format_number(1000.858), "1000.858");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.00001), "0");
    }

    #[test]
    fn test_table_to_csv_without_header() {
        let mut table = Table::new("T", ["Tag", "Qty", "Length in"]);
        table.push_row(vec![Cell::from("A, east"), Cell::from(4u32), Cell::from(39.25)]);
        table.push_row(vec![Cell::from("Total"), Cell::Empty, Cell::Empty]);

        let csv = table_to_csv(&table, None);
        assert_eq!(csv, "Tag,Qty,Length in\n\"A, east\",4,39.25\nTotal,,\n");
        assert_eq!(
            parse_csv_line(csv.lines().nth(1).unwrap()),
            vec!["A, east", "4", "39.25"]
        );
    }

    #[test]
    fn test_table_to_csv_with_header() {
        let header = ReportHeader {
            entries: vec![("Project Name:".into(), "Tower".into())],
        };
        let table = Table::new("T", ["A"]);
        assert_eq!(
            table_to_csv(&table, Some(&header)),
            "Project Name:,Tower\n\nA\n"
        );
    }
}
