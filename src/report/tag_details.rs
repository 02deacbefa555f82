//! Per-tag positional cut breakdown.

use super::table::Table;
use crate::config::Finish;
use crate::model::DerivedRow;
use serde::Serialize;
use std::fmt;

pub const TAG_DETAIL_COLUMNS: [&str; 8] = [
    "Tag",
    "Row",
    "Part #",
    "Position",
    "Length mm",
    "Length in",
    "Qty",
    "Color/Finish",
];

/// Frame member position within a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Emission order within a unit.
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Whether this member is cut to the SWR width (left/right) rather than the height.
    pub fn uses_width(&self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Left => write!(f, "Left"),
            Edge::Right => write!(f, "Right"),
            Edge::Top => write!(f, "Top"),
            Edge::Bottom => write!(f, "Bottom"),
        }
    }
}

/// One frame member cut for one unit row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionalCutRecord {
    /// Source row number.
    pub row: usize,
    pub edge: Edge,
    pub length_mm: f64,
    pub length_in: f64,
    pub qty: u64,
}

/// All positional cuts for one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSection {
    pub tag: String,
    pub records: Vec<PositionalCutRecord>,
}

/// Expand each row into left/right/top/bottom records, grouped by tag.
///
/// Tags appear in order of first appearance; rows keep input order within a tag.
pub fn build_tag_details(rows: &[DerivedRow]) -> Vec<TagSection> {
    let mut sections: Vec<TagSection> = Vec::new();

    for row in rows {
        let records = positional_cuts(row);
        match sections.iter_mut().find(|s| s.tag == row.tag()) {
            Some(section) => section.records.extend(records),
            None => sections.push(TagSection {
                tag: row.tag().to_string(),
                records,
            }),
        }
    }

    sections
}

/// The four member cuts of one row. Left/right use the SWR width, top/bottom the SWR height.
pub fn positional_cuts(row: &DerivedRow) -> Vec<PositionalCutRecord> {
    Edge::ALL
        .iter()
        .map(|&edge| {
            let (length_mm, length_in) = if edge.uses_width() {
                (row.swr_width_mm, row.swr_width_in)
            } else {
                (row.swr_height_mm, row.swr_height_in)
            };
            PositionalCutRecord {
                row: row.unit.row,
                edge,
                length_mm,
                length_in,
                qty: row.unit.doubled_qty(),
            }
        })
        .collect()
}

impl TagSection {
    /// Render as a table named after the tag.
    pub fn to_table(&self, part_number: &str, finish: Finish) -> Table {
        let mut table = Table::new(self.tag.clone(), TAG_DETAIL_COLUMNS);

        for record in &self.records {
            table.push_row(vec![
                self.tag.as_str().into(),
                record.row.into(),
                part_number.into(),
                record.edge.to_string().into(),
                record.length_mm.into(),
                record.length_in.into(),
                record.qty.into(),
                finish.as_str().into(),
            ]);
        }

        table
    }

    /// Sum of record quantities.
    pub fn total_qty(&self) -> u64 {
        self.records.iter().map(|r| r.qty).sum()
    }
}
