//! Aggregated aluminum cut list: one row per finished length, one column per tag.

use super::table::{Cell, Table};
use crate::config::MITER_MARKER;
use crate::model::DerivedRow;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Columns around the per-tag columns.
const LEADING_COLUMNS: [&str; 4] = [
    "Part #",
    "Miter",
    "Finished Length in",
    "Finished Length mm",
];
const TOTAL_COLUMN: &str = "Total QTY";

/// Lengths closer than this (inches) share a bucket.
const LENGTH_KEY_SCALE: f64 = 1e6;

/// All cuts of one finished length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutLengthBucket {
    /// Finished length (inches).
    pub length_in: f64,
    /// Finished length (mm).
    pub length_mm: f64,
    /// Doubled quantity per tag.
    pub by_tag: BTreeMap<String, u64>,
    /// Sum over all tags.
    pub total: u64,
}

impl CutLengthBucket {
    fn new(length_in: f64, length_mm: f64) -> Self {
        Self {
            length_in,
            length_mm,
            by_tag: BTreeMap::new(),
            total: 0,
        }
    }

    fn add(&mut self, tag: &str, qty: u64) {
        *self.by_tag.entry(tag.to_string()).or_insert(0) += qty;
        self.total += qty;
    }

    /// Quantity contributed by `tag` (zero if none).
    pub fn qty_for(&self, tag: &str) -> u64 {
        self.by_tag.get(tag).copied().unwrap_or(0)
    }
}

/// Cut-length frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggCutReport {
    pub part_number: String,
    /// Tags in order of first appearance.
    pub tags: Vec<String>,
    /// Buckets in ascending length.
    pub buckets: Vec<CutLengthBucket>,
}

/// Group every SWR width and height into finished-length buckets.
///
/// Widths and heights share one key space. Each row contributes `qty * 2`
/// to the bucket of its width and again to the bucket of its height.
pub fn aggregate_cut_lengths(rows: &[DerivedRow], part_number: &str) -> AggCutReport {
    let mut tags: Vec<String> = Vec::new();
    let mut buckets: BTreeMap<i64, CutLengthBucket> = BTreeMap::new();

    for row in rows {
        if !tags.iter().any(|t| t == row.tag()) {
            tags.push(row.tag().to_string());
        }

        let qty = row.unit.doubled_qty();
        for (length_in, length_mm) in [
            (row.swr_width_in, row.swr_width_mm),
            (row.swr_height_in, row.swr_height_mm),
        ] {
            buckets
                .entry(length_key(length_in))
                .or_insert_with(|| CutLengthBucket::new(length_in, length_mm))
                .add(row.tag(), qty);
        }
    }

    debug!(
        "Aggregated {} row(s) into {} cut length(s) across {} tag(s)",
        rows.len(),
        buckets.len(),
        tags.len()
    );

    AggCutReport {
        part_number: part_number.to_string(),
        tags,
        buckets: buckets.into_values().collect(),
    }
}

/// Bucket key: length in micro-inches, absorbing float noise from unit conversion.
fn length_key(length_in: f64) -> i64 {
    (length_in * LENGTH_KEY_SCALE).round() as i64
}

impl AggCutReport {
    /// Sum of a tag's column across all buckets.
    pub fn tag_total(&self, tag: &str) -> u64 {
        self.buckets.iter().map(|b| b.qty_for(tag)).sum()
    }

    /// Sum of all cuts.
    pub fn grand_total(&self) -> u64 {
        self.buckets.iter().map(|b| b.total).sum()
    }

    /// Per-tag totals keyed by tag.
    pub fn tag_totals(&self) -> HashMap<&str, u64> {
        self.tags
            .iter()
            .map(|t| (t.as_str(), self.tag_total(t)))
            .collect()
    }

    /// Column header for each tag, in tag order.
    ///
    /// A tag spelled like a fixed column (`Part #`, `Total QTY`, ...) gets a
    /// ` (tag)` suffix so every header stays unique.
    pub fn tag_columns(&self) -> Vec<String> {
        let mut used: HashSet<String> = LEADING_COLUMNS
            .iter()
            .chain(std::iter::once(&TOTAL_COLUMN))
            .map(|c| c.to_string())
            .collect();

        self.tags
            .iter()
            .map(|tag| {
                let mut name = tag.clone();
                while used.contains(&name) {
                    name.push_str(" (tag)");
                }
                used.insert(name.clone());
                name
            })
            .collect()
    }

    /// Render as a table with a trailing totals row.
    pub fn to_table(&self) -> Table {
        let mut columns: Vec<String> = LEADING_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(self.tag_columns());
        columns.push(TOTAL_COLUMN.into());

        let mut table = Table::new("AggCutOnly", columns);

        for bucket in &self.buckets {
            let mut row: Vec<Cell> = vec![
                self.part_number.as_str().into(),
                MITER_MARKER.into(),
                bucket.length_in.into(),
                bucket.length_mm.into(),
            ];
            row.extend(self.tags.iter().map(|t| Cell::from(bucket.qty_for(t))));
            row.push(bucket.total.into());
            table.push_row(row);
        }

        let mut totals = vec![Cell::text("Total"), Cell::Empty, Cell::Empty, Cell::Empty];
        totals.extend(self.tags.iter().map(|t| Cell::from(self.tag_total(t))));
        totals.push(self.grand_total().into());
        table.push_row(totals);

        table
    }
}
