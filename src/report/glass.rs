//! Glass cutting list with per-line and total areas.

use super::table::{Cell, Table};
use crate::config::Configuration;
use crate::model::DerivedRow;
use crate::units::{format_fraction, fraction_denominator};
use serde::Serialize;

/// Square inches per square foot.
const SQ_IN_PER_SQ_FT: f64 = 144.0;

pub const GLASS_COLUMNS: [&str; 8] = [
    "Item",
    "Tag",
    "Glass Width in",
    "Glass Height in",
    "Glass Size",
    "Area Each (ft²)",
    "Qty",
    "Area Total (ft²)",
];

/// One glass lite size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlassLine {
    /// 1-based item number.
    pub item: usize,
    pub tag: String,
    pub width_in: f64,
    pub height_in: f64,
    /// Fractional-inch form, e.g. `39 3/8 x 58 7/16`.
    pub size: String,
    pub area_each_sqft: f64,
    pub qty: u32,
    pub area_total_sqft: f64,
}

/// Glass cutting list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlassReport {
    pub lines: Vec<GlassLine>,
    pub total_qty: u64,
    pub total_area_sqft: f64,
}

/// Build the glass list, one line per row in input order.
pub fn build_glass_report(rows: &[DerivedRow], config: &Configuration) -> GlassReport {
    let denominator = fraction_denominator(config.rounding_increment_in);

    let lines: Vec<GlassLine> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let (width_in, height_in) = row.glass_in(config.round_glass);
            let area_each_sqft = width_in * height_in / SQ_IN_PER_SQ_FT;
            GlassLine {
                item: idx + 1,
                tag: row.tag().to_string(),
                width_in,
                height_in,
                size: format!(
                    "{} x {}",
                    format_fraction(width_in, denominator),
                    format_fraction(height_in, denominator)
                ),
                area_each_sqft,
                qty: row.qty(),
                area_total_sqft: row.qty() as f64 * area_each_sqft,
            }
        })
        .collect();

    let total_qty = lines.iter().map(|l| l.qty as u64).sum();
    let total_area_sqft = lines.iter().map(|l| l.area_total_sqft).sum();

    GlassReport {
        lines,
        total_qty,
        total_area_sqft,
    }
}

impl GlassReport {
    /// Render as a table with a trailing totals row.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new("Glass", GLASS_COLUMNS);

        for line in &self.lines {
            table.push_row(vec![
                line.item.into(),
                line.tag.as_str().into(),
                line.width_in.into(),
                line.height_in.into(),
                line.size.as_str().into(),
                line.area_each_sqft.into(),
                line.qty.into(),
                line.area_total_sqft.into(),
            ]);
        }

        table.push_row(vec![
            Cell::text("Total"),
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            self.total_qty.into(),
            self.total_area_sqft.into(),
        ]);

        table
    }
}
