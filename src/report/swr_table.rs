//! Raw per-row dump of every input and derived dimension.

use super::table::Table;
use crate::config::Configuration;
use crate::model::DerivedRow;

pub const SWR_TABLE_COLUMNS: [&str; 17] = [
    "Row",
    "Tag",
    "Qty",
    "Overall Width in",
    "Overall Height in",
    "SWR Width mm",
    "SWR Height mm",
    "SWR Width in",
    "SWR Height in",
    "Glass Width mm",
    "Glass Height mm",
    "Glass Width in",
    "Glass Height in",
    "Glass Width in (Rounded)",
    "Glass Height in (Rounded)",
    "Part #",
    "Color/Finish",
];

/// Build the raw SWR table.
pub fn build_swr_table(rows: &[DerivedRow], config: &Configuration) -> Table {
    let mut table = Table::new("Table", SWR_TABLE_COLUMNS);

    for row in rows {
        table.push_row(vec![
            row.unit.row.into(),
            row.tag().into(),
            row.qty().into(),
            row.unit.overall_width_in.into(),
            row.unit.overall_height_in.into(),
            row.swr_width_mm.into(),
            row.swr_height_mm.into(),
            row.swr_width_in.into(),
            row.swr_height_in.into(),
            row.glass_width_mm.into(),
            row.glass_height_mm.into(),
            row.glass_width_in.into(),
            row.glass_height_in.into(),
            row.glass_width_rounded_in.into(),
            row.glass_height_rounded_in.into(),
            config.part_number.as_str().into(),
            config.project.finish.as_str().into(),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigInput, SystemType};
    use crate::model::UnitRow;
    use crate::report::table::Cell;
    use crate::transform::derive_rows;
    use chrono::NaiveDate;

    #[test]
    fn test_one_row_per_unit_with_all_columns() {
        let input = ConfigInput {
            system_type: SystemType::SwrIg,
            ..Default::default()
        };
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let config = Configuration::resolve_at(&input, ts).unwrap();
        let rows = derive_rows(
            &[
                UnitRow::new(1, 40.0, 60.0, 1, "A"),
                UnitRow::new(2, 30.0, 50.0, 2, "B"),
            ],
            &config,
        )
        .unwrap();

        let table = build_swr_table(&rows, &config);
        assert_eq!(table.len(), 2);
        assert!(table.rows.iter().all(|r| r.len() == SWR_TABLE_COLUMNS.len()));
        assert_eq!(table.cell(1, "Tag").and_then(Cell::as_str), Some("B"));
        assert_eq!(
            table.cell(0, "SWR Width mm").and_then(Cell::as_f64),
            Some(rows[0].swr_width_mm)
        );
        assert_eq!(table.cell(0, "Part #").and_then(Cell::as_str), Some("SWR-IG-03003"));
    }
}
