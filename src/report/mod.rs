//! Report builders: glass list, aggregated cut list, tag details and raw table.

mod aggregate;
mod glass;
mod header;
mod swr_table;
mod tag_details;
mod table;

pub use aggregate::{aggregate_cut_lengths, AggCutReport, CutLengthBucket};
pub use glass::{build_glass_report, GlassLine, GlassReport, GLASS_COLUMNS};
pub use header::{ReportHeader, DATE_FORMAT};
pub use swr_table::{build_swr_table, SWR_TABLE_COLUMNS};
pub use tag_details::{
    build_tag_details, positional_cuts, Edge, PositionalCutRecord, TagSection, TAG_DETAIL_COLUMNS,
};
pub use table::{Cell, Table};

use crate::config::Configuration;
use crate::model::DerivedRow;
use serde::Serialize;

/// Every report produced for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSet {
    pub header: ReportHeader,
    pub glass: Table,
    pub agg_cut_only: Table,
    /// One table per tag, in order of first appearance.
    pub tag_details: Vec<Table>,
    pub swr_table: Table,
}

/// Build all reports from validated rows.
pub fn build_reports(rows: &[DerivedRow], config: &Configuration) -> ReportSet {
    let tag_details = build_tag_details(rows)
        .iter()
        .map(|section| section.to_table(&config.part_number, config.project.finish))
        .collect();

    ReportSet {
        header: ReportHeader::from_config(config),
        glass: build_glass_report(rows, config).to_table(),
        agg_cut_only: aggregate_cut_lengths(rows, &config.part_number).to_table(),
        tag_details,
        swr_table: build_swr_table(rows, config),
    }
}
