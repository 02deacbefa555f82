//! swr-cutlist - Glass and aluminum cutlists for structural weather rail (SWR) glazing.
//!
//! Overall opening sizes are read from a comma-separated unit table, reduced to
//! SWR frame sizes by the joint clearances and to glass sizes by the profile's
//! glass offset, then grouped into the fabrication reports.
//!
//! # Example
//!
//! ```no_run
//! use swr_cutlist::{generate_reports, parse_unit_file, ConfigInput, Configuration, SystemType};
//! use std::path::Path;
//!
//! let input = ConfigInput {
//!     project_number: "24-118".into(),
//!     system_type: SystemType::Swr,
//!     ..Default::default()
//! };
//! let config = Configuration::resolve(&input).unwrap();
//! let rows = parse_unit_file(Path::new("units.csv")).unwrap();
//! let reports = generate_reports(&rows, &config).unwrap();
//! println!("{} cut lengths", reports.agg_cut_only.len() - 1);
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod report;
pub mod transform;
pub mod units;
pub mod validation;

// Re-exports for convenience
pub use config::{ConfigInput, Configuration, Finish, Measurement, SystemType, Unit};
pub use error::{CutlistError, Result};
pub use generator::{render_reports, write_reports, OutputFormat, ReportKind};
pub use model::{DerivedRow, UnitRow};
pub use parser::{parse_unit_file, template_csv, UnitTableParser};
pub use report::{build_reports, Cell, ReportSet, Table};
pub use transform::{derive_row, derive_rows};
pub use validation::{validate_units, ValidationResult};

/// Run the full pipeline on parsed rows.
///
/// 1. Derive SWR and glass dimensions (aborts on the first geometry error)
/// 2. Build the glass, aggregated cut, tag detail and raw table reports
///
/// Nothing is rendered here, so a failure never leaves partial reports behind.
pub fn generate_reports(rows: &[UnitRow], config: &Configuration) -> Result<ReportSet> {
    let derived = derive_rows(rows, config)?;
    let reports = build_reports(&derived, config);

    tracing::info!(
        "Built reports for {} row(s): {} cut length(s), {} tag(s)",
        derived.len(),
        reports.agg_cut_only.len().saturating_sub(1),
        reports.tag_details.len()
    );

    Ok(reports)
}

/// Parse a unit table file and resolve the configuration, then run the pipeline.
pub fn generate_reports_from_file(
    input_path: &std::path::Path,
    input: &ConfigInput,
) -> Result<(Configuration, ReportSet)> {
    let config = Configuration::resolve(input)?;
    let rows = parse_unit_file(input_path)?;
    let reports = generate_reports(&rows, &config)?;
    Ok((config, reports))
}
