//! Overall -> SWR -> glass dimension pipeline.

use crate::config::Configuration;
use crate::error::{CutlistError, Result};
use crate::model::{DerivedRow, UnitRow};
use crate::units::{in_to_mm, mm_to_in, round_to_nearest};
use tracing::debug;

/// Derive frame and glass dimensions for every row, preserving input order.
///
/// Fails with [`CutlistError::EmptyInput`] for an empty table and with
/// [`CutlistError::Geometry`] on the first row whose joints or glass offset
/// consume the whole opening.
pub fn derive_rows(rows: &[UnitRow], config: &Configuration) -> Result<Vec<DerivedRow>> {
    if rows.is_empty() {
        return Err(CutlistError::EmptyInput);
    }

    let derived = rows
        .iter()
        .map(|row| derive_row(row, config))
        .collect::<Result<Vec<_>>>()?;

    debug!("Derived dimensions for {} row(s)", derived.len());

    Ok(derived)
}

/// Derive frame and glass dimensions for a single unit.
pub fn derive_row(unit: &UnitRow, config: &Configuration) -> Result<DerivedRow> {
    let row = compute_row(unit, config);
    check_geometry(&row, config.round_glass)?;
    Ok(row)
}

/// Unchecked arithmetic; may produce non-positive lengths.
pub(crate) fn compute_row(unit: &UnitRow, config: &Configuration) -> DerivedRow {
    let overall_width_mm = in_to_mm(unit.overall_width_in);
    let overall_height_mm = in_to_mm(unit.overall_height_in);

    let swr_width_mm = overall_width_mm - config.joint_left_mm - config.joint_right_mm;
    let swr_height_mm = overall_height_mm - config.joint_top_mm - config.joint_bottom_mm;

    // Glass sits inside the frame with the offset on both sides.
    let glass_width_mm = swr_width_mm - 2.0 * config.glass_offset_mm;
    let glass_height_mm = swr_height_mm - 2.0 * config.glass_offset_mm;

    let glass_width_in = mm_to_in(glass_width_mm);
    let glass_height_in = mm_to_in(glass_height_mm);

    DerivedRow {
        unit: unit.clone(),
        swr_width_mm,
        swr_height_mm,
        swr_width_in: mm_to_in(swr_width_mm),
        swr_height_in: mm_to_in(swr_height_mm),
        glass_width_mm,
        glass_height_mm,
        glass_width_in,
        glass_height_in,
        glass_width_rounded_in: round_to_nearest(glass_width_in, config.rounding_increment_in),
        glass_height_rounded_in: round_to_nearest(glass_height_in, config.rounding_increment_in),
    }
}

/// Every non-positive dimension of a computed row, in reporting order.
pub(crate) fn geometry_violations(row: &DerivedRow, rounded: bool) -> Vec<CutlistError> {
    let mut checks = vec![
        ("SWR width", row.swr_width_mm),
        ("SWR height", row.swr_height_mm),
        ("glass width", row.glass_width_mm),
        ("glass height", row.glass_height_mm),
    ];
    if rounded {
        checks.push(("rounded glass width", row.glass_width_rounded_in));
        checks.push(("rounded glass height", row.glass_height_rounded_in));
    }

    checks
        .into_iter()
        .filter(|(_, value)| *value <= 0.0)
        .map(|(dimension, value)| CutlistError::Geometry {
            row: row.unit.row,
            tag: row.unit.tag.clone(),
            dimension,
            value,
        })
        .collect()
}

fn check_geometry(row: &DerivedRow, rounded: bool) -> Result<()> {
    match geometry_violations(row, rounded).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
