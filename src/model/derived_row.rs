//! Frame and glass dimensions computed from a unit row.

use super::UnitRow;
use serde::Serialize;

/// A unit row with its SWR (frame) and glass dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    /// Source row.
    pub unit: UnitRow,
    pub swr_width_mm: f64,
    pub swr_height_mm: f64,
    pub swr_width_in: f64,
    pub swr_height_in: f64,
    pub glass_width_mm: f64,
    pub glass_height_mm: f64,
    pub glass_width_in: f64,
    pub glass_height_in: f64,
    /// Glass width rounded to the configured increment (inches).
    pub glass_width_rounded_in: f64,
    /// Glass height rounded to the configured increment (inches).
    pub glass_height_rounded_in: f64,
}

impl DerivedRow {
    pub fn tag(&self) -> &str {
        &self.unit.tag
    }

    pub fn qty(&self) -> u32 {
        self.unit.qty
    }

    /// Glass (width, height) in inches, rounded or raw.
    pub fn glass_in(&self, rounded: bool) -> (f64, f64) {
        if rounded {
            (self.glass_width_rounded_in, self.glass_height_rounded_in)
        } else {
            (self.glass_width_in, self.glass_height_in)
        }
    }
}
