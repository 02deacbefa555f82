//! Data model types for cutlist generation.

mod derived_row;
mod unit_row;

pub use derived_row::DerivedRow;
pub use unit_row::UnitRow;
