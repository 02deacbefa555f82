//! One glazing unit as read from the input table.

use serde::{Deserialize, Serialize};

/// A rectangular opening with its overall dimensions, quantity and tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRow {
    /// 1-based position among the data rows of the input table.
    pub row: usize,
    /// Overall opening width (inches).
    pub overall_width_in: f64,
    /// Overall opening height (inches).
    pub overall_height_in: f64,
    /// Number of identical units.
    pub qty: u32,
    /// Fabrication group label.
    pub tag: String,
}

impl UnitRow {
    /// Create a new unit row.
    pub fn new(
        row: usize,
        overall_width_in: f64,
        overall_height_in: f64,
        qty: u32,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            row,
            overall_width_in,
            overall_height_in,
            qty,
            tag: tag.into(),
        }
    }

    /// Quantity of cuts per edge class: each unit needs a left and a right
    /// (or top and bottom) piece of the same length.
    pub fn doubled_qty(&self) -> u64 {
        u64::from(self.qty) * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubled_qty() {
        assert_eq!(UnitRow::new(1, 40.0, 60.0, 3, "A").doubled_qty(), 6);
    }

    #[test]
    fn test_doubled_qty_max_quantity() {
        let row = UnitRow::new(1, 40.0, 60.0, u32::MAX, "A");
        assert_eq!(row.doubled_qty(), 8_589_934_590);
    }
}
