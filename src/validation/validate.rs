//! Non-aborting validation of a unit table against a configuration.

use crate::config::{Configuration, LARGE_QTY_WARNING};
use crate::error::{CutlistError, Result};
use crate::model::UnitRow;
use crate::transform::{compute_row, geometry_violations};
use std::collections::HashMap;

/// Validation result with warnings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Whether validation passed.
    pub passed: bool,
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Error messages.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Create a passing result.
    pub fn ok() -> Self {
        Self {
            passed: true,
            ..Default::default()
        }
    }

    /// Add a warning.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Add an error.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        if !other.passed {
            self.passed = false;
        }
    }
}

/// Validate all rows, collecting every problem instead of stopping at the first.
pub fn validate_units(rows: &[UnitRow], config: &Configuration) -> Result<ValidationResult> {
    if rows.is_empty() {
        return Err(CutlistError::EmptyInput);
    }

    let mut result = ValidationResult::ok();

    for row in rows {
        result.merge(validate_row(row, config));
    }

    result.merge(check_tag_spelling(rows));
    result.merge(check_repeated_units(rows));

    Ok(result)
}

/// Validate a single row's geometry and quantity.
pub fn validate_row(row: &UnitRow, config: &Configuration) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let derived = compute_row(row, config);
    for err in geometry_violations(&derived, config.round_glass) {
        result.add_error(err.to_string());
    }

    if row.qty > LARGE_QTY_WARNING {
        result.add_warning(format!(
            "Row {} (tag '{}'): quantity {} is unusually large",
            row.row, row.tag, row.qty
        ));
    }

    result
}

/// Warn about tags that differ only in case or surrounding whitespace.
pub fn check_tag_spelling(rows: &[UnitRow]) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let mut spellings: Vec<(String, Vec<&str>)> = Vec::new();

    for row in rows {
        let key = row.tag.trim().to_lowercase();
        match spellings.iter_mut().find(|(k, _)| *k == key) {
            Some((_, seen)) => {
                if !seen.contains(&row.tag.as_str()) {
                    seen.push(&row.tag);
                }
            }
            None => spellings.push((key, vec![row.tag.as_str()])),
        }
    }

    for (_, seen) in spellings.iter().filter(|(_, seen)| seen.len() > 1) {
        result.add_warning(format!(
            "Tags {} differ only in case or spacing and will be reported separately",
            seen.iter()
                .map(|t| format!("'{}'", t))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    result
}

/// Warn about units listed on more than one row with the same tag and size.
pub fn check_repeated_units(rows: &[UnitRow]) -> ValidationResult {
    let mut result = ValidationResult::ok();
    let mut first_seen: HashMap<(String, u64, u64), usize> = HashMap::new();

    for row in rows {
        let key = (
            row.tag.clone(),
            row.overall_width_in.to_bits(),
            row.overall_height_in.to_bits(),
        );
        if let Some(first) = first_seen.get(&key) {
            result.add_warning(format!(
                "Row {} repeats row {} (tag '{}', {} x {} in); quantities are summed in the cut list",
                row.row, first, row.tag, row.overall_width_in, row.overall_height_in
            ));
        } else {
            first_seen.insert(key, row.row);
        }
    }

    result
}
