//! Metadata block printed above every report.

use crate::config::Configuration;
use serde::Serialize;

/// Timestamp format used on reports.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label/value pairs describing the project and the resolved parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHeader {
    pub entries: Vec<(String, String)>,
}

impl ReportHeader {
    /// Build the header from a resolved configuration.
    pub fn from_config(config: &Configuration) -> Self {
        let (top, bottom, left, right) = config.joints_in();
        let project = &config.project;

        let entries = vec![
            ("Project Name:", project.project_name.clone()),
            ("Project Number:", project.project_number.clone()),
            (
                "Date Created:",
                config.generated_at.format(DATE_FORMAT).to_string(),
            ),
            ("Prepared By:", project.prepared_by.clone()),
            ("Finish:", project.finish.to_string()),
            ("Part #:", config.part_number.clone()),
            (
                "Glass Offset:",
                both_units(config.glass_offset_in(), config.glass_offset_mm),
            ),
            ("Joint Top:", both_units(top, config.joint_top_mm)),
            ("Joint Bottom:", both_units(bottom, config.joint_bottom_mm)),
            ("Joint Left:", both_units(left, config.joint_left_mm)),
            ("Joint Right:", both_units(right, config.joint_right_mm)),
            (
                "Glass Cutting Tolerance:",
                format!("{:.3} in", config.glass_cutting_tolerance_in),
            ),
            (
                "Glass Rounding:",
                if config.round_glass {
                    format!("{:.4} in", config.rounding_increment_in)
                } else {
                    "none".to_string()
                },
            ),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(label, value)| (label.to_string(), value))
                .collect(),
        }
    }

    /// Value for a label, e.g. `"Project Name:"`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn both_units(inches: f64, mm: f64) -> String {
    format!("{:.3} in ({:.3} mm)", inches, mm)
}
