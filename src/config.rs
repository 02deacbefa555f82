//! Configuration constants, input records and resolution for cutlist runs.

use crate::error::{CutlistError, Result};
use crate::units::{in_to_mm, mm_to_in};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Conversion factor: millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Glass offset for SWR-IG and SWR-VIG profiles (mm).
pub const IG_GLASS_OFFSET_MM: f64 = 11.1125;

/// Glass offset for the plain SWR profile (mm).
pub const SWR_GLASS_OFFSET_MM: f64 = 7.571;

/// Default glass rounding increment (1/16 inch).
pub const DEFAULT_ROUNDING_INCREMENT_IN: f64 = 0.0625;

/// Default glass cutting tolerance shown on reports (inches).
pub const DEFAULT_CUTTING_TOLERANCE_IN: f64 = 0.625;

/// Default joint clearances (inches): top, bottom, left, right.
pub const DEFAULT_JOINT_TOP_IN: f64 = 0.5;
pub const DEFAULT_JOINT_BOTTOM_IN: f64 = 0.125;
pub const DEFAULT_JOINT_LEFT_IN: f64 = 0.25;
pub const DEFAULT_JOINT_RIGHT_IN: f64 = 0.25;

/// Marker written in the Miter column of the aggregated cut list.
pub const MITER_MARKER: &str = "**";

/// Quantity above which a row is flagged during validation.
pub const LARGE_QTY_WARNING: u32 = 500;

/// Unit of measurement for a user-entered length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "in", alias = "inch", alias = "inches")]
    Inches,
    #[serde(rename = "mm", alias = "millimeter", alias = "millimeters")]
    Millimeters,
}

impl Unit {
    /// Parse a unit suffix or name.
    pub fn from_suffix(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "in" | "inch" | "inches" | "\"" => Some(Unit::Inches),
            "mm" | "millimeter" | "millimeters" => Some(Unit::Millimeters),
            _ => None,
        }
    }

    /// Get the conversion factor to convert from this unit to millimeters.
    pub fn to_mm_factor(&self) -> f64 {
        match self {
            Unit::Inches => MM_PER_INCH,
            Unit::Millimeters => 1.0,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Inches => write!(f, "in"),
            Unit::Millimeters => write!(f, "mm"),
        }
    }
}

/// A length entered with an explicit unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeasurementRepr")]
pub struct Measurement {
    pub value: f64,
    pub unit: Unit,
}

impl Measurement {
    pub fn inches(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Inches,
        }
    }

    pub fn millimeters(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Millimeters,
        }
    }

    /// Value in millimeters.
    pub fn to_mm(&self) -> f64 {
        self.value * self.unit.to_mm_factor()
    }

    /// Value in inches.
    pub fn to_in(&self) -> f64 {
        match self.unit {
            Unit::Inches => self.value,
            Unit::Millimeters => mm_to_in(self.value),
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl FromStr for Measurement {
    type Err = String;

    /// Parse `0.5`, `0.5in`, `0.5"`, `12.7mm` or `12.7 mm`. Bare numbers are inches.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (number, suffix) = s.split_at(split);

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| format!("invalid length '{}'", s))?;

        let unit = if suffix.trim().is_empty() {
            Unit::Inches
        } else {
            Unit::from_suffix(suffix)
                .ok_or_else(|| format!("unknown unit '{}' in '{}'", suffix.trim(), s))?
        };

        Ok(Self { value, unit })
    }
}

/// Accepted spellings of a measurement in config files.
#[derive(Deserialize)]
#[serde(untagged)]
enum MeasurementRepr {
    Number(f64),
    Text(String),
    Full {
        value: f64,
        #[serde(default)]
        unit: Unit,
    },
}

impl TryFrom<MeasurementRepr> for Measurement {
    type Error = String;

    fn try_from(repr: MeasurementRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            MeasurementRepr::Number(value) => Ok(Measurement::inches(value)),
            MeasurementRepr::Text(text) => text.parse(),
            MeasurementRepr::Full { value, unit } => Ok(Measurement { value, unit }),
        }
    }
}

/// SWR profile family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SystemType {
    #[default]
    #[serde(rename = "SWR-IG")]
    SwrIg,
    #[serde(rename = "SWR-VIG")]
    SwrVig,
    #[serde(rename = "SWR")]
    Swr,
    #[serde(rename = "Custom")]
    Custom,
}

impl SystemType {
    /// Fixed glass offset (mm) and profile number for known systems.
    pub fn preset(&self) -> Option<(f64, &'static str)> {
        match self {
            SystemType::SwrIg => Some((IG_GLASS_OFFSET_MM, "03003")),
            SystemType::SwrVig => Some((IG_GLASS_OFFSET_MM, "03004")),
            SystemType::Swr => Some((SWR_GLASS_OFFSET_MM, "03002")),
            SystemType::Custom => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemType::SwrIg => "SWR-IG",
            SystemType::SwrVig => "SWR-VIG",
            SystemType::Swr => "SWR",
            SystemType::Custom => "Custom",
        }
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('_', "-").as_str() {
            "SWR-IG" => Ok(SystemType::SwrIg),
            "SWR-VIG" => Ok(SystemType::SwrVig),
            "SWR" => Ok(SystemType::Swr),
            "CUSTOM" => Ok(SystemType::Custom),
            _ => Err(format!(
                "unknown system type '{}' (expected SWR-IG, SWR-VIG, SWR or Custom)",
                s
            )),
        }
    }
}

/// Aluminum finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Finish {
    #[default]
    #[serde(rename = "Mil Finish")]
    MilFinish,
    #[serde(rename = "Clear Anodized")]
    ClearAnodized,
    #[serde(rename = "Black Anodized")]
    BlackAnodized,
    #[serde(rename = "Painted")]
    Painted,
}

impl Finish {
    pub fn as_str(&self) -> &'static str {
        match self {
            Finish::MilFinish => "Mil Finish",
            Finish::ClearAnodized => "Clear Anodized",
            Finish::BlackAnodized => "Black Anodized",
            Finish::Painted => "Painted",
        }
    }
}

impl fmt::Display for Finish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Finish {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "mil" | "milfinish" => Ok(Finish::MilFinish),
            "clear" | "clearanodized" => Ok(Finish::ClearAnodized),
            "black" | "blackanodized" => Ok(Finish::BlackAnodized),
            "painted" => Ok(Finish::Painted),
            _ => Err(format!("unknown finish '{}'", s)),
        }
    }
}

/// Unresolved run settings as entered by the user or read from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigInput {
    pub project_name: String,
    pub project_number: String,
    pub prepared_by: String,
    pub finish: Finish,
    pub system_type: SystemType,
    /// Required for Custom, ignored otherwise.
    pub glass_offset: Option<Measurement>,
    /// Custom profile number; ignored for known systems.
    pub profile_number: Option<String>,
    pub joint_top: Measurement,
    pub joint_bottom: Measurement,
    pub joint_left: Measurement,
    pub joint_right: Measurement,
    pub glass_cutting_tolerance: Measurement,
    pub rounding_increment: Measurement,
    /// Round glass sizes to the rounding increment.
    pub round_glass: bool,
}

impl Default for ConfigInput {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            project_number: String::new(),
            prepared_by: String::new(),
            finish: Finish::default(),
            system_type: SystemType::default(),
            glass_offset: None,
            profile_number: None,
            joint_top: Measurement::inches(DEFAULT_JOINT_TOP_IN),
            joint_bottom: Measurement::inches(DEFAULT_JOINT_BOTTOM_IN),
            joint_left: Measurement::inches(DEFAULT_JOINT_LEFT_IN),
            joint_right: Measurement::inches(DEFAULT_JOINT_RIGHT_IN),
            glass_cutting_tolerance: Measurement::inches(DEFAULT_CUTTING_TOLERANCE_IN),
            rounding_increment: Measurement::inches(DEFAULT_ROUNDING_INCREMENT_IN),
            round_glass: true,
        }
    }
}

impl ConfigInput {
    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CutlistError::ConfigFile {
            message: e.to_string(),
        })
    }

    /// Set all four joints to zero.
    pub fn without_joints(mut self) -> Self {
        let zero = Measurement::inches(0.0);
        self.joint_top = zero;
        self.joint_bottom = zero;
        self.joint_left = zero;
        self.joint_right = zero;
        self
    }
}

/// Project metadata carried onto every report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectInfo {
    pub project_name: String,
    pub project_number: String,
    pub prepared_by: String,
    pub finish: Finish,
}

/// Fully resolved, immutable configuration for one run. Lengths are canonical mm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub project: ProjectInfo,
    pub system_type: SystemType,
    pub glass_offset_mm: f64,
    pub profile_number: Option<String>,
    pub part_number: String,
    pub joint_top_mm: f64,
    pub joint_bottom_mm: f64,
    pub joint_left_mm: f64,
    pub joint_right_mm: f64,
    /// Reported on the parameter block only.
    pub glass_cutting_tolerance_in: f64,
    /// Granularity used when rounding glass sizes.
    pub rounding_increment_in: f64,
    pub round_glass: bool,
    pub generated_at: NaiveDateTime,
}

impl Configuration {
    /// Resolve user input, stamping the current local time.
    pub fn resolve(input: &ConfigInput) -> Result<Self> {
        Self::resolve_at(input, Local::now().naive_local())
    }

    /// Resolve user input with an explicit generation timestamp.
    pub fn resolve_at(input: &ConfigInput, generated_at: NaiveDateTime) -> Result<Self> {
        let (glass_offset_mm, profile_number) = match input.system_type.preset() {
            Some((offset_mm, profile)) => {
                if input.glass_offset.is_some() {
                    warn!(
                        "Ignoring glass offset override: {} uses a fixed offset of {} mm",
                        input.system_type, offset_mm
                    );
                }
                if input.profile_number.is_some() {
                    warn!(
                        "Ignoring profile number override: {} uses profile {}",
                        input.system_type, profile
                    );
                }
                (offset_mm, Some(profile.to_string()))
            }
            None => {
                let offset = input.glass_offset.ok_or_else(|| {
                    CutlistError::config("glass_offset", "required for Custom system type")
                })?;
                let offset_mm = offset.to_mm();
                if !offset_mm.is_finite() || offset_mm <= 0.0 {
                    return Err(CutlistError::config(
                        "glass_offset",
                        format!("must be greater than zero, got {}", offset),
                    ));
                }
                let profile = input
                    .profile_number
                    .as_ref()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty());
                (offset_mm, profile)
            }
        };

        let part_number = match &profile_number {
            Some(profile) => format!("{}-{}", input.system_type, profile),
            None => input.system_type.to_string(),
        };

        let joint_top_mm = non_negative_mm("joint_top", &input.joint_top)?;
        let joint_bottom_mm = non_negative_mm("joint_bottom", &input.joint_bottom)?;
        let joint_left_mm = non_negative_mm("joint_left", &input.joint_left)?;
        let joint_right_mm = non_negative_mm("joint_right", &input.joint_right)?;

        let glass_cutting_tolerance_in =
            positive_in("glass_cutting_tolerance", &input.glass_cutting_tolerance)?;
        let rounding_increment_in = positive_in("rounding_increment", &input.rounding_increment)?;

        if input.project_number.trim().is_empty() {
            warn!("Project number is empty; output file names will not identify the project");
        }

        debug!(
            "Resolved {}: glass offset {} mm, joints T{} B{} L{} R{} mm",
            part_number,
            glass_offset_mm,
            joint_top_mm,
            joint_bottom_mm,
            joint_left_mm,
            joint_right_mm
        );

        Ok(Self {
            project: ProjectInfo {
                project_name: input.project_name.trim().to_string(),
                project_number: input.project_number.trim().to_string(),
                prepared_by: input.prepared_by.trim().to_string(),
                finish: input.finish,
            },
            system_type: input.system_type,
            glass_offset_mm,
            profile_number,
            part_number,
            joint_top_mm,
            joint_bottom_mm,
            joint_left_mm,
            joint_right_mm,
            glass_cutting_tolerance_in,
            rounding_increment_in,
            round_glass: input.round_glass,
            generated_at,
        })
    }

    /// Glass offset in inches.
    pub fn glass_offset_in(&self) -> f64 {
        mm_to_in(self.glass_offset_mm)
    }

    /// Joints in inches: (top, bottom, left, right).
    pub fn joints_in(&self) -> (f64, f64, f64, f64) {
        (
            mm_to_in(self.joint_top_mm),
            mm_to_in(self.joint_bottom_mm),
            mm_to_in(self.joint_left_mm),
            mm_to_in(self.joint_right_mm),
        )
    }

    /// Rounding increment in mm.
    pub fn rounding_increment_mm(&self) -> f64 {
        in_to_mm(self.rounding_increment_in)
    }
}

fn non_negative_mm(field: &str, m: &Measurement) -> Result<f64> {
    let mm = m.to_mm();
    if !mm.is_finite() || mm < 0.0 {
        return Err(CutlistError::config(
            field,
            format!("must not be negative, got {}", m),
        ));
    }
    Ok(mm)
}

fn positive_in(field: &str, m: &Measurement) -> Result<f64> {
    let inches = m.to_in();
    if !inches.is_finite() || inches <= 0.0 {
        return Err(CutlistError::config(
            field,
            format!("must be greater than zero, got {}", m),
        ));
    }
    Ok(inches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ==================== Measurement tests ====================

    #[test]
    fn test_measurement_parse() {
        assert_eq!("0.5".parse::<Measurement>().unwrap(), Measurement::inches(0.5));
        assert_eq!("0.5in".parse::<Measurement>().unwrap(), Measurement::inches(0.5));
        assert_eq!("0.5\"".parse::<Measurement>().unwrap(), Measurement::inches(0.5));
        assert_eq!(
            "12.7 mm".parse::<Measurement>().unwrap(),
            Measurement::millimeters(12.7)
        );
        assert!("abc".parse::<Measurement>().is_err());
        assert!("3ft".parse::<Measurement>().is_err());
    }

    #[test]
    fn test_measurement_conversion() {
        assert!(approx_eq(Measurement::inches(0.5).to_mm(), 12.7));
        assert!(approx_eq(Measurement::millimeters(12.7).to_in(), 0.5));
    }

    // ==================== Enum parsing tests ====================

    #[test]
    fn test_system_type_parse() {
        assert_eq!("swr-ig".parse::<SystemType>().unwrap(), SystemType::SwrIg);
        assert_eq!("SWR_VIG".parse::<SystemType>().unwrap(), SystemType::SwrVig);
        assert_eq!("SWR".parse::<SystemType>().unwrap(), SystemType::Swr);
        assert_eq!("custom".parse::<SystemType>().unwrap(), SystemType::Custom);
        assert!("SWR-X".parse::<SystemType>().is_err());
    }

    #[test]
    fn test_finish_parse() {
        assert_eq!("Clear Anodized".parse::<Finish>().unwrap(), Finish::ClearAnodized);
        assert_eq!("black".parse::<Finish>().unwrap(), Finish::BlackAnodized);
        assert_eq!("mil-finish".parse::<Finish>().unwrap(), Finish::MilFinish);
        assert!("chrome".parse::<Finish>().is_err());
    }

    // ==================== Resolution tests ====================

    #[test]
    fn test_resolve_known_systems() {
        let cases = [
            (SystemType::SwrIg, IG_GLASS_OFFSET_MM, "SWR-IG-03003"),
            (SystemType::SwrVig, IG_GLASS_OFFSET_MM, "SWR-VIG-03004"),
            (SystemType::Swr, SWR_GLASS_OFFSET_MM, "SWR-03002"),
        ];
        for (system_type, offset, part) in cases {
            let input = ConfigInput {
                system_type,
                ..Default::default()
            };
            let config = Configuration::resolve_at(&input, timestamp()).unwrap();
            assert_eq!(config.glass_offset_mm, offset);
            assert_eq!(config.part_number, part);
        }
    }

    #[test]
    fn test_resolve_known_system_ignores_offset_override() {
        let input = ConfigInput {
            system_type: SystemType::Swr,
            glass_offset: Some(Measurement::inches(1.0)),
            ..Default::default()
        };
        let config = Configuration::resolve_at(&input, timestamp()).unwrap();
        assert_eq!(config.glass_offset_mm, SWR_GLASS_OFFSET_MM);
    }

    #[test]
    fn test_resolve_custom_converts_offset() {
        let input = ConfigInput {
            system_type: SystemType::Custom,
            glass_offset: Some(Measurement::inches(0.5)),
            profile_number: Some("09001".into()),
            ..Default::default()
        };
        let config = Configuration::resolve_at(&input, timestamp()).unwrap();
        assert!(approx_eq(config.glass_offset_mm, 12.7));
        assert_eq!(config.part_number, "Custom-09001");
    }

    #[test]
    fn test_resolve_custom_without_profile() {
        let input = ConfigInput {
            system_type: SystemType::Custom,
            glass_offset: Some(Measurement::millimeters(8.0)),
            ..Default::default()
        };
        let config = Configuration::resolve_at(&input, timestamp()).unwrap();
        assert_eq!(config.glass_offset_mm, 8.0);
        assert_eq!(config.profile_number, None);
        assert_eq!(config.part_number, "Custom");
    }

    #[test]
    fn test_resolve_custom_requires_offset() {
        let input = ConfigInput {
            system_type: SystemType::Custom,
            ..Default::default()
        };
        let err = Configuration::resolve_at(&input, timestamp()).unwrap_err();
        assert!(matches!(
            err,
            CutlistError::ConfigValidation { ref field, .. } if field == "glass_offset"
        ));
    }

    #[test]
    fn test_resolve_custom_rejects_zero_offset() {
        let input = ConfigInput {
            system_type: SystemType::Custom,
            glass_offset: Some(Measurement::inches(0.0)),
            ..Default::default()
        };
        assert!(Configuration::resolve_at(&input, timestamp()).is_err());
    }

    #[test]
    fn test_resolve_rejects_negative_joint() {
        let input = ConfigInput {
            joint_left: Measurement::millimeters(-1.0),
            ..Default::default()
        };
        let err = Configuration::resolve_at(&input, timestamp()).unwrap_err();
        assert!(matches!(
            err,
            CutlistError::ConfigValidation { ref field, .. } if field == "joint_left"
        ));
    }

    #[test]
    fn test_resolve_rejects_zero_tolerance() {
        let input = ConfigInput {
            glass_cutting_tolerance: Measurement::inches(0.0),
            ..Default::default()
        };
        assert!(Configuration::resolve_at(&input, timestamp()).is_err());
    }

    #[test]
    fn test_resolve_normalizes_joints_to_mm() {
        let input = ConfigInput {
            joint_top: Measurement::inches(0.5),
            joint_bottom: Measurement::millimeters(3.175),
            ..Default::default()
        };
        let config = Configuration::resolve_at(&input, timestamp()).unwrap();
        assert!(approx_eq(config.joint_top_mm, 12.7));
        assert!(approx_eq(config.joint_bottom_mm, 3.175));
        let (top, bottom, left, right) = config.joints_in();
        assert!(approx_eq(top, 0.5));
        assert!(approx_eq(bottom, 0.125));
        assert!(approx_eq(left, DEFAULT_JOINT_LEFT_IN));
        assert!(approx_eq(right, DEFAULT_JOINT_RIGHT_IN));
    }

    // ==================== TOML tests ====================

    #[test]
    fn test_from_toml_mixed_measurements() {
        let input = ConfigInput::from_toml(
            r#"
project_name = "Tower A"
project_number = "24-118"
system_type = "Custom"
finish = "Black Anodized"
glass_offset = "9.5mm"
joint_top = 0.375
joint_bottom = { value = 6.35, unit = "mm" }
round_glass = false
"#,
        )
        .unwrap();

        assert_eq!(input.project_number, "24-118");
        assert_eq!(input.system_type, SystemType::Custom);
        assert_eq!(input.finish, Finish::BlackAnodized);
        assert_eq!(input.glass_offset, Some(Measurement::millimeters(9.5)));
        assert_eq!(input.joint_top, Measurement::inches(0.375));
        assert_eq!(input.joint_bottom, Measurement::millimeters(6.35));
        assert_eq!(input.joint_left, Measurement::inches(DEFAULT_JOINT_LEFT_IN));
        assert!(!input.round_glass);
    }

    #[test]
    fn test_from_toml_rejects_unknown_key() {
        let err = ConfigInput::from_toml("glass_ofset = 1.0").unwrap_err();
        assert!(matches!(err, CutlistError::ConfigFile { .. }));
    }
}
