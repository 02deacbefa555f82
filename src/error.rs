//! Error types for cutlist generation.

use thiserror::Error;

/// Error codes for cutlist processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Input or output file could not be accessed (-1)
    Io = -1,
    /// Input table has no data rows (-2)
    EmptyInput = -2,
    /// Input table is malformed (-3)
    InputSchema = -3,
    /// Configuration value is missing or out of range (-10)
    ConfigValidation = -10,
    /// Joint or offset exceeds the overall dimension (E100)
    Geometry = 100,
    /// Spreadsheet writer failure (E300)
    Render = 300,
}

/// Main error type for cutlist generation.
#[derive(Debug, Error)]
pub enum CutlistError {
    #[error("Invalid configuration for '{field}': {reason}")]
    ConfigValidation { field: String, reason: String },

    #[error("Failed to parse config file: {message}")]
    ConfigFile { message: String },

    #[error("Input error at line {line}: {message}")]
    InputSchema { line: usize, message: String },

    #[error("Missing required column '{column}' in input table")]
    MissingColumn { column: String },

    #[error("Row {row} (tag '{tag}'): {dimension} is {value:.4}, must be greater than zero")]
    Geometry {
        row: usize,
        tag: String,
        dimension: &'static str,
        value: f64,
    },

    #[error("Input table contains no unit rows")]
    EmptyInput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl CutlistError {
    /// Shorthand for a configuration validation failure.
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CutlistError::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an input schema failure at a 1-based line.
    pub fn input(line: usize, message: impl Into<String>) -> Self {
        CutlistError::InputSchema {
            line,
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CutlistError::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            CutlistError::ConfigFile { .. } => ErrorCode::ConfigValidation,
            CutlistError::InputSchema { .. } => ErrorCode::InputSchema,
            CutlistError::MissingColumn { .. } => ErrorCode::InputSchema,
            CutlistError::Geometry { .. } => ErrorCode::Geometry,
            CutlistError::EmptyInput => ErrorCode::EmptyInput,
            CutlistError::Io(_) => ErrorCode::Io,
            CutlistError::Xlsx(_) => ErrorCode::Render,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for cutlist operations.
pub type Result<T> = std::result::Result<T, CutlistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CutlistError::EmptyInput.code(), ErrorCode::EmptyInput);
        assert_eq!(CutlistError::EmptyInput.code_value(), -2);
        assert_eq!(CutlistError::input(3, "bad").code_value(), -3);
        assert_eq!(
            CutlistError::MissingColumn {
                column: "Tag".into()
            }
            .code(),
            ErrorCode::InputSchema
        );
    }

    #[test]
    fn test_geometry_message_names_row() {
        let err = CutlistError::Geometry {
            row: 4,
            tag: "W1".into(),
            dimension: "SWR width",
            value: -1.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("Row 4"));
        assert!(msg.contains("W1"));
        assert!(msg.contains("SWR width"));
        assert_eq!(err.code_value(), 100);
    }
}
