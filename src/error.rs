//! Unified error hierarchy for bodytrack
//!
//! Structured error types for conversion, aggregation, import and export, with
//! severity levels that map onto the tracing system.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{MeasurementKind, UnitSystem};

/// Top-level error type for all bodytrack operations
#[derive(Debug, Error)]
pub enum BodyTrackError {
    /// Unit conversion errors
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    /// Aggregation input errors
    #[error("Aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// Import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Unit conversion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// The conversion table has no factor for this kind and direction.
    /// Raised when a kind is introduced without updating the table.
    #[error("No conversion for {kind} from {from} to {to}")]
    InvalidUnitKind {
        kind: MeasurementKind,
        from: UnitSystem,
        to: UnitSystem,
    },

    /// The converted value does not fit in a `Decimal`
    #[error("{kind} value {value} cannot be expressed in {to} units")]
    OutOfRange {
        kind: MeasurementKind,
        value: Decimal,
        to: UnitSystem,
    },
}

/// Aggregation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// Window start falls after its end
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    /// Unrecognised relative range
    #[error("Invalid range selector: {0}")]
    InvalidRange(String),
}

/// Import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// No importer handles this file
    #[error("Unsupported format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Format-specific parsing error
    #[error("Parse error in {format}: {reason}")]
    ParseError { format: String, reason: String },

    /// Required field missing from a record
    #[error("Record {record}: missing required field {field}")]
    MissingField { record: usize, field: String },

    /// Field present but invalid
    #[error("Record {record}: invalid {field}: {reason}")]
    InvalidField {
        record: usize,
        field: String,
        reason: String,
    },

    /// Underlying file error
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bodytrack operations
pub type Result<T> = std::result::Result<T, BodyTrackError>;

impl BodyTrackError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // A missing conversion means the table and the kinds drifted apart
            BodyTrackError::Unit(UnitError::InvalidUnitKind { .. }) => ErrorSeverity::Critical,
            BodyTrackError::Aggregation(_) => ErrorSeverity::Warning,
            BodyTrackError::Import(ImportError::MissingField { .. })
            | BodyTrackError::Import(ImportError::InvalidField { .. }) => ErrorSeverity::Warning,
            BodyTrackError::Validation(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            BodyTrackError::Unit(UnitError::InvalidUnitKind { kind, .. }) => {
                format!(
                    "{} values cannot be converted between unit systems yet.",
                    kind.display_name()
                )
            }
            BodyTrackError::Aggregation(AggregationError::InvalidWindow { start, end }) => {
                format!("The date range is reversed: {} comes after {}.", start, end)
            }
            BodyTrackError::Import(ImportError::UnsupportedFormat { path }) => {
                format!("Don't know how to read {}. Use a .json or .csv file.", path.display())
            }
            BodyTrackError::Import(ImportError::Read { path, .. }) => {
                format!("Could not read entry file: {}", path.display())
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Programming error requiring a code change
    Critical,
    /// Error that prevents the operation
    Error,
    /// Bad input the user can fix
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = BodyTrackError::Unit(UnitError::InvalidUnitKind {
            kind: MeasurementKind::LinearMeasurement,
            from: UnitSystem::Metric,
            to: UnitSystem::Imperial,
        });
        assert_eq!(err.severity(), ErrorSeverity::Critical);

        let err = BodyTrackError::Validation("bad".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::WARN);

        let err = BodyTrackError::Unit(UnitError::OutOfRange {
            kind: MeasurementKind::Weight,
            value: Decimal::MAX,
            to: UnitSystem::Imperial,
        });
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_user_messages() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = BodyTrackError::from(AggregationError::InvalidWindow { start, end });
        assert!(err.user_message().contains("reversed"));

        let err = BodyTrackError::from(ImportError::UnsupportedFormat {
            path: PathBuf::from("entries.xml"),
        });
        assert!(err.user_message().contains("entries.xml"));
    }

    #[test]
    fn test_invalid_unit_kind_display() {
        let err = UnitError::InvalidUnitKind {
            kind: MeasurementKind::Weight,
            from: UnitSystem::Imperial,
            to: UnitSystem::Metric,
        };
        assert_eq!(err.to_string(), "No conversion for weight from imperial to metric");
    }
}
