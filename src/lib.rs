// Library interface for bodytrack modules
// This allows integration tests and benchmarks to access the core functionality

pub mod aggregation;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod nutrition;
pub mod preference;
pub mod units;

// Re-export commonly used types for convenience
pub use models::*;
pub use aggregation::{
    aggregate, summarize, Aggregation, AggregationConfig, AggregationWindow, MetricAggregator,
    RangeSelector, Summary,
};
pub use preference::{resolve_for_profile, resolve_preferred_unit};
pub use units::{convert, ConversionTable, UnitConverter};
pub use error::{BodyTrackError, ErrorSeverity, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
