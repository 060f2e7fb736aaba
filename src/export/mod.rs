use crate::aggregation::{Aggregation, AggregationWindow, MetricAggregator};
use crate::error::{BodyTrackError, ExportError};
use crate::models::{MeasurementEntry, MeasurementKind, NutritionLogEntry, UnitSystem};
use crate::nutrition::{nutrition_progression, total_calories, CalorieTotal, NutritionProgression};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub mod csv;
pub mod json;
pub mod text;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Text => "text",
        }
    }

    /// Guess the format from an output file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aggregated measurement series ready to be written out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub generated_at: DateTime<Utc>,
    pub kind: MeasurementKind,
    pub aggregation: Aggregation,
}

impl MetricsReport {
    pub fn new(kind: MeasurementKind, aggregation: Aggregation) -> Self {
        MetricsReport {
            generated_at: Utc::now(),
            kind,
            aggregation,
        }
    }
}

/// Calorie progression ready to be written out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionReport {
    pub generated_at: DateTime<Utc>,
    pub progression: NutritionProgression,

    /// Every item inside the window
    pub total: CalorieTotal,
}

/// Builds reports and writes them in the requested format
#[derive(Debug, Clone, Default)]
pub struct ExportManager {
    aggregator: MetricAggregator,
}

impl ExportManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aggregator(aggregator: MetricAggregator) -> Self {
        ExportManager { aggregator }
    }

    /// Aggregate one kind of measurement over the window
    pub fn build_report(
        &self,
        entries: &[MeasurementEntry],
        kind: MeasurementKind,
        window: &AggregationWindow,
        display_unit: UnitSystem,
    ) -> Result<MetricsReport, BodyTrackError> {
        let of_kind: Vec<MeasurementEntry> = entries
            .iter()
            .filter(|entry| entry.kind() == kind)
            .cloned()
            .collect();

        let aggregation = self.aggregator.aggregate(&of_kind, window, display_unit)?;
        Ok(MetricsReport::new(kind, aggregation))
    }

    /// Daily calorie totals over the window
    pub fn build_nutrition_report(
        &self,
        entries: &[NutritionLogEntry],
        window: &AggregationWindow,
    ) -> NutritionReport {
        let in_window: Vec<NutritionLogEntry> = entries
            .iter()
            .filter(|entry| window.contains(entry.date))
            .cloned()
            .collect();

        NutritionReport {
            generated_at: Utc::now(),
            progression: nutrition_progression(&in_window, window),
            total: total_calories(&in_window),
        }
    }

    /// Write a measurement report
    pub fn export<P: AsRef<Path>>(
        &self,
        report: &MetricsReport,
        format: ExportFormat,
        output_path: P,
    ) -> Result<(), ExportError> {
        tracing::info!(
            kind = %report.kind,
            format = %format,
            entries = report.aggregation.normalized.len(),
            path = %output_path.as_ref().display(),
            "Exporting measurement report"
        );

        match format {
            ExportFormat::Csv => csv::export_series(&report.aggregation, output_path),
            ExportFormat::Json => json::export_metrics_report(report, output_path),
            ExportFormat::Text => text::export_metrics_report(report, output_path),
        }
    }

    /// Write a nutrition report
    pub fn export_nutrition<P: AsRef<Path>>(
        &self,
        report: &NutritionReport,
        format: ExportFormat,
        output_path: P,
    ) -> Result<(), ExportError> {
        tracing::info!(
            format = %format,
            days = report.progression.days.len(),
            path = %output_path.as_ref().display(),
            "Exporting nutrition report"
        );

        match format {
            ExportFormat::Csv => csv::export_daily_nutrition(&report.progression.days, output_path),
            ExportFormat::Json => json::export_json(report, output_path),
            ExportFormat::Text => text::export_nutrition_report(report, output_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn window() -> AggregationWindow {
        AggregationWindow::new(date(1), date(31)).unwrap()
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(_))
        ));
        assert_eq!(
            ExportFormat::from_path(Path::new("out/report.json")),
            Some(ExportFormat::Json)
        );
        assert_eq!(ExportFormat::from_path(Path::new("report")), None);
    }

    #[test]
    fn test_build_report_filters_kind() {
        let entries = vec![
            MeasurementEntry::new(date(1), dec!(80), UnitSystem::Metric, MeasurementKind::Weight),
            MeasurementEntry::new(
                date(1),
                dec!(85),
                UnitSystem::Metric,
                MeasurementKind::LinearMeasurement,
            ),
            MeasurementEntry::new(date(8), dec!(78), UnitSystem::Metric, MeasurementKind::Weight),
        ];

        let report = ExportManager::new()
            .build_report(&entries, MeasurementKind::Weight, &window(), UnitSystem::Imperial)
            .unwrap();

        assert_eq!(report.kind, MeasurementKind::Weight);
        assert_eq!(report.aggregation.values(), vec![dec!(176.4), dec!(172.0)]);
    }

    #[test]
    fn test_export_every_format() {
        let dir = TempDir::new().unwrap();
        let entries = vec![
            MeasurementEntry::new(date(2), dec!(80), UnitSystem::Metric, MeasurementKind::Weight),
            MeasurementEntry::new(date(9), dec!(79), UnitSystem::Metric, MeasurementKind::Weight),
        ];
        let manager = ExportManager::new();
        let report = manager
            .build_report(&entries, MeasurementKind::Weight, &window(), UnitSystem::Metric)
            .unwrap();

        for format in [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Text] {
            let path = dir.path().join(format!("report.{}", format));
            manager.export(&report, format, &path).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn test_nutrition_report_only_counts_window() {
        let entries = vec![
            NutritionLogEntry::new(date(1), "Oats", dec!(150)),
            NutritionLogEntry::new(date(2), "Rice", dec!(337.5)),
            NutritionLogEntry::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), "Late", dec!(999)),
        ];

        let report = ExportManager::new().build_nutrition_report(&entries, &window());
        assert_eq!(report.total.exact, dec!(487.5));
        assert_eq!(report.total.rounded, dec!(488));
        assert_eq!(report.progression.days.len(), 2);
    }
}
