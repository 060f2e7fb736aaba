use super::{ExportError, MetricsReport};
use std::io::Write;
use std::path::Path;

/// Export a measurement report to JSON format
pub fn export_metrics_report<P: AsRef<Path>>(
    report: &MetricsReport,
    output_path: P,
) -> Result<(), ExportError> {
    export_json(report, output_path)
}

/// Export any serializable data structure to JSON
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<(), ExportError>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let json_data = serde_json::to_string_pretty(data)
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{aggregate, AggregationWindow};
    use crate::models::{MeasurementEntry, MeasurementKind, UnitSystem};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_metrics_report() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let entries = vec![MeasurementEntry::new(
            day,
            dec!(80),
            UnitSystem::Metric,
            MeasurementKind::Weight,
        )];
        let aggregation = aggregate(
            &entries,
            &AggregationWindow::single_day(day),
            UnitSystem::Imperial,
        )
        .unwrap();
        let report = MetricsReport::new(MeasurementKind::Weight, aggregation);

        let temp_file = NamedTempFile::new().unwrap();
        export_metrics_report(&report, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"kind\": \"weight\""));
        assert!(content.contains("\"display_unit\": \"imperial\""));
        assert!(content.contains("\"176.4\""));

        let parsed: MetricsReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_export_json_generic() {
        let data = vec!["a", "b"];
        let temp_file = NamedTempFile::new().unwrap();
        export_json(&data, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"a\""));
    }
}
