use super::ExportError;
use crate::aggregation::Aggregation;
use crate::nutrition::DailyNutrition;
use std::path::Path;

fn csv_error(e: csv::Error) -> ExportError {
    ExportError::SerializationError(e.to_string())
}

/// Export a normalized series to CSV, one row per retained day
pub fn export_series<P: AsRef<Path>>(
    aggregation: &Aggregation,
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(output_path).map_err(csv_error)?;

    writer
        .write_record(["date", "value", "unit", "kind", "id"])
        .map_err(csv_error)?;

    for entry in &aggregation.normalized {
        writer
            .write_record([
                entry.date().format("%Y-%m-%d").to_string(),
                entry.value().to_string(),
                entry.kind().unit_symbol(entry.unit()).to_string(),
                entry.kind().as_str().to_string(),
                entry.id().to_string(),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

/// Export daily nutrition totals to CSV (suitable for spreadsheet plotting)
pub fn export_daily_nutrition<P: AsRef<Path>>(
    days: &[DailyNutrition],
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(output_path).map_err(csv_error)?;

    writer
        .write_record([
            "date",
            "calories",
            "calories_rounded",
            "items",
            "protein_g",
            "carbs_g",
            "fat_g",
        ])
        .map_err(csv_error)?;

    for day in days {
        writer
            .write_record([
                day.date.format("%Y-%m-%d").to_string(),
                day.total_calories.to_string(),
                day.rounded_calories().to_string(),
                day.item_count.to_string(),
                day.protein_g.to_string(),
                day.carbs_g.to_string(),
                day.fat_g.to_string(),
            ])
            .map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}
