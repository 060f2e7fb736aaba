use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::ImportError;
use crate::import::validation::{RawMeasurement, RawNutrition};
use crate::import::{has_extension, read_file, ImportFormat};

/// CSV importer with flexible column mapping
pub struct CsvImporter {
    column_mapping: HashMap<String, String>,
}

impl CsvImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        // Common column name variations
        Self::add_mapping(&mut column_mapping, "id", &["id", "entry_id", "uuid"]);
        Self::add_mapping(
            &mut column_mapping,
            "date",
            &["date", "day", "logged_on", "measured_on"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "value",
            &["value", "amount", "weight", "measurement", "reading"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "unit",
            &["unit", "units", "unit_system"],
        );
        Self::add_mapping(&mut column_mapping, "kind", &["kind", "type", "metric"]);
        Self::add_mapping(
            &mut column_mapping,
            "created_at",
            &["created_at", "createdat", "created", "timestamp"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "food_name",
            &["food_name", "food", "name", "item"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "calories",
            &["calories", "kcal", "energy"],
        );
        Self::add_mapping(&mut column_mapping, "protein_g", &["protein_g", "protein"]);
        Self::add_mapping(
            &mut column_mapping,
            "carbs_g",
            &["carbs_g", "carbs", "carbohydrates"],
        );
        Self::add_mapping(&mut column_mapping, "fat_g", &["fat_g", "fat"]);

        Self { column_mapping }
    }

    fn add_mapping(mapping: &mut HashMap<String, String>, standard: &str, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard.to_string());
        }
    }

    fn normalize_column_name(&self, name: &str) -> String {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");

        self.column_mapping
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized)
    }

    /// Parse the file into rows keyed by standard column name
    fn read_rows(&self, file_path: &Path) -> Result<Vec<HashMap<String, String>>, ImportError> {
        let content = read_file(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(parse_error)?
            .iter()
            .map(|h| self.normalize_column_name(h))
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record: StringRecord = result.map_err(parse_error)?;
            let row = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .filter(|(_, value)| !value.is_empty())
                .collect();
            rows.push(row);
        }

        Ok(rows)
    }
}

impl ImportFormat for CsvImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, "csv")
    }

    fn read_measurements(&self, file_path: &Path) -> Result<Vec<RawMeasurement>, ImportError> {
        self.read_rows(file_path)?
            .into_iter()
            .enumerate()
            .map(|(record, mut row)| {
                Ok(RawMeasurement {
                    id: row.remove("id"),
                    date: row.remove("date"),
                    value: decimal_field(record, "value", row.remove("value"))?,
                    unit: row.remove("unit"),
                    kind: row.remove("kind"),
                    created_at: row.remove("created_at"),
                })
            })
            .collect()
    }

    fn read_nutrition(&self, file_path: &Path) -> Result<Vec<RawNutrition>, ImportError> {
        self.read_rows(file_path)?
            .into_iter()
            .enumerate()
            .map(|(record, mut row)| {
                Ok(RawNutrition {
                    id: row.remove("id"),
                    date: row.remove("date"),
                    food_name: row.remove("food_name"),
                    calories: decimal_field(record, "calories", row.remove("calories"))?,
                    protein_g: decimal_field(record, "protein_g", row.remove("protein_g"))?,
                    carbs_g: decimal_field(record, "carbs_g", row.remove("carbs_g"))?,
                    fat_g: decimal_field(record, "fat_g", row.remove("fat_g"))?,
                    created_at: row.remove("created_at"),
                })
            })
            .collect()
    }

    fn get_format_name(&self) -> &'static str {
        "csv"
    }
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

fn decimal_field(
    record: usize,
    field: &str,
    value: Option<String>,
) -> Result<Option<Decimal>, ImportError> {
    value
        .map(|v| {
            Decimal::from_str(&v).map_err(|e| ImportError::InvalidField {
                record,
                field: field.to_string(),
                reason: format!("'{}' is not a number: {}", v, e),
            })
        })
        .transpose()
}

fn parse_error(e: csv::Error) -> ImportError {
    ImportError::ParseError {
        format: "csv".to_string(),
        reason: e.to_string(),
    }
}
