use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::error::ImportError;
use crate::models::{MeasurementEntry, MeasurementKind, NutritionLogEntry, UnitSystem};

/// A measurement record exactly as it arrived from the backend
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMeasurement {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "day", alias = "logged_on")]
    pub date: Option<String>,
    #[serde(default, alias = "weight", alias = "amount")]
    pub value: Option<Decimal>,
    #[serde(default, alias = "units", alias = "unit_system")]
    pub unit: Option<String>,
    #[serde(default, alias = "type", alias = "metric")]
    pub kind: Option<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// A food log record exactly as it arrived from the backend
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawNutrition {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "day", alias = "logged_on")]
    pub date: Option<String>,
    #[serde(default, alias = "name", alias = "food")]
    pub food_name: Option<String>,
    #[serde(default, alias = "kcal", alias = "energy")]
    pub calories: Option<Decimal>,
    #[serde(default, alias = "protein")]
    pub protein_g: Option<Decimal>,
    #[serde(default, alias = "carbs", alias = "carbohydrates")]
    pub carbs_g: Option<Decimal>,
    #[serde(default, alias = "fat")]
    pub fat_g: Option<Decimal>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// Turns raw records into typed entries, rejecting anything malformed
#[derive(Debug, Clone)]
pub struct EntryValidator {
    /// Kind assumed for records that don't state one
    default_kind: Option<MeasurementKind>,

    /// Base time for records without a creation time
    imported_at: DateTime<Utc>,
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Largest energy accepted for one logged item
const MAX_ITEM_CALORIES: Decimal = dec!(50000);
/// Largest macro amount accepted for one logged item
const MAX_ITEM_GRAMS: Decimal = dec!(10000);

impl EntryValidator {
    pub fn new() -> Self {
        Self {
            default_kind: None,
            imported_at: Utc::now(),
        }
    }

    pub fn with_default_kind(mut self, kind: Option<MeasurementKind>) -> Self {
        self.default_kind = kind;
        self
    }

    /// Fix the synthesized creation base, for reproducible imports
    pub fn with_import_time(mut self, imported_at: DateTime<Utc>) -> Self {
        self.imported_at = imported_at;
        self
    }

    /// Validate one measurement record; `record` is its position in the file
    pub fn validate_measurement(
        &self,
        record: usize,
        raw: RawMeasurement,
    ) -> Result<MeasurementEntry, ImportError> {
        let date = parse_date(record, require(record, "date", raw.date.as_deref())?)?;
        let value = raw.value.ok_or_else(|| missing(record, "value"))?;

        let kind = match raw.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(kind) => kind
                .parse::<MeasurementKind>()
                .map_err(|reason| invalid(record, "kind", reason))?,
            None => self.default_kind.ok_or_else(|| missing(record, "kind"))?,
        };

        let unit = match raw.unit.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(symbol) => match MeasurementKind::implied_by_unit(symbol) {
                Some(implied) if implied != kind => {
                    return Err(invalid(
                        record,
                        "unit",
                        format!("'{}' is not a {} unit", symbol, kind.display_name().to_lowercase()),
                    ));
                }
                // `%` names no system
                Some(MeasurementKind::BodyFatPercentage) => UnitSystem::Metric,
                _ => symbol
                    .parse::<UnitSystem>()
                    .map_err(|reason| invalid(record, "unit", reason))?,
            },
            // A percentage reads the same in either system
            None if kind == MeasurementKind::BodyFatPercentage => UnitSystem::Metric,
            None => return Err(missing(record, "unit")),
        };

        if value.is_sign_negative() && !value.is_zero() {
            return Err(invalid(record, "value", format!("must not be negative, got {}", value)));
        }
        let ceiling = kind.max_plausible(unit);
        if value > ceiling {
            return Err(invalid(
                record,
                "value",
                format!("{} {} above {}", kind.display_name().to_lowercase(), value, ceiling),
            ));
        }

        let created_at = self.created_at(record, raw.created_at.as_deref())?;
        let id = raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(MeasurementEntry::with_metadata(id, date, value, unit, kind, created_at))
    }

    /// Validate one food log record
    pub fn validate_nutrition(
        &self,
        record: usize,
        raw: RawNutrition,
    ) -> Result<NutritionLogEntry, ImportError> {
        let date = parse_date(record, require(record, "date", raw.date.as_deref())?)?;
        let food_name = require(record, "food_name", raw.food_name.as_deref())?.to_string();
        let calories = raw.calories.ok_or_else(|| missing(record, "calories"))?;

        for (field, amount, ceiling) in [
            ("calories", Some(calories), MAX_ITEM_CALORIES),
            ("protein_g", raw.protein_g, MAX_ITEM_GRAMS),
            ("carbs_g", raw.carbs_g, MAX_ITEM_GRAMS),
            ("fat_g", raw.fat_g, MAX_ITEM_GRAMS),
        ] {
            if let Some(amount) = amount {
                if amount.is_sign_negative() && !amount.is_zero() {
                    return Err(invalid(record, field, format!("must not be negative, got {}", amount)));
                }
                if amount > ceiling {
                    return Err(invalid(record, field, format!("{} above {}", amount, ceiling)));
                }
            }
        }

        let created_at = self.created_at(record, raw.created_at.as_deref())?;
        let id = raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Ok(NutritionLogEntry {
            id,
            date,
            food_name,
            calories,
            protein_g: raw.protein_g,
            carbs_g: raw.carbs_g,
            fat_g: raw.fat_g,
            created_at,
        })
    }

    fn created_at(&self, record: usize, raw: Option<&str>) -> Result<DateTime<Utc>, ImportError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| invalid(record, "created_at", e.to_string())),
            // Later rows in a file count as created later
            None => Ok(self.imported_at + Duration::milliseconds(record as i64)),
        }
    }
}

impl Default for EntryValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a calendar date in any of the accepted layouts
pub fn parse_date(record: usize, value: &str) -> Result<NaiveDate, ImportError> {
    let value = value.trim();

    for format in &DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    // Full timestamps keep only their calendar day
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }

    Err(invalid(record, "date", format!("unrecognised date '{}'", value)))
}

fn require<'a>(record: usize, field: &str, value: Option<&'a str>) -> Result<&'a str, ImportError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(record, field))
}

fn missing(record: usize, field: &str) -> ImportError {
    ImportError::MissingField {
        record,
        field: field.to_string(),
    }
}

fn invalid(record: usize, field: &str, reason: impl Into<String>) -> ImportError {
    ImportError::InvalidField {
        record,
        field: field.to_string(),
        reason: reason.into(),
    }
}
