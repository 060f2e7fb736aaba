use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit system a measurement was recorded in, or is displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl Default for UnitSystem {
    fn default() -> Self {
        UnitSystem::Metric
    }
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// The other unit system
    pub fn opposite(&self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    /// Accepts system names as well as unit symbols that imply a system
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "si" | "kg" | "kgs" | "kilogram" | "kilograms" | "cm" | "centimeter"
            | "centimeters" => Ok(UnitSystem::Metric),
            "imperial" | "us" | "lb" | "lbs" | "pound" | "pounds" | "in" | "inch" | "inches" => {
                Ok(UnitSystem::Imperial)
            }
            other => Err(format!("Unknown unit system: {}", other)),
        }
    }
}

/// What a measurement entry measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    Weight,
    LinearMeasurement,
    BodyFatPercentage,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 3] = [
        MeasurementKind::Weight,
        MeasurementKind::LinearMeasurement,
        MeasurementKind::BodyFatPercentage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKind::Weight => "weight",
            MeasurementKind::LinearMeasurement => "linear_measurement",
            MeasurementKind::BodyFatPercentage => "body_fat_percentage",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MeasurementKind::Weight => "Weight",
            MeasurementKind::LinearMeasurement => "Measurement",
            MeasurementKind::BodyFatPercentage => "Body Fat",
        }
    }

    /// Unit symbol used when rendering a value of this kind
    pub fn unit_symbol(&self, unit: UnitSystem) -> &'static str {
        match (self, unit) {
            (MeasurementKind::Weight, UnitSystem::Metric) => "kg",
            (MeasurementKind::Weight, UnitSystem::Imperial) => "lb",
            (MeasurementKind::LinearMeasurement, UnitSystem::Metric) => "cm",
            (MeasurementKind::LinearMeasurement, UnitSystem::Imperial) => "in",
            (MeasurementKind::BodyFatPercentage, _) => "%",
        }
    }

    /// Kind implied by a unit symbol such as `kg` or `in`
    ///
    /// System names like `metric` imply no kind and return `None`.
    pub fn implied_by_unit(unit: &str) -> Option<MeasurementKind> {
        match unit.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" | "lb" | "lbs" | "pound" | "pounds" => {
                Some(MeasurementKind::Weight)
            }
            "cm" | "centimeter" | "centimeters" | "in" | "inch" | "inches" => {
                Some(MeasurementKind::LinearMeasurement)
            }
            "%" | "percent" => Some(MeasurementKind::BodyFatPercentage),
            _ => None,
        }
    }

    /// Largest value accepted for a human body in the given unit
    pub fn max_plausible(&self, unit: UnitSystem) -> Decimal {
        match (self, unit) {
            (MeasurementKind::Weight, UnitSystem::Metric) => Decimal::from(1_000),
            (MeasurementKind::Weight, UnitSystem::Imperial) => Decimal::from(2_200),
            (MeasurementKind::LinearMeasurement, UnitSystem::Metric) => Decimal::from(500),
            (MeasurementKind::LinearMeasurement, UnitSystem::Imperial) => Decimal::from(200),
            (MeasurementKind::BodyFatPercentage, _) => Decimal::ONE_HUNDRED,
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "weight" | "body_weight" | "bodyweight" => Ok(MeasurementKind::Weight),
            "linear_measurement" | "linear" | "measurement" | "waist" | "length"
            | "circumference" => Ok(MeasurementKind::LinearMeasurement),
            "body_fat_percentage" | "body_fat" | "bodyfat" | "bf" | "fat_percentage" => {
                Ok(MeasurementKind::BodyFatPercentage)
            }
            other => Err(format!("Unknown measurement kind: {}", other)),
        }
    }
}

/// A single logged body measurement
///
/// Entries are never edited in place: a correction is a deletion followed by a
/// new entry, so fields are private and only readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementEntry {
    id: String,
    date: NaiveDate,
    value: Decimal,
    unit: UnitSystem,
    kind: MeasurementKind,
    created_at: DateTime<Utc>,
}

impl MeasurementEntry {
    /// Create an entry stamped with the current time and a fresh id
    pub fn new(date: NaiveDate, value: Decimal, unit: UnitSystem, kind: MeasurementKind) -> Self {
        Self::with_metadata(
            uuid::Uuid::new_v4().to_string(),
            date,
            value,
            unit,
            kind,
            Utc::now(),
        )
    }

    /// Create an entry with an explicit id and creation time
    pub fn with_metadata(
        id: impl Into<String>,
        date: NaiveDate,
        value: Decimal,
        unit: UnitSystem,
        kind: MeasurementKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            value,
            unit,
            kind,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn unit(&self) -> UnitSystem {
        self.unit
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this entry carrying a value expressed in another unit system
    pub(crate) fn restated(&self, value: Decimal, unit: UnitSystem) -> Self {
        Self {
            value,
            unit,
            ..self.clone()
        }
    }
}

/// User profile as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,

    /// Explicit unit preference, if the user declared one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_units: Option<UnitSystem>,
}

/// One logged food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionLogEntry {
    pub id: String,
    pub date: NaiveDate,
    pub food_name: String,

    /// Energy in kcal for the logged quantity
    pub calories: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<Decimal>,

    pub created_at: DateTime<Utc>,
}

impl NutritionLogEntry {
    pub fn new(date: NaiveDate, food_name: impl Into<String>, calories: Decimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            food_name: food_name.into(),
            calories,
            protein_g: None,
            carbs_g: None,
            fat_g: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_macros(
        mut self,
        protein_g: Option<Decimal>,
        carbs_g: Option<Decimal>,
        fat_g: Option<Decimal>,
    ) -> Self {
        self.protein_g = protein_g;
        self.carbs_g = carbs_g;
        self.fat_g = fat_g;
        self
    }
}
