use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

use crate::error::ImportError;
use crate::import::validation::{RawMeasurement, RawNutrition};
use crate::import::{has_extension, read_file, ImportFormat};

/// Importer for JSON backend dumps
///
/// Accepts either a bare array of records or an object wrapping the array
/// under `entries` or `data`.
pub struct JsonImporter;

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    List(Vec<T>),
    Wrapped {
        #[serde(alias = "data")]
        entries: Vec<T>,
    },
}

impl<T> Payload<T> {
    fn into_records(self) -> Vec<T> {
        match self {
            Payload::List(records) | Payload::Wrapped { entries: records } => records,
        }
    }
}

impl JsonImporter {
    pub fn new() -> Self {
        Self
    }

    fn read_records<T: DeserializeOwned>(&self, file_path: &Path) -> Result<Vec<T>, ImportError> {
        let content = read_file(file_path)?;
        let payload: Payload<T> =
            serde_json::from_str(&content).map_err(|e| ImportError::ParseError {
                format: "json".to_string(),
                reason: e.to_string(),
            })?;
        Ok(payload.into_records())
    }
}

impl ImportFormat for JsonImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, "json")
    }

    fn read_measurements(&self, file_path: &Path) -> Result<Vec<RawMeasurement>, ImportError> {
        self.read_records(file_path)
    }

    fn read_nutrition(&self, file_path: &Path) -> Result<Vec<RawNutrition>, ImportError> {
        self.read_records(file_path)
    }

    fn get_format_name(&self) -> &'static str {
        "json"
    }
}

impl Default for JsonImporter {
    fn default() -> Self {
        Self::new()
    }
}
