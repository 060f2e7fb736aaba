use crate::error::ImportError;
use crate::models::{MeasurementEntry, MeasurementKind, NutritionLogEntry};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

pub mod csv;
pub mod json;
pub mod validation;

use validation::{EntryValidator, RawMeasurement, RawNutrition};

/// Trait for reading backend exports in different file formats
pub trait ImportFormat {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Read measurement records without validating them
    fn read_measurements(&self, file_path: &Path) -> Result<Vec<RawMeasurement>, ImportError>;

    /// Read food log records without validating them
    fn read_nutrition(&self, file_path: &Path) -> Result<Vec<RawNutrition>, ImportError>;

    /// Get the format name for this importer
    fn get_format_name(&self) -> &'static str;
}

/// Manager for coordinating different import formats
pub struct ImportManager {
    importers: Vec<Box<dyn ImportFormat>>,
    validator: EntryValidator,
}

impl ImportManager {
    /// Create a new import manager with all available importers
    pub fn new() -> Self {
        Self::with_validator(EntryValidator::new())
    }

    pub fn with_validator(validator: EntryValidator) -> Self {
        let importers: Vec<Box<dyn ImportFormat>> = vec![
            Box::new(csv::CsvImporter::new()),
            Box::new(json::JsonImporter::new()),
        ];

        Self {
            importers,
            validator,
        }
    }

    /// Only keep importers whose format name is listed
    pub fn restrict_formats(mut self, formats: &[String]) -> Self {
        self.importers.retain(|importer| {
            formats
                .iter()
                .any(|f| f.eq_ignore_ascii_case(importer.get_format_name()))
        });
        self
    }

    /// Manager whose validator assumes `kind` for records without one
    pub fn with_default_kind(kind: Option<MeasurementKind>) -> Self {
        Self::with_validator(EntryValidator::new().with_default_kind(kind))
    }

    fn importer_for(&self, file_path: &Path) -> Result<&dyn ImportFormat, ImportError> {
        self.importers
            .iter()
            .find(|importer| importer.can_import(file_path))
            .map(|importer| &**importer)
            .ok_or_else(|| ImportError::UnsupportedFormat {
                path: file_path.to_path_buf(),
            })
    }

    /// Import measurements from a single file, auto-detecting the format
    ///
    /// One malformed record fails the whole file.
    pub fn import_measurements(
        &self,
        file_path: &Path,
    ) -> Result<Vec<MeasurementEntry>, ImportError> {
        let importer = self.importer_for(file_path)?;
        tracing::info!(
            path = %file_path.display(),
            format = importer.get_format_name(),
            "Importing measurements"
        );

        importer
            .read_measurements(file_path)?
            .into_iter()
            .enumerate()
            .map(|(record, raw)| self.validator.validate_measurement(record, raw))
            .collect()
    }

    /// Import food log items from a single file
    pub fn import_nutrition(
        &self,
        file_path: &Path,
    ) -> Result<Vec<NutritionLogEntry>, ImportError> {
        let importer = self.importer_for(file_path)?;
        tracing::info!(
            path = %file_path.display(),
            format = importer.get_format_name(),
            "Importing nutrition log"
        );

        importer
            .read_nutrition(file_path)?
            .into_iter()
            .enumerate()
            .map(|(record, raw)| self.validator.validate_nutrition(record, raw))
            .collect()
    }

    /// Import measurements from every supported file in a directory
    ///
    /// Files that fail are reported and skipped.
    pub fn import_directory(&self, dir_path: &Path) -> Result<Vec<MeasurementEntry>, ImportError> {
        let mut all_entries = Vec::new();

        let files = self.collect_importable_files(dir_path)?;

        if files.is_empty() {
            tracing::warn!(path = %dir_path.display(), "No importable files found");
            return Ok(all_entries);
        }

        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({msg})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        for file_path in files {
            let file_name = file_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            pb.set_message(format!("Processing {}", file_name));

            match self.import_measurements(&file_path) {
                Ok(mut entries) => {
                    pb.println(format!("✓ Imported {} entries from {}", entries.len(), file_name));
                    all_entries.append(&mut entries);
                }
                Err(e) => {
                    tracing::warn!(file = %file_name, error = %e, "Skipping file");
                    pb.println(format!("✗ Failed to import {}: {}", file_name, e));
                }
            }

            pb.inc(1);
        }

        pb.finish_with_message("Import complete");
        Ok(all_entries)
    }

    /// Collect all files that can be imported from a directory, sorted by name
    fn collect_importable_files(&self, dir_path: &Path) -> Result<Vec<PathBuf>, ImportError> {
        let read_error = |source: std::io::Error| ImportError::Read {
            path: dir_path.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir_path).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if path.is_file() && self.can_import_file(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Validate a file without keeping the data, returning the record count
    pub fn validate_file(&self, file_path: &Path) -> Result<usize, ImportError> {
        let entries = self.import_measurements(file_path)?;
        tracing::info!(
            path = %file_path.display(),
            records = entries.len(),
            "File is valid"
        );
        Ok(entries.len())
    }

    /// Check if this manager can import a given file
    pub fn can_import_file(&self, file_path: &Path) -> bool {
        self.importers.iter().any(|importer| importer.can_import(file_path))
    }
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a whole file, keeping the path in the error
pub(crate) fn read_file(file_path: &Path) -> Result<String, ImportError> {
    std::fs::read_to_string(file_path).map_err(|source| ImportError::Read {
        path: file_path.to_path_buf(),
        source,
    })
}

/// Case-insensitive extension check
pub(crate) fn has_extension(file_path: &Path, extension: &str) -> bool {
    file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
