use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregation::{AggregationConfig, MetricAggregator, RangeSelector};
use crate::import::validation::EntryValidator;
use crate::import::ImportManager;
use crate::logging::LogConfig;
use crate::models::{MeasurementKind, UnitSystem, UserProfile};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// What to show when the command line doesn't say
    #[serde(default)]
    pub display: DisplaySettings,

    /// Summary statistics tuning
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Data import preferences
    #[serde(default)]
    pub import: ImportSettings,

    #[serde(default)]
    pub logging: LogConfig,

    /// Locally stored profile, standing in for the backend one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Display defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Unit system used when neither a profile nor history decides
    pub default_units: UnitSystem,

    /// Range picker position on first open
    pub default_range: RangeSelector,

    /// Measurement kind charted when none is chosen
    pub default_kind: MeasurementKind,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            default_units: UnitSystem::Metric,
            default_range: RangeSelector::Last30Days,
            default_kind: MeasurementKind::Weight,
        }
    }
}

/// Data import preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// File formats the importer accepts
    pub supported_formats: Vec<String>,

    /// Kind assumed for records that don't carry one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_kind: Option<MeasurementKind>,
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            supported_formats: vec!["json".to_string(), "csv".to_string()],
            default_kind: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            display: DisplaySettings::default(),
            aggregation: AggregationConfig::default(),
            import: ImportSettings::default(),
            logging: LogConfig::default(),
            profile: None,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bodytrack")
            .join("config.toml")
    }

    /// Load from `path`, falling back to defaults when the file is absent
    ///
    /// A file that exists but doesn't parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Read one setting by dotted key, e.g. `display.default_units`
    pub fn get(&self, key: &str) -> Result<String> {
        let root = toml::Value::try_from(self).context("Failed to serialize configuration")?;
        let value = lookup(&root, key).with_context(|| format!("Unknown config key: {}", key))?;
        Ok(render(value))
    }

    /// Change one setting by dotted key
    ///
    /// The new value is parsed to the type the key already holds and the
    /// whole configuration is re-validated before it is accepted.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        let mut root = toml::Value::try_from(&*self).context("Failed to serialize configuration")?;

        let (parent_key, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };

        let parent = match parent_key {
            Some(parent_key) => lookup_mut(&mut root, parent_key)
                .with_context(|| format!("Unknown config key: {}", key))?,
            None => &mut root,
        };
        let table = parent
            .as_table_mut()
            .with_context(|| format!("Unknown config key: {}", key))?;

        let new_value = match table.get(leaf) {
            Some(existing) => parse_like(existing, raw)
                .with_context(|| format!("Invalid value for {}: {}", key, raw))?,
            // Optional settings are absent until first set
            None if OPTIONAL_KEYS.contains(&key) => toml::Value::String(raw.to_string()),
            None => anyhow::bail!("Unknown config key: {}", key),
        };
        table.insert(leaf.to_string(), new_value);

        let updated: AppConfig = root
            .try_into()
            .with_context(|| format!("Invalid value for {}: {}", key, raw))?;
        *self = updated;

        tracing::info!(key, value = raw, "Configuration updated");
        Ok(())
    }

    /// Every leaf setting as (dotted key, value), in file order
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let root = toml::Value::try_from(self).context("Failed to serialize configuration")?;
        let mut entries = Vec::new();
        flatten("", &root, &mut entries);
        Ok(entries)
    }

    /// Aggregator configured from these settings
    pub fn aggregator(&self) -> MetricAggregator {
        MetricAggregator::with_config(self.aggregation.clone())
    }

    /// Import manager configured from these settings
    pub fn import_manager(&self) -> ImportManager {
        ImportManager::with_validator(
            EntryValidator::new().with_default_kind(self.import.default_kind),
        )
        .restrict_formats(&self.import.supported_formats)
    }

    /// Explicit profile unit preference, if any
    pub fn profile_units(&self) -> Option<UnitSystem> {
        self.profile.as_ref().and_then(|p| p.preferred_units)
    }
}

/// Settings left out of the file while unset
const OPTIONAL_KEYS: [&str; 3] = ["import.default_kind", "logging.file_path", "profile.preferred_units"];

fn lookup<'a>(root: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(root, |value, part| value.get(part))
}

fn lookup_mut<'a>(root: &'a mut toml::Value, key: &str) -> Option<&'a mut toml::Value> {
    key.split('.').try_fold(root, |value, part| value.get_mut(part))
}

fn parse_like(existing: &toml::Value, raw: &str) -> Result<toml::Value> {
    let value = match existing {
        toml::Value::Boolean(_) => toml::Value::Boolean(raw.parse()?),
        toml::Value::Integer(_) => toml::Value::Integer(raw.parse()?),
        toml::Value::Float(_) => toml::Value::Float(raw.parse()?),
        toml::Value::Array(_) => toml::Value::Array(
            raw.split(',')
                .map(|item| toml::Value::String(item.trim().to_string()))
                .filter(|item| item.as_str() != Some(""))
                .collect(),
        ),
        toml::Value::Table(_) => anyhow::bail!("cannot assign a plain value to a section"),
        _ => toml::Value::String(raw.to_string()),
    };
    Ok(value)
}

fn render(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn flatten(prefix: &str, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, child, out);
            }
        }
        leaf => out.push((prefix.to_string(), render(leaf))),
    }
}
