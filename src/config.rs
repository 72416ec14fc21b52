use crate::logging;
use crate::report::{ReportMetadata, ReportRegistry};
use crate::{CompareError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".report-compare.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Known reports and their dimension/subtable metadata
    #[serde(default)]
    pub reports: Vec<ReportMetadata>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FetchConfig {
    /// Fetch comparison tables concurrently (default: true)
    #[serde(default)]
    pub parallel: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Default output format ("text" or "json")
    #[serde(default)]
    pub format: Option<String>,
    /// ASCII-only output
    #[serde(default)]
    pub no_unicode: Option<bool>,
}

impl Config {
    /// Load configuration from a file in the working directory
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from `path`; a missing file yields defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            CompareError::FileError(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        let config = Self::from_toml(&content).map_err(|e| {
            CompareError::Config(format!("{:?}: {}", config_path, e))
        })?;

        logging::log_config_loaded(&config_path.display().to_string(), config.reports.len());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load the file at `path` (or the default file), falling back to
    /// defaults when it cannot be read or parsed
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let result = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };
        match result {
            Ok(config) => config,
            Err(e) => {
                warn!("Warning: Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    }

    /// Report metadata registry built from `[[reports]]`.
    pub fn registry(&self) -> ReportRegistry {
        self.reports.iter().cloned().collect()
    }

    pub fn parallel_fetch(&self) -> bool {
        self.fetch.parallel.unwrap_or(true)
    }
}
