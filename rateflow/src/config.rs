//! Configuration types for an enrichment run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::RateflowError;
use crate::fetch::FetchConfig;

/// Top-level configuration, usually read from a JSON file.
///
/// Every section and field is optional in the file; missing values take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateflowConfig {
    /// Detail-page fetching.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Batch sizing and formatting.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Table export.
    #[serde(default)]
    pub export: ExportConfig,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RateflowConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, RateflowError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RateflowError::Config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RateflowError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RateflowError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), RateflowError> {
        self.fetch.validate().map_err(RateflowError::Config)?;
        self.pipeline.validate().map_err(RateflowError::Config)?;
        if self.export.output_path.as_os_str().is_empty() {
            return Err(RateflowError::Config(
                "export.output_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Batch sizing and cell formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// How many listings from the front of the input are processed.
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    /// Maximum detail fetches in flight at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Symbol used when a page does not state its currency.
    #[serde(default = "default_currency_symbol")]
    pub default_currency_symbol: String,
}

fn default_target_count() -> usize {
    50
}

fn default_max_concurrent() -> usize {
    5
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_count: default_target_count(),
            max_concurrent: default_max_concurrent(),
            default_currency_symbol: default_currency_symbol(),
        }
    }
}

impl PipelineConfig {
    /// Sets the target count.
    #[must_use]
    pub fn with_target_count(mut self, target_count: usize) -> Self {
        self.target_count = target_count;
        self
    }

    /// Sets the concurrency limit.
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Sets the fallback currency symbol.
    #[must_use]
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.default_currency_symbol = symbol.into();
        self
    }

    /// Checks the values are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent == 0 {
            return Err("pipeline.max_concurrent must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Where the table is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// CSV output file.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("./output/data.csv")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
    /// Include the event target in each line.
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_with_target() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            with_target: default_with_target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RateflowConfig::new();
        assert_eq!(config.pipeline.target_count, 50);
        assert_eq!(config.pipeline.max_concurrent, 5);
        assert_eq!(config.pipeline.default_currency_symbol, "$");
        assert_eq!(config.export.output_path, PathBuf::from("./output/data.csv"));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = RateflowConfig::from_json_str(
            r#"{"pipeline": {"target_count": 10}, "logging": {"json": true}}"#,
        )
        .unwrap();

        assert_eq!(config.pipeline.target_count, 10);
        assert_eq!(config.pipeline.max_concurrent, 5);
        assert!(config.logging.json);
        assert_eq!(config.fetch, FetchConfig::default());
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let err = RateflowConfig::from_json_str(r#"{"pipeline": {"max_concurrent": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, RateflowError::Config(msg) if msg.contains("max_concurrent")));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            RateflowConfig::from_json_str("{"),
            Err(RateflowError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"export": {{"output_path": "out/rates.csv"}}}}"#).unwrap();

        let config = RateflowConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.export.output_path, PathBuf::from("out/rates.csv"));
    }

    #[test]
    fn test_missing_file() {
        let err = RateflowConfig::from_json_file("/nonexistent/rateflow.json").unwrap_err();
        assert!(matches!(err, RateflowError::Config(_)));
    }
}
