//! TOML-based application configuration.
//!
//! Stores:
//! - Analysis timing (mock delay, loading message rotation)
//! - Export settings (file name, raster scale, capability probe timing)
//! - An optional custom questionnaire catalog
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::ConfigError;
use crate::export::MAX_SCALE;

/// Keys holding an optional path; setting them to "" clears them.
const OPTIONAL_PATHS: [&str; 2] = ["survey.catalog_path", "export.output_dir"];

/// Analysis step configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Mock analysis delay in milliseconds.
    #[serde(default = "default_analysis_delay")]
    pub delay_ms: u64,
    #[serde(default = "default_loading_interval")]
    pub loading_message_interval_ms: u64,
}

/// Report export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Raster scale factor applied to the base report width.
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Ceiling for the capability probe; after it the export stays in error.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_ms: u64,
    /// Pause before snapshotting so layout can settle.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Directory the document is written to. Defaults to the working directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Survey configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Optional TOML catalog replacing the built-in questionnaire.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub survey: SurveyConfig,
}

// Default functions
fn default_analysis_delay() -> u64 {
    2000
}
fn default_loading_interval() -> u64 {
    2500
}
fn default_file_name() -> String {
    "AI_Literacy_Report.pdf".into()
}
fn default_scale() -> u32 {
    2
}
fn default_poll_interval() -> u64 {
    500
}
fn default_probe_timeout() -> u64 {
    8000
}
fn default_settle_delay() -> u64 {
    50
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_analysis_delay(),
            loading_message_interval_ms: default_loading_interval(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            scale: default_scale(),
            poll_interval_ms: default_poll_interval(),
            probe_timeout_ms: default_probe_timeout(),
            settle_delay_ms: default_settle_delay(),
            output_dir: None,
        }
    }
}

impl AnalysisConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn loading_message_interval(&self) -> Duration {
        Duration::from_millis(self.loading_message_interval_ms.max(1))
    }
}

impl ExportConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ if value.is_empty() && OPTIONAL_PATHS.contains(&key) => {
                        serde_json::Value::Null
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not match
    /// the existing value's type, or `export.scale` falls outside
    /// `1..=MAX_SCALE`.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        if key == "export.scale" && !(1..=MAX_SCALE).contains(&updated.export.scale) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("scale must be within 1..={MAX_SCALE}"),
            });
        }
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.export.file_name, "AI_Literacy_Report.pdf");
        assert_eq!(parsed.analysis.delay_ms, 2000);
        assert!(parsed.export.output_dir.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[export]\nscale = 3\n").unwrap();
        assert_eq!(parsed.export.scale, 3);
        assert_eq!(parsed.export.poll_interval_ms, 500);
        assert_eq!(parsed.analysis.loading_message_interval_ms, 2500);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("export.scale").as_deref(), Some("2"));
        assert_eq!(cfg.get("export.probe_timeout_ms").as_deref(), Some("8000"));
        assert_eq!(cfg.get("survey.catalog_path").as_deref(), Some("null"));
        assert!(cfg.get("export.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_number_and_optional_path() {
        let mut cfg = Config::default();
        cfg.apply("analysis.delay_ms", "10").unwrap();
        assert_eq!(cfg.analysis.delay_ms, 10);

        cfg.apply("export.output_dir", "/tmp/reports").unwrap();
        assert_eq!(cfg.export.output_dir, Some(PathBuf::from("/tmp/reports")));

        cfg.apply("export.file_name", "out.pdf").unwrap();
        assert_eq!(cfg.export.file_name, "out.pdf");
    }

    #[test]
    fn apply_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("export.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.apply("export.scale", "big"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.export.scale, 2);
    }

    #[test]
    fn empty_value_clears_a_set_optional_path() {
        let mut cfg = Config::default();
        cfg.apply("survey.catalog_path", "/tmp/cat.toml").unwrap();
        assert_eq!(cfg.survey.catalog_path, Some(PathBuf::from("/tmp/cat.toml")));
        cfg.apply("survey.catalog_path", "").unwrap();
        assert_eq!(cfg.survey.catalog_path, None);

        cfg.apply("export.output_dir", "/tmp/reports").unwrap();
        cfg.apply("export.output_dir", "").unwrap();
        assert_eq!(cfg.export.output_dir, None);

        // Clearing an unset path is a no-op.
        cfg.apply("export.output_dir", "").unwrap();
        assert_eq!(cfg.export.output_dir, None);
    }

    #[test]
    fn apply_keeps_scale_within_raster_limits() {
        let mut cfg = Config::default();
        cfg.apply("export.scale", &MAX_SCALE.to_string()).unwrap();
        assert_eq!(cfg.export.scale, MAX_SCALE);

        let too_big = (MAX_SCALE + 1).to_string();
        for bad in ["0", too_big.as_str()] {
            assert!(matches!(
                cfg.apply("export.scale", bad),
                Err(ConfigError::InvalidValue { .. })
            ));
        }
        assert_eq!(cfg.export.scale, MAX_SCALE);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.export.scale, 2);
        assert!(path.exists());

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
