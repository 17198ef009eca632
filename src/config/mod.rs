//! # Configuration
//!
//! Settings for the watch come from a YAML file with environment overrides.
//!
//! Priority (highest to lowest):
//! 1. Environment variables
//! 2. Config file
//! 3. Defaults
//!
//! ```yaml
//! module:
//!   enable: true
//!   threshold: 5
//!   notification_template: low_stock_wishlist
//! runner:
//!   workers: 4
//!   deadline_ms: 30000
//! store:
//!   path: ./data/low_stock.jsonl
//! schedule:
//!   interval_secs: 3600
//! ```
//!
//! The `module` section is what a [`ConfigGate`] hands to every run. The other
//! sections are read once when the service is wired up.

pub mod gate;

pub use gate::*;

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "LOW_STOCK_CONFIG";
/// Config file used when [`CONFIG_PATH_ENV`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "low_stock.yaml";

const ENABLE_ENV: &str = "LOW_STOCK_ENABLE";
const THRESHOLD_ENV: &str = "LOW_STOCK_THRESHOLD";
const TEMPLATE_ENV: &str = "LOW_STOCK_TEMPLATE";
const STORE_PATH_ENV: &str = "LOW_STOCK_STORE_PATH";

/// Per-run module configuration. Read-only for the duration of a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Whether the watch job does any work at all.
    pub enable: bool,
    /// Quantities strictly below this value are low stock.
    pub threshold: f64,
    /// Identifier of the message template used for low-stock notices.
    #[serde(alias = "notificationTemplate")]
    pub notification_template: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            enable: false,
            threshold: 5.0,
            notification_template: "low_stock_wishlist".to_string(),
        }
    }
}

impl ModuleConfig {
    pub fn is_enabled(&self) -> bool {
        self.enable
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Rejects thresholds that can't be compared meaningfully.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Applies overrides for the `module` section.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(ENABLE_ENV) {
            match parse_flag(&raw) {
                Some(enable) => self.enable = enable,
                None => warn!(var = ENABLE_ENV, value = %raw, "Ignoring unparsable override"),
            }
        }

        if let Some(raw) = lookup(THRESHOLD_ENV) {
            match raw.trim().parse() {
                Ok(threshold) => self.threshold = threshold,
                Err(_) => warn!(var = THRESHOLD_ENV, value = %raw, "Ignoring unparsable override"),
            }
        }

        if let Some(template) = lookup(TEMPLATE_ENV) {
            self.notification_template = template;
        }
    }
}

/// Job runner tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Maximum number of concurrent inventory lookups.
    pub workers: usize,
    /// Deadline for the fetch and evaluate phase, in milliseconds.
    pub deadline_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            deadline_ms: 30_000,
        }
    }
}

impl RunnerConfig {
    /// A zero deadline would fail every run that waits on a lookup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deadline_ms == 0 {
            return Err(ConfigError::Invalid("runner.deadline_ms must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Where low-stock records are kept.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON-lines file backing the store. `None` keeps records in memory.
    pub path: Option<String>,
}

/// Periodic trigger settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_secs: 3600 }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// The full settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub module: ModuleConfig,
    pub runner: RunnerConfig,
    pub store: StoreConfig,
    pub schedule: ScheduleConfig,
}

impl Settings {
    /// Load settings from the file named by `LOW_STOCK_CONFIG` and the environment.
    ///
    /// A missing file is not an error here: defaults apply and the environment
    /// can still enable the module.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path();

        let mut settings = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;

        Ok(settings)
    }

    /// Load settings from a YAML file, without overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Unavailable(format!("{}: {}", path.display(), e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies every override, `lookup` maps a variable name to its value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.module.apply_overrides(&lookup);

        if let Some(path) = lookup(STORE_PATH_ENV) {
            self.store.path = Some(path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.module.validate()?;
        self.runner.validate()
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.runner.deadline_ms)
    }
}

/// Path of the settings file, from the environment or the default.
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The configuration backend could not be reached. Fatal for a run.
    #[error("Configuration unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.module.enable);
        assert_eq!(settings.module.threshold, 5.0);
        assert_eq!(settings.runner.workers, 4);
        assert_eq!(settings.store.path, None);
        assert_eq!(settings.schedule.interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
module:
  enable: true
  threshold: 2.5
  notificationTemplate: wishlist_low_stock_email

runner:
  workers: 8
  deadline_ms: 500

store:
  path: /tmp/low_stock.jsonl
"#;

        let settings = Settings::from_yaml(yaml).unwrap();
        assert!(settings.module.is_enabled());
        assert_eq!(settings.module.threshold(), 2.5);
        assert_eq!(settings.module.notification_template, "wishlist_low_stock_email");
        assert_eq!(settings.runner.workers, 8);
        assert_eq!(settings.deadline(), Duration::from_millis(500));
        assert_eq!(settings.store.path.as_deref(), Some("/tmp/low_stock.jsonl"));
        assert_eq!(settings.schedule, ScheduleConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let result = Settings::from_yaml("module: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut settings = Settings::from_yaml("module:\n  enable: false\n  threshold: 10\n").unwrap();
        let vars = env(&[
            ("LOW_STOCK_ENABLE", "yes"),
            ("LOW_STOCK_THRESHOLD", "3"),
            ("LOW_STOCK_TEMPLATE", "custom"),
            ("LOW_STOCK_STORE_PATH", "/var/lib/low_stock.jsonl"),
        ]);

        settings.apply_overrides(|key| vars.get(key).cloned());

        assert!(settings.module.enable);
        assert_eq!(settings.module.threshold, 3.0);
        assert_eq!(settings.module.notification_template, "custom");
        assert_eq!(settings.store.path.as_deref(), Some("/var/lib/low_stock.jsonl"));
    }

    #[test]
    fn test_unparsable_overrides_are_ignored() {
        let mut module = ModuleConfig::default();
        let vars = env(&[("LOW_STOCK_ENABLE", "maybe"), ("LOW_STOCK_THRESHOLD", "lots")]);

        module.apply_overrides(|key| vars.get(key).cloned());

        assert_eq!(module, ModuleConfig::default());
    }

    #[test]
    fn test_validate_threshold() {
        let mut module = ModuleConfig::default();
        assert!(module.validate().is_ok());

        module.threshold = -1.0;
        assert!(matches!(module.validate(), Err(ConfigError::Invalid(_))));

        module.threshold = f64::NAN;
        assert!(matches!(module.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_deadline() {
        assert!(Settings::default().validate().is_ok());

        let settings = Settings::from_yaml("runner:\n  deadline_ms: 0\n").unwrap();
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let settings = Settings::from_yaml("runner:\n  deadline_ms: 1\n").unwrap();
        assert!(settings.validate().is_ok());
    }
}
