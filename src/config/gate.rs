//! # ConfigGate
//!
//! Decides whether a run does any work, and with which threshold.

use super::{ConfigError, ModuleConfig, Settings};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Source of the per-run [`ModuleConfig`].
///
/// The runner calls [`snapshot`](ConfigGate::snapshot) exactly once at the start of a run
/// and uses that copy for the whole run.
#[async_trait]
pub trait ConfigGate: Send + Sync {
    /// Reads the current module configuration.
    ///
    /// Fails with [`ConfigError::Unavailable`] when the backend can't be reached.
    async fn snapshot(&self) -> Result<ModuleConfig, ConfigError>;

    async fn is_enabled(&self) -> Result<bool, ConfigError> {
        Ok(self.snapshot().await?.is_enabled())
    }

    async fn threshold(&self) -> Result<f64, ConfigError> {
        Ok(self.snapshot().await?.threshold())
    }
}

/// Serves a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigGate {
    config: ModuleConfig,
}

impl StaticConfigGate {
    pub fn new(config: ModuleConfig) -> Self {
        Self { config }
    }

    /// An enabled module with the given threshold and the default template.
    pub fn enabled(threshold: f64) -> Self {
        Self::new(ModuleConfig {
            enable: true,
            threshold,
            ..ModuleConfig::default()
        })
    }

    pub fn disabled() -> Self {
        Self::new(ModuleConfig {
            enable: false,
            ..ModuleConfig::default()
        })
    }
}

#[async_trait]
impl ConfigGate for StaticConfigGate {
    async fn snapshot(&self) -> Result<ModuleConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config.clone())
    }
}

/// Re-reads the `module` section of a settings file on every run.
///
/// Environment overrides are applied on top of the file. Unlike
/// [`Settings::load`], a missing file is [`ConfigError::Unavailable`].
#[derive(Debug, Clone)]
pub struct FileConfigGate {
    path: PathBuf,
}

impl FileConfigGate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<ModuleConfig, ConfigError> {
        let mut module = Settings::from_file(&self.path)?.module;
        module.apply_overrides(lookup);
        module.validate()?;
        Ok(module)
    }
}

#[async_trait]
impl ConfigGate for FileConfigGate {
    async fn snapshot(&self) -> Result<ModuleConfig, ConfigError> {
        let gate = self.clone();
        let module = tokio::task::spawn_blocking(move || gate.read(|key| std::env::var(key).ok()))
            .await
            .map_err(|e| ConfigError::Unavailable(e.to_string()))??;
        debug!(path = %self.path.display(), enable = module.enable, threshold = module.threshold, "Config loaded");
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_static_gate() {
        let gate = StaticConfigGate::enabled(5.0);
        assert!(gate.is_enabled().await.unwrap());
        assert_eq!(gate.threshold().await.unwrap(), 5.0);

        assert!(!StaticConfigGate::disabled().is_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_static_gate_rejects_invalid_threshold() {
        let gate = StaticConfigGate::enabled(f64::INFINITY);
        assert!(matches!(gate.snapshot().await, Err(ConfigError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_file_gate_reads_module_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "module:\n  enable: true\n  threshold: 7").unwrap();

        let gate = FileConfigGate::new(file.path());
        let module = gate.read(|_| None).unwrap();
        assert!(module.enable);
        assert_eq!(module.threshold, 7.0);
    }

    #[tokio::test]
    async fn test_file_gate_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let gate = FileConfigGate::new(dir.path().join("absent.yaml"));

        let result = gate.snapshot().await;
        assert!(matches!(result, Err(ConfigError::Unavailable(_))));
    }

    #[test]
    fn test_file_gate_sees_changes_between_reads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "module:\n  enable: false").unwrap();
        let gate = FileConfigGate::new(file.path());
        assert!(!gate.read(|_| None).unwrap().enable);

        std::fs::write(file.path(), "module:\n  enable: true\n").unwrap();
        assert!(gate.read(|_| None).unwrap().enable);
    }
}
