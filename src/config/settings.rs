//! Application settings and paths.
//!
//! Settings live in `settings.json` under the XDG config directory
//! (`~/.config/portscout` on Linux). Every field is optional in the file.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::ScanConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portscout)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the platform directories. Nothing is created on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portscout", "portscout")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// User defaults, overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Connection timeout in milliseconds.
    pub timeout_ms: u64,
    /// Worker pool size.
    pub workers: usize,
    /// Port specification used when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    /// Show a progress bar during plain-text scans.
    pub progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_ms: ScanConfig::DEFAULT_TIMEOUT.as_millis() as u64,
            workers: ScanConfig::DEFAULT_WORKERS,
            ports: None,
            progress: true,
        }
    }
}

impl Settings {
    /// Load settings from the default location, falling back to built-in
    /// defaults when the file or the directory does not exist.
    pub fn load() -> ConfigResult<Self> {
        let paths = match Paths::discover() {
            Ok(paths) => paths,
            Err(e) => {
                debug!(error = %e, "no config directory, using defaults");
                return Ok(Self::default());
            }
        };

        let file = paths.settings_file();
        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file. A missing file is an error.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Build a validated scan configuration, letting flags override the file.
    pub fn scan_config(
        &self,
        timeout: Option<Duration>,
        workers: Option<usize>,
    ) -> ConfigResult<ScanConfig> {
        ScanConfig::new(
            timeout.unwrap_or(Duration::from_millis(self.timeout_ms)),
            workers.unwrap_or(self.workers),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.timeout_ms, 1000);
        assert_eq!(settings.workers, 100);
        assert!(settings.ports.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "workers": 250, "ports": "22,80" }}"#).unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.workers, 250);
        assert_eq!(settings.timeout_ms, 1000);
        assert_eq!(settings.ports.as_deref(), Some("22,80"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load_from(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "workers = 5").unwrap();
        assert!(matches!(
            Settings::load_from(file.path()),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let settings = Settings {
            timeout_ms: 3000,
            workers: 20,
            ..Settings::default()
        };

        let config = settings.scan_config(None, Some(5)).unwrap();
        assert_eq!(config.workers(), 5);
        assert_eq!(config.timeout(), Duration::from_secs(3));

        assert!(settings.scan_config(None, Some(0)).is_err());
    }
}
