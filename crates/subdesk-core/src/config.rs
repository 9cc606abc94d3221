//! Configuration for subdesk.
//!
//! Read from `~/.subdesk/config.yaml` (or an explicit `--config` path). Every
//! field has a default, so an empty or missing default file is fine.
//!
//! ```yaml
//! api:
//!   base_url: https://billing.example.com
//!   session_cookie_env: SUBDESK_SESSION
//! ui:
//!   toast_duration_secs: 5
//!   utc_offset_minutes: 0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubdeskError};
use crate::logging::base_dir;

/// Config file name inside `~/.subdesk/`.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubdeskConfig {
    /// Backend connection settings
    pub api: ApiConfig,

    /// Terminal UI settings
    pub ui: UiConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the `/api/subscription` paths are joined onto
    pub base_url: String,

    /// Request timeout in seconds (unset = wait for the transport)
    pub request_timeout_secs: Option<u64>,

    /// Environment variable holding a pre-established session cookie
    pub session_cookie_env: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: None,
            session_cookie_env: None,
        }
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long a toast stays on screen
    pub toast_duration_secs: u64,

    /// Fixed offset for date display; local offset when unset
    pub utc_offset_minutes: Option<i32>,

    /// Event loop tick in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_duration_secs: 5,
            utc_offset_minutes: None,
            tick_rate_ms: 100,
        }
    }
}

impl SubdeskConfig {
    /// Default config path: `~/.subdesk/config.yaml`.
    pub fn default_path() -> Result<PathBuf> {
        Ok(base_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// path is used and a missing file yields [`SubdeskConfig::default`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    tracing::debug!(path = %path.display(), "no config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SubdeskError::config_not_found_with_source(path, e)
            } else {
                SubdeskError::io("reading config", path, e)
            }
        })?;

        let config = Self::from_yaml(&content).map_err(|e| match e {
            SubdeskError::ConfigInvalid { message, .. } => SubdeskError::ConfigInvalid {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;

        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate YAML content.
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map.
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| SubdeskError::ConfigInvalid {
                path: PathBuf::new(),
                message: e.to_string(),
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SubdeskError::ConfigValidation {
                message: format!("api.base_url must be an http(s) URL, got '{}'", self.api.base_url),
            });
        }

        if self.api.request_timeout_secs == Some(0) {
            return Err(SubdeskError::ConfigValidation {
                message: "api.request_timeout_secs must be greater than zero".into(),
            });
        }

        if self.ui.toast_duration_secs == 0 {
            return Err(SubdeskError::ConfigValidation {
                message: "ui.toast_duration_secs must be greater than zero".into(),
            });
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(SubdeskError::ConfigValidation {
                message: "ui.tick_rate_ms must be greater than zero".into(),
            });
        }

        if let Some(offset) = self.ui.utc_offset_minutes {
            if offset.abs() >= 24 * 60 {
                return Err(SubdeskError::ConfigValidation {
                    message: format!("ui.utc_offset_minutes out of range: {offset}"),
                });
            }
        }

        Ok(())
    }

    /// Override the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    /// Set a request timeout.
    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.api.request_timeout_secs = Some(secs);
        self
    }

    /// Pin date display to a fixed UTC offset.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.ui.utc_offset_minutes = Some(minutes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = SubdeskConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.request_timeout_secs, None);
        assert_eq!(config.ui.toast_duration_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SubdeskConfig::from_yaml("api:\n  base_url: https://billing.example.com\n")
            .unwrap();
        assert_eq!(config.api.base_url, "https://billing.example.com");
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(SubdeskConfig::from_yaml("  \n").unwrap(), SubdeskConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = SubdeskConfig::from_yaml("api: [not, a, map").unwrap_err();
        assert!(matches!(err, SubdeskError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_url = SubdeskConfig::default().with_base_url("localhost:5000");
        assert!(matches!(
            bad_url.validate(),
            Err(SubdeskError::ConfigValidation { .. })
        ));

        let bad_timeout = SubdeskConfig::default().with_request_timeout(0);
        assert!(bad_timeout.validate().is_err());

        let bad_offset = SubdeskConfig::default().with_utc_offset_minutes(24 * 60);
        assert!(bad_offset.validate().is_err());

        let good_offset = SubdeskConfig::default().with_utc_offset_minutes(-300);
        assert!(good_offset.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = SubdeskConfig::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, SubdeskError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_from_file_reports_path_on_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "ui:\n  toast_duration_secs: [1\n").unwrap();

        match SubdeskConfig::load(Some(&path)) {
            Err(SubdeskError::ConfigInvalid { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_missing_default_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        // SAFETY: serialized with every other test that touches HOME
        unsafe { std::env::set_var("HOME", dir.path()) };

        let config = SubdeskConfig::load(None).unwrap();
        assert_eq!(config, SubdeskConfig::default());
    }

    #[test]
    #[serial]
    fn test_default_file_is_read() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join(".subdesk");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join(CONFIG_FILE_NAME),
            "ui:\n  toast_duration_secs: 9\n",
        )
        .unwrap();
        // SAFETY: serialized with every other test that touches HOME
        unsafe { std::env::set_var("HOME", dir.path()) };

        let config = SubdeskConfig::load(None).unwrap();
        assert_eq!(config.ui.toast_duration_secs, 9);
    }
}
