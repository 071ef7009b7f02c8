//! Persisted monitor settings
//!
//! The instance name and the remote instance list survive restarts. They
//! are stored as one pretty-printed JSON document.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Settings an administrator edits from the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Display name of this instance
    pub instance_name: String,

    /// Page refresh interval suggested to dashboard clients, in seconds
    pub default_refresh_interval_secs: u64,

    /// Base URLs of remote monitor instances, in display order
    pub remote_instance_urls: Vec<String>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            instance_name: "jefmon".to_string(),
            default_refresh_interval_secs: 30,
            remote_instance_urls: Vec::new(),
        }
    }
}

/// Errors reading or writing the settings document
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot access settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file {path:?}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage backend for [`MonitorSettings`]
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<MonitorSettings, SettingsError>;

    /// Persists the settings; must not return before they are durable
    fn save(&self, settings: &MonitorSettings) -> Result<(), SettingsError>;
}

/// JSON file settings store
///
/// Saves go to a sibling temporary file that is then renamed over the
/// target, so readers never see a half-written document.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn format_error(&self, source: serde_json::Error) -> SettingsError {
        SettingsError::Format {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<MonitorSettings, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("No settings file at {:?}, using defaults", self.path);
                return Ok(MonitorSettings::default());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        let settings = serde_json::from_str(&content).map_err(|e| self.format_error(e))?;
        debug!("Loaded settings from {:?}", self.path);
        Ok(settings)
    }

    fn save(&self, settings: &MonitorSettings) -> Result<(), SettingsError> {
        let content = serde_json::to_string_pretty(settings).map_err(|e| self.format_error(e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        write_synced(&tmp_path, content.as_bytes()).map_err(|e| self.io_error(e))?;
        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(err));
        }

        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

/// Writes `content` and flushes it to disk before returning
fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}
