//! Monitor runtime configuration
//!
//! Defines how the monitor polls remote instances and where it keeps its
//! persisted settings.

use std::path::PathBuf;
use std::time::Duration;

/// Monitor runtime configuration
///
/// Timeouts and concurrency are configurable to allow tuning for fleets of
/// different sizes and network conditions.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the persisted settings file (instance name, remote URLs)
    pub settings_path: PathBuf,

    /// Maximum time a single remote poll may take
    pub poll_timeout: Duration,

    /// Maximum number of remote instances polled at the same time
    pub max_concurrent_polls: usize,

    /// How often the dashboard summary is refreshed
    pub refresh_interval: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(settings_path: PathBuf) -> Self {
        Self {
            settings_path,
            poll_timeout: Duration::from_secs(10),
            max_concurrent_polls: 4,
            refresh_interval: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JEFMON_SETTINGS (optional, default: jefmon-config.json)
    /// - JEFMON_POLL_TIMEOUT (optional, seconds, default: 10)
    /// - JEFMON_MAX_CONCURRENT_POLLS (optional, default: 4)
    /// - JEFMON_REFRESH_INTERVAL (optional, seconds, default: 30)
    ///
    /// Set but unparsable values are an error rather than silently replaced.
    pub fn from_env() -> anyhow::Result<Self> {
        let settings_path = std::env::var("JEFMON_SETTINGS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("jefmon-config.json"));

        let mut config = Self::new(settings_path);

        if let Some(secs) = env_number::<u64>("JEFMON_POLL_TIMEOUT")? {
            config.poll_timeout = Duration::from_secs(secs);
        }

        if let Some(max) = env_number::<usize>("JEFMON_MAX_CONCURRENT_POLLS")? {
            config.max_concurrent_polls = max;
        }

        if let Some(secs) = env_number::<u64>("JEFMON_REFRESH_INTERVAL")? {
            config.refresh_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.settings_path.as_os_str().is_empty() {
            anyhow::bail!("settings_path cannot be empty");
        }

        if self.poll_timeout.is_zero() {
            anyhow::bail!("poll_timeout must be greater than 0");
        }

        if self.max_concurrent_polls == 0 {
            anyhow::bail!("max_concurrent_polls must be greater than 0");
        }

        if self.refresh_interval.is_zero() {
            anyhow::bail!("refresh_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("jefmon-config.json"))
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> anyhow::Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got {:?}", name, raw)),
        Err(_) => Ok(None),
    }
}
