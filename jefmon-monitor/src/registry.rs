//! Remote instance registry
//!
//! Process-wide list of the remote monitor instances shown on the
//! dashboard. Read on every refresh, written from the settings page.

use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::info;

use crate::settings::{MonitorSettings, SettingsError, SettingsStore};

/// Errors changing the registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid instance URL {0:?}: must start with http:// or https://")]
    InvalidUrl(String),

    #[error("instance name cannot be blank")]
    BlankName,

    /// The change could not be saved and was not applied
    #[error("could not persist instance list: {0}")]
    Persistence(#[from] SettingsError),
}

/// Ordered list of remote instance URLs, backed by a [`SettingsStore`]
///
/// Every mutation saves the new settings before replacing the in-memory
/// copy, all under one lock, so memory and storage never disagree and
/// readers see either the old or the new list.
pub struct InstanceRegistry {
    store: Arc<dyn SettingsStore>,
    settings: Mutex<MonitorSettings>,
}

impl InstanceRegistry {
    pub fn new(store: Arc<dyn SettingsStore>, settings: MonitorSettings) -> Self {
        Self {
            store,
            settings: Mutex::new(settings),
        }
    }

    /// Builds a registry from whatever the store currently holds
    pub fn load(store: Arc<dyn SettingsStore>) -> Result<Self, SettingsError> {
        let settings = store.load()?;
        Ok(Self::new(store, settings))
    }

    /// Copy of the remote URLs, in display order
    pub fn list(&self) -> Vec<String> {
        self.lock().remote_instance_urls.clone()
    }

    /// Copy of the full settings document
    pub fn settings(&self) -> MonitorSettings {
        self.lock().clone()
    }

    pub fn instance_name(&self) -> String {
        self.lock().instance_name.clone()
    }

    /// Appends a remote instance
    ///
    /// Returns `Ok(false)` without saving if the URL is already registered.
    pub fn add(&self, url: &str) -> Result<bool, RegistryError> {
        let url = validate_url(url)?;
        let added = self.update(|settings| {
            if settings.remote_instance_urls.iter().any(|u| u == &url) {
                return false;
            }
            settings.remote_instance_urls.push(url.clone());
            true
        })?;
        if added {
            info!("Added remote instance {}", url);
        }
        Ok(added)
    }

    /// Removes a remote instance
    ///
    /// Returns `Ok(false)` without saving if the URL was not registered.
    pub fn remove(&self, url: &str) -> Result<bool, RegistryError> {
        let url = url.trim();
        let removed = self.update(|settings| {
            let before = settings.remote_instance_urls.len();
            settings.remote_instance_urls.retain(|u| u != url);
            settings.remote_instance_urls.len() != before
        })?;
        if removed {
            info!("Removed remote instance {}", url);
        }
        Ok(removed)
    }

    /// Renames this instance; the name is trimmed and must not be blank
    pub fn set_instance_name(&self, name: &str) -> Result<(), RegistryError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(RegistryError::BlankName);
        }
        self.update(|settings| {
            if settings.instance_name == name {
                return false;
            }
            settings.instance_name = name.clone();
            true
        })?;
        Ok(())
    }

    /// Applies `change` to a copy of the settings and, if it reports a
    /// change, persists the copy and then installs it
    fn update<F>(&self, change: F) -> Result<bool, RegistryError>
    where
        F: FnOnce(&mut MonitorSettings) -> bool,
    {
        let mut guard = self.lock();
        let mut next = guard.clone();
        if !change(&mut next) {
            return Ok(false);
        }
        self.store.save(&next)?;
        *guard = next;
        Ok(true)
    }

    fn lock(&self) -> MutexGuard<'_, MonitorSettings> {
        // Settings are only replaced wholesale, so a poisoned lock still
        // guards a consistent value.
        self.settings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn validate_url(url: &str) -> Result<String, RegistryError> {
    let url = url.trim();
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(host) if !host.trim_matches('/').is_empty() => Ok(url.to_string()),
        _ => Err(RegistryError::InvalidUrl(url.to_string())),
    }
}
