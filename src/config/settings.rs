// src/config/settings.rs
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::consts::*;
use super::profile::Profile;
use crate::engine::retry::RetryPolicy;
use crate::error::ConfigError;
use crate::file;
use crate::paths::{self, ProfilePaths};

/// Contents of `config.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub active_profile: String,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_seconds: u64,
}

fn default_max_retries() -> u32 { DEFAULT_MAX_RETRIES }
fn default_initial_backoff() -> u64 { DEFAULT_INITIAL_BACKOFF_SECS }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            active_profile: s!(),
            profiles: Vec::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff_seconds: DEFAULT_INITIAL_BACKOFF_SECS,
        }
    }
}

impl AppConfig {
    /// Write a default config if none exists. Returns true when one was created.
    pub fn initialize(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        AppConfig::default().save(path)?;
        info!("Config: created default {}", path.display());
        Ok(true)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        Ok(file::read_json(path)?)
    }

    /// Atomic: a crash mid-write leaves the previous file in place.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        file::write_json_atomic(path, self)?;
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries.max(1),
            initial_backoff: Duration::from_secs(self.initial_backoff_seconds),
            politeness_delay: Duration::from_millis(REQUEST_PAUSE_MS),
        }
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.profile_name == name)
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.profile_name.as_str()).collect()
    }

    pub fn active_profile(&self) -> Result<&Profile, ConfigError> {
        if self.active_profile.is_empty() {
            return Err(ConfigError::NoActiveProfile);
        }
        let profile = self
            .profile(&self.active_profile)
            .ok_or_else(|| ConfigError::UnknownProfile(self.active_profile.clone()))?;
        if profile.has_placeholder_url() {
            return Err(ConfigError::PlaceholderUrl(profile.profile_name.clone()));
        }
        Ok(profile)
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), ConfigError> {
        if self.profile(name).is_none() {
            return Err(ConfigError::UnknownProfile(s!(name)));
        }
        self.active_profile = s!(name);
        Ok(())
    }

    /// Add a profile (`editing == None`) or replace the one named `editing`.
    ///
    /// The first profile ever added becomes active. Renaming the active
    /// profile keeps it active under the new name.
    pub fn upsert_profile(&mut self, editing: Option<&str>, profile: Profile) -> Result<(), ConfigError> {
        let new_name = profile.profile_name.trim().to_string();
        if new_name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        // the name doubles as the profile's data directory
        if !paths::is_plain_name(&new_name) {
            return Err(ConfigError::InvalidName(new_name));
        }
        let profile = Profile { profile_name: new_name.clone(), ..profile };

        match editing {
            None => {
                if self.profile(&new_name).is_some() {
                    return Err(ConfigError::DuplicateProfile(new_name));
                }
                self.profiles.push(profile);
                if self.profiles.len() == 1 {
                    self.active_profile = new_name;
                }
            }
            Some(old) => {
                let idx = self
                    .profiles
                    .iter()
                    .position(|p| p.profile_name == old)
                    .ok_or_else(|| ConfigError::UnknownProfile(s!(old)))?;
                if new_name != old && self.profile(&new_name).is_some() {
                    return Err(ConfigError::DuplicateProfile(new_name));
                }
                self.profiles[idx] = profile;
                if self.active_profile == old {
                    self.active_profile = new_name;
                }
            }
        }
        Ok(())
    }

    /// Remove a profile and delete everything stored under its data
    /// directory. Irrevocable.
    pub fn delete_profile(&mut self, name: &str, data_root: &Path) -> Result<Profile, ConfigError> {
        let idx = self
            .profiles
            .iter()
            .position(|p| p.profile_name == name)
            .ok_or_else(|| ConfigError::UnknownProfile(s!(name)))?;

        ProfilePaths::new(data_root, name).delete_all()?;
        let removed = self.profiles.remove(idx);

        if self.active_profile == name {
            self.active_profile = self
                .profiles
                .first()
                .map(|p| p.profile_name.clone())
                .unwrap_or_default();
        }
        info!("Config: deleted profile '{}'", name);
        Ok(removed)
    }
}
