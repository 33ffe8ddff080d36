use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskdeck_store_fs::STATE_FILE;

use crate::notify::NotificationSettings;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration loaded from `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Where the board is stored.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Notification switches and delays.
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Load configuration from `data_dir`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = data_dir.as_ref().join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.storage.ensure_file_name()?;
        self.notifications.ensure_ordered_delays()
    }

    /// Path of the board file for `data_dir`.
    pub fn state_path(&self, data_dir: impl AsRef<Path>) -> PathBuf {
        data_dir.as_ref().join(&self.storage.file)
    }

    /// Notification settings for the store.
    #[must_use]
    pub const fn notification_settings(&self) -> NotificationSettings {
        self.notifications.settings()
    }
}

/// `[storage]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Board file name, relative to the data directory.
    #[serde(default = "default_state_file")]
    pub file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: default_state_file(),
        }
    }
}

impl StorageConfig {
    fn ensure_file_name(&self) -> Result<()> {
        if self.file.trim().is_empty() {
            bail!("storage file name must not be empty");
        }
        Ok(())
    }
}

fn default_state_file() -> String {
    STATE_FILE.to_owned()
}

/// `[notifications]` block.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    /// Master switch.
    pub enabled: bool,
    /// Delay before "all complete" after toggling a standalone task.
    pub all_complete_delay_ms: u64,
    /// Delay before "group complete".
    pub group_complete_delay_ms: u64,
    /// Delay before "all complete" after toggling a group task.
    pub group_all_complete_delay_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            all_complete_delay_ms: 500,
            group_complete_delay_ms: 300,
            group_all_complete_delay_ms: 800,
        }
    }
}

impl NotificationConfig {
    fn ensure_ordered_delays(&self) -> Result<()> {
        if self.group_all_complete_delay_ms < self.group_complete_delay_ms {
            bail!(
                "group_all_complete_delay_ms ({}) must not be shorter than group_complete_delay_ms ({})",
                self.group_all_complete_delay_ms,
                self.group_complete_delay_ms
            );
        }
        Ok(())
    }

    const fn settings(&self) -> NotificationSettings {
        NotificationSettings {
            enabled: self.enabled,
            all_complete_delay: Duration::from_millis(self.all_complete_delay_ms),
            group_complete_delay: Duration::from_millis(self.group_complete_delay_ms),
            group_all_complete_delay: Duration::from_millis(self.group_all_complete_delay_ms),
        }
    }
}
