//! Configuration management.
//!
//! Settings are stored as JSON in the platform application directory and
//! split into optional per-module sections: `tracker` for the monitoring
//! loop and `sync` for remote upload. Missing sections fall back to
//! defaults, so the application runs with zero setup. An interactive
//! wizard (`Config::init`) handles guided configuration, and a small set of
//! environment variables override file values for headless deployments.

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_print, msg_warning};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Tracking loop configuration.
///
/// The debounce delay is longer in detailed mode because window-title
/// lookups are slower and flicker more than bare app-name detection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Record `"{app} - {title}"` identities instead of bare app names.
    #[serde(default = "default_include_window_titles")]
    pub include_window_titles: bool,

    /// Seconds without input before the user counts as idle.
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold: u64,

    /// Seconds a differing observation must persist before an app switch
    /// is committed.
    #[serde(default = "default_debounce_delay")]
    pub debounce_delay: f64,

    /// Seconds between detection polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: f64,

    /// Sanity cap for a single committed segment, in seconds. Guards
    /// against clock anomalies and stale segment starts.
    #[serde(default = "default_max_segment_duration")]
    pub max_segment_duration: f64,

    /// Ceiling for a flushed minute's total before renormalization to 60 s
    /// kicks in. Allows minor overshoot from loop timing jitter.
    #[serde(default = "default_minute_overflow_tolerance")]
    pub minute_overflow_tolerance: f64,
}

fn default_include_window_titles() -> bool {
    true
}
fn default_idle_threshold() -> u64 {
    300
}
fn default_debounce_delay() -> f64 {
    1.0
}
fn default_poll_interval() -> f64 {
    0.5
}
fn default_max_segment_duration() -> f64 {
    120.0
}
fn default_minute_overflow_tolerance() -> f64 {
    65.0
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            include_window_titles: default_include_window_titles(),
            idle_threshold: default_idle_threshold(),
            debounce_delay: default_debounce_delay(),
            poll_interval: default_poll_interval(),
            max_segment_duration: default_max_segment_duration(),
            minute_overflow_tolerance: default_minute_overflow_tolerance(),
        }
    }
}

impl TrackerConfig {
    /// Fast mode: app names only, shorter debounce window.
    pub fn fast() -> Self {
        TrackerConfig {
            include_window_titles: false,
            debounce_delay: 0.3,
            ..Default::default()
        }
    }
}

/// Remote synchronization configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SyncConfig {
    /// Endpoint accepting hourly activity payloads.
    pub endpoint: String,

    /// Seconds between automatic sync attempts while the daemon runs.
    #[serde(default = "default_sync_interval")]
    pub sync_interval: u64,
}

fn default_sync_interval() -> u64 {
    3600
}

/// Root configuration object. Each section is optional so users configure
/// only what they need; unset sections are omitted from the JSON output.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncConfig>,
}

impl Config {
    /// Loads the configuration file, returning defaults when none exists.
    /// Environment overrides are applied last.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let mut config = if config_file_path.exists() {
            let config_str = fs::read_to_string(config_file_path)?;
            serde_json::from_str(&config_str)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Applies environment-variable overrides on top of file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("TRAQ_IDLE_THRESHOLD") {
            match value.parse::<u64>() {
                Ok(secs) => self.tracker.get_or_insert_with(Default::default).idle_threshold = secs,
                Err(_) => msg_warning!(Message::ConfigInvalidEnvValue("TRAQ_IDLE_THRESHOLD".to_string(), value)),
            }
        }
        if let Ok(value) = std::env::var("TRAQ_FAST_MODE") {
            if matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on") {
                let tracker = self.tracker.get_or_insert_with(Default::default);
                tracker.include_window_titles = false;
                tracker.debounce_delay = 0.3;
            }
        }
        if let Ok(endpoint) = std::env::var("TRAQ_ENDPOINT") {
            match self.sync.as_mut() {
                Some(sync) => sync.endpoint = endpoint,
                None => {
                    self.sync = Some(SyncConfig {
                        endpoint,
                        sync_interval: default_sync_interval(),
                    })
                }
            }
        }
    }

    /// Runs the interactive configuration wizard. Existing values are
    /// offered as defaults so re-running only changes what the user edits.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = ["Tracker", "Sync"];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules)
            .interact()?;

        for selection in selected {
            match modules[selection] {
                "Tracker" => {
                    let default = config.tracker.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleTracker);
                    config.tracker = Some(TrackerConfig {
                        include_window_titles: Confirm::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptIncludeWindowTitles.to_string())
                            .default(default.include_window_titles)
                            .interact()?,
                        idle_threshold: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptIdleThreshold.to_string())
                            .default(default.idle_threshold)
                            .interact_text()?,
                        debounce_delay: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDebounceDelay.to_string())
                            .default(default.debounce_delay)
                            .interact_text()?,
                        poll_interval: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPollInterval.to_string())
                            .default(default.poll_interval)
                            .interact_text()?,
                        max_segment_duration: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptMaxSegmentDuration.to_string())
                            .default(default.max_segment_duration)
                            .interact_text()?,
                        minute_overflow_tolerance: default.minute_overflow_tolerance,
                    });
                }
                "Sync" => {
                    let default = config.sync.clone().unwrap_or(SyncConfig {
                        endpoint: String::new(),
                        sync_interval: default_sync_interval(),
                    });
                    msg_print!(Message::ConfigModuleSync);
                    config.sync = Some(SyncConfig {
                        endpoint: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSyncEndpoint.to_string())
                            .default(default.endpoint)
                            .interact_text()?,
                        sync_interval: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptSyncInterval.to_string())
                            .default(default.sync_interval)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
