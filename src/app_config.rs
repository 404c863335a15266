use std::fs;
use std::path::{Path, PathBuf};
use log::warn;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ConfigError;
use crate::language_utils;

/// Application configuration module
/// This module handles loading, validating and saving the player settings
/// that persist between sessions (volume, theme, subtitle preferences).
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Player settings
    #[serde(default)]
    pub player: PlayerConfig,

    /// Subtitle settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Backend collaborator settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Color theme of the player chrome
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Player configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Volume in 0.0..=1.0
    #[serde(default = "default_volume")]
    pub volume: f64,

    /// Start muted
    #[serde(default)]
    pub muted: bool,

    /// Seconds skipped by the seek shortcuts
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: f64,

    /// Color theme
    #[serde(default)]
    pub theme: Theme,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            muted: false,
            seek_step_secs: default_seek_step_secs(),
            theme: Theme::default(),
        }
    }
}

/// Subtitle configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubtitleConfig {
    /// Turn on a subtitle stream automatically after analysis
    #[serde(default = "default_true")]
    pub enabled_by_default: bool,

    /// Preferred subtitle language (ISO 639-1 or 639-2)
    #[serde(default)]
    pub preferred_language: Option<String>,

    /// Interval between simulated playback ticks in the CLI
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            enabled_by_default: true,
            preferred_language: None,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Backend configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackendConfig {
    /// Base URL of the media-analysis service
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_volume() -> f64 {
    1.0
}

fn default_seek_step_secs() -> f64 {
    10.0
}

fn default_tick_interval_ms() -> u64 {
    250 // close to the timeupdate cadence of browsers
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cueplay.json";

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.player.volume) {
            return Err(ConfigError::InvalidVolume(self.player.volume));
        }

        if !(self.player.seek_step_secs.is_finite() && self.player.seek_step_secs > 0.0) {
            return Err(ConfigError::InvalidSeekStep(self.player.seek_step_secs));
        }

        if self.subtitles.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }

        if let Some(language) = &self.subtitles.preferred_language {
            language_utils::normalize_to_part2t(language)
                .map_err(|_| ConfigError::InvalidLanguage(language.clone()))?;
        }

        Url::parse(&self.backend.base_url).map_err(|e| ConfigError::InvalidBackendUrl {
            url: self.backend.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the configuration as pretty JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load the configuration, writing a default file first when none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Resolve the config location: the working-directory file if present,
    /// otherwise the per-user config directory
    pub fn default_path() -> PathBuf {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|dir| dir.join("cueplay").join("config.json"))
            .unwrap_or(local)
    }
}
