//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/habitree/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/habitree/` (~/.config/habitree/)
//! - Data: `$XDG_DATA_HOME/habitree/` (~/.local/share/habitree/)
//! - State/Logs: `$XDG_STATE_HOME/habitree/` (~/.local/state/habitree/)

use crate::error::{Error, Result};
use crate::types::{DateRange, PomodoroMode};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Where records are kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Dashboard presentation defaults
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Pomodoro timer settings
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
}

/// Record storage configuration
#[derive(Debug, Deserialize, Default)]
pub struct StorageConfig {
    /// Override for the data directory (defaults to the XDG data dir)
    pub data_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Dashboard configuration
#[derive(Debug, Deserialize)]
pub struct DashboardConfig {
    /// Window used by `analytics` when none is given
    #[serde(default)]
    pub default_range: DateRange,

    /// Number of habits shown in the consistency panel
    #[serde(default = "default_top_habits")]
    pub top_habits: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_range: DateRange::default(),
            top_habits: default_top_habits(),
        }
    }
}

fn default_top_habits() -> usize {
    3
}

/// Pomodoro timer configuration. Durations are in seconds.
#[derive(Debug, Deserialize, Clone)]
pub struct PomodoroConfig {
    #[serde(default = "default_focus_secs")]
    pub focus_secs: u32,

    #[serde(default = "default_short_break_secs")]
    pub short_break_secs: u32,

    #[serde(default = "default_long_break_secs")]
    pub long_break_secs: u32,

    /// Focus sessions between long breaks
    #[serde(default = "default_pomodoros_per_long_break")]
    pub pomodoros_per_long_break: u32,

    /// Start the next phase without waiting for the user
    #[serde(default)]
    pub auto_start_next: bool,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_secs: default_focus_secs(),
            short_break_secs: default_short_break_secs(),
            long_break_secs: default_long_break_secs(),
            pomodoros_per_long_break: default_pomodoros_per_long_break(),
            auto_start_next: false,
        }
    }
}

fn default_focus_secs() -> u32 {
    25 * 60
}

fn default_short_break_secs() -> u32 {
    5 * 60
}

fn default_long_break_secs() -> u32 {
    15 * 60
}

fn default_pomodoros_per_long_break() -> u32 {
    4
}

impl PomodoroConfig {
    /// Length of a timer phase in seconds
    pub fn duration_for(&self, mode: PomodoroMode) -> u32 {
        match mode {
            PomodoroMode::Pomodoro => self.focus_secs,
            PomodoroMode::ShortBreak => self.short_break_secs,
            PomodoroMode::LongBreak => self.long_break_secs,
        }
    }

    /// Phase that follows a finished one, given how many focus sessions are done.
    pub fn next_mode(&self, finished: PomodoroMode, completed_pomodoros: u32) -> PomodoroMode {
        match finished {
            PomodoroMode::Pomodoro => {
                if self.pomodoros_per_long_break > 0
                    && completed_pomodoros > 0
                    && completed_pomodoros % self.pomodoros_per_long_break == 0
                {
                    PomodoroMode::LongBreak
                } else {
                    PomodoroMode::ShortBreak
                }
            }
            PomodoroMode::ShortBreak | PomodoroMode::LongBreak => PomodoroMode::Pomodoro,
        }
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.focus_secs == 0 || self.short_break_secs == 0 || self.long_break_secs == 0 {
            return Err(Error::Config(
                "pomodoro durations must be greater than zero".to_string(),
            ));
        }
        if self.pomodoros_per_long_break == 0 {
            return Err(Error::Config(
                "pomodoro.pomodoros_per_long_break must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.pomodoro.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/habitree/config.toml` (~/.config/habitree/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("habitree").join("config.toml")
    }

    /// Returns the default data directory path
    ///
    /// `$XDG_DATA_HOME/habitree/` (~/.local/share/habitree/)
    pub fn default_data_dir() -> PathBuf {
        xdg_data_home().join("habitree")
    }

    /// Returns the data directory, honouring `[storage] data_dir`
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/habitree/` (~/.local/state/habitree/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("habitree")
    }
}
