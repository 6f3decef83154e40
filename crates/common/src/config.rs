//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::RuntimerResult;

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial timer overlay style for new editor sessions.
    pub overlay: OverlayDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Initial values for the timer style.
///
/// Kept textual here so the common crate stays free of model types; the
/// run model parses these into a `TimerStyle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayDefaults {
    /// Timer mode: "rta", "lrt" or "both".
    pub mode: String,

    /// Horizontal center of the timer block as a fraction of frame width.
    pub position_x: f32,

    /// Vertical center of the timer block as a fraction of frame height.
    pub position_y: f32,

    /// Font size in pixels.
    pub point_size: f32,

    /// Fill color as hex string (for example `#FFFFFF`).
    pub fill_color: String,

    /// Time format name (for example `MMSSmmm`).
    pub format: String,

    /// Whether the text gets an outline pass.
    pub outline_enabled: bool,

    /// Outline width in pixels.
    pub outline_width: f32,

    /// Outline color as hex string.
    pub outline_color: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "runtimer=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Include thread ids in log lines.
    pub thread_ids: bool,
}

impl Default for OverlayDefaults {
    fn default() -> Self {
        Self {
            mode: "rta".to_string(),
            position_x: 0.86,
            position_y: 0.95,
            point_size: 80.0,
            fill_color: "#FFFFFF".to_string(),
            format: "MMSSmmm".to_string(),
            outline_enabled: true,
            outline_width: 3.0,
            outline_color: "#000000".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            thread_ids: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> RuntimerResult<()> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, config_path: &Path) -> RuntimerResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("runtimer").join("config.json")
}
