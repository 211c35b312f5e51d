//! Editor configuration.
//!
//! Every field has a default taken from [`constants`](crate::constants), so a
//! partial JSON document only overrides what it names.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{EditorError, Result};
use crate::keybindings::KeyBindings;
use crate::model::TextStyle;

/// How much of the engine's own logging gets through.
///
/// Session lifecycle and transforms log at info, gestures and history at
/// debug, per-event input at trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Nothing at all
    Off,
    Error,
    Warn,
    /// Lifecycle, loads, rotate and crop
    #[default]
    Info,
    /// Adds gesture transitions and history commits
    Debug,
    /// Adds every pointer and key event
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Shortcut convention of the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Cmd is the primary modifier
    Mac,
    /// Ctrl is the primary modifier
    #[default]
    Other,
}

impl Platform {
    /// Platform of the current build target.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }
}

/// Current configuration format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Minimum mask width/height in stage pixels
    #[serde(default = "default_min_mask_size")]
    pub min_mask_size: f32,

    /// Minimum crop width/height in stage pixels
    #[serde(default = "default_min_crop_size")]
    pub min_crop_size: f32,

    /// Minimum text box width/height in stage pixels
    #[serde(default = "default_min_text_size")]
    pub min_text_size: f32,

    #[serde(default = "default_min_zoom")]
    pub min_zoom: f32,

    #[serde(default = "default_max_zoom")]
    pub max_zoom: f32,

    /// Factor applied per zoom step
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,

    /// Maximum number of undo entries
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Resize handle hit radius in viewport pixels
    #[serde(default = "default_handle_hit_radius")]
    pub handle_hit_radius: f32,

    /// Stage pixels per arrow key press
    #[serde(default = "default_nudge_step")]
    pub nudge_step: f32,

    /// Style given to new text boxes
    #[serde(default)]
    pub text_style: TextStyle,

    /// Font used to burn in text; system fonts are tried when unset
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    #[serde(default)]
    pub keybindings: KeyBindings,

    #[serde(default = "Platform::current")]
    pub platform: Platform,

    /// Verbosity applied by [`apply_log_level`](Self::apply_log_level)
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_min_mask_size() -> f32 {
    constants::MIN_MASK_SIZE
}

fn default_min_crop_size() -> f32 {
    constants::MIN_CROP_SIZE
}

fn default_min_text_size() -> f32 {
    constants::MIN_TEXT_SIZE
}

fn default_min_zoom() -> f32 {
    constants::MIN_ZOOM
}

fn default_max_zoom() -> f32 {
    constants::MAX_ZOOM
}

fn default_zoom_step() -> f32 {
    constants::ZOOM_STEP
}

fn default_history_capacity() -> usize {
    constants::HISTORY_CAPACITY
}

fn default_handle_hit_radius() -> f32 {
    constants::HANDLE_HIT_RADIUS
}

fn default_nudge_step() -> f32 {
    constants::NUDGE_STEP
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            min_mask_size: default_min_mask_size(),
            min_crop_size: default_min_crop_size(),
            min_text_size: default_min_text_size(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            zoom_step: default_zoom_step(),
            history_capacity: default_history_capacity(),
            handle_hit_radius: default_handle_hit_radius(),
            nudge_step: default_nudge_step(),
            text_style: TextStyle::default(),
            font_path: None,
            keybindings: KeyBindings::default(),
            platform: Platform::current(),
            log_level: LogLevel::default(),
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(EditorError::ConfigVersion {
                expected: CONFIG_VERSION,
                found: config.version,
            });
        }

        Ok(config.sanitized())
    }

    /// The configured verbosity as a `log` filter.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.into()
    }

    /// Cap the `log` facade at the configured level.
    ///
    /// The crate never installs a logger; hosts call this after installing
    /// theirs.
    pub fn apply_log_level(&self) {
        log::set_max_level(self.level_filter());
    }

    /// Pull nonsensical values back to usable ones.
    pub fn sanitized(mut self) -> Self {
        let positive_or = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        self.min_mask_size = positive_or(self.min_mask_size, constants::MIN_MASK_SIZE);
        self.min_crop_size = positive_or(self.min_crop_size, constants::MIN_CROP_SIZE);
        self.min_text_size = positive_or(self.min_text_size, constants::MIN_TEXT_SIZE);
        self.min_zoom = positive_or(self.min_zoom, constants::MIN_ZOOM);
        self.max_zoom = positive_or(self.max_zoom, constants::MAX_ZOOM).max(self.min_zoom);
        self.zoom_step = if self.zoom_step.is_finite() && self.zoom_step > 1.0 {
            self.zoom_step
        } else {
            constants::ZOOM_STEP
        };
        self.history_capacity = self.history_capacity.max(1);
        self.handle_hit_radius = positive_or(self.handle_hit_radius, constants::HANDLE_HIT_RADIUS);
        self.nudge_step = positive_or(self.nudge_step, constants::NUDGE_STEP);
        self.text_style = self.text_style.sanitized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let mut config = EditorConfig::new();
        config.history_capacity = 7;
        config.font_path = Some(PathBuf::from("/tmp/font.ttf"));
        config.platform = Platform::Mac;

        let json = config.to_json().unwrap();
        let parsed = EditorConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = EditorConfig::from_json(r#"{ "min_text_size": 60.0 }"#).unwrap();
        assert_eq!(parsed.min_text_size, 60.0);
        assert_eq!(parsed.min_mask_size, constants::MIN_MASK_SIZE);
        assert_eq!(parsed.history_capacity, constants::HISTORY_CAPACITY);
        assert_eq!(parsed.version, CONFIG_VERSION);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = EditorConfig::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(err, EditorError::ConfigVersion { found: 99, .. }));
    }

    #[test]
    fn test_invalid_json() {
        let err = EditorConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, EditorError::Json(_)));
    }

    #[test]
    fn test_sanitize_bad_values() {
        let parsed = EditorConfig::from_json(
            r#"{ "min_zoom": -1.0, "max_zoom": 0.01, "zoom_step": 0.5, "history_capacity": 0 }"#,
        )
        .unwrap();
        assert_eq!(parsed.min_zoom, constants::MIN_ZOOM);
        assert!(parsed.max_zoom >= parsed.min_zoom);
        assert_eq!(parsed.zoom_step, constants::ZOOM_STEP);
        assert_eq!(parsed.history_capacity, 1);
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(EditorConfig::default().level_filter(), log::LevelFilter::Info);
        let quiet = EditorConfig::from_json(r#"{ "log_level": "off" }"#).unwrap();
        assert_eq!(quiet.level_filter(), log::LevelFilter::Off);
        let json = serde_json::to_string(&LogLevel::Debug).unwrap();
        assert_eq!(json, "\"debug\"");
    }
}
