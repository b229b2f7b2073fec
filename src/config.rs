//! # Configuration Management
//!
//! This module handles loading and parsing layout and timing constants from the
//! clock-config.toml file. The configuration is read once at startup and then
//! handed by reference to every component that builds or animates nodes; nothing
//! mutates it afterwards.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "clock-config.toml";

/// Highest frame rate the host loop accepts.
pub const MAX_FRAMES_PER_SECOND: u32 = 1000;

/// Errors raised while reading or validating a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid TOML for [`Config`]
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed fine but cannot be used (zero sizes, zero durations)
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Clock configuration loaded from clock-config.toml
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Flip-column layout and timing
    pub flip: FlipConfig,
    /// Needle-digit layout and timing
    pub needle: NeedleConfig,
    /// Host frame loop settings
    pub frame: FrameConfig,
}

/// Flip-column layout and animation settings
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlipConfig {
    /// Width of a column and height of one digit row in pixels
    pub row_height_px: u32,
    /// Base transition time in milliseconds; the column slide uses it as is,
    /// the marker fades out in a third of it and back in over half of it
    pub transition_ms: u64,
    /// How far the focus marker overhangs its row on every side
    pub focus_padding_px: u32,
    /// Horizontal distance between the centres of neighbouring groups
    pub group_spacing_px: u32,
    /// Extra space between the tens and ones column of one group
    pub column_gap_px: u32,
}

/// Needle-digit layout and animation settings
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeedleConfig {
    /// Diameter of one dial in pixels
    pub dial_size_px: u32,
    /// Rotation transition applied by the backend to every needle
    pub transition_ms: u64,
}

/// Host frame loop settings
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FrameConfig {
    /// How often the host calls `tick`
    pub frames_per_second: u32,
}

impl Default for FlipConfig {
    fn default() -> Self {
        FlipConfig {
            row_height_px: 45,
            transition_ms: 500,
            focus_padding_px: 4,
            group_spacing_px: 170,
            column_gap_px: 12,
        }
    }
}

impl Default for NeedleConfig {
    fn default() -> Self {
        NeedleConfig {
            dial_size_px: 46,
            transition_ms: 600,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        FrameConfig {
            frames_per_second: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            flip: FlipConfig::default(),
            needle: NeedleConfig::default(),
            frame: FrameConfig::default(),
        }
    }
}

impl FlipConfig {
    /// Full duration of the column slide.
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Marker fade-out, a third of the transition.
    pub fn fade_out(&self) -> Duration {
        self.transition() / 3
    }

    /// Marker fade-in, half of the transition. Longer than the fade-out on
    /// purpose so the marker settles gently on the new row.
    pub fn fade_in(&self) -> Duration {
        self.transition() / 2
    }
}

impl NeedleConfig {
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

impl FrameConfig {
    /// Time between two frames, never shorter than one millisecond.
    pub fn interval(&self) -> Duration {
        let fps = self.frames_per_second.clamp(1, MAX_FRAMES_PER_SECOND);
        Duration::from_secs(1) / fps
    }
}

impl Config {
    /// Load configuration from clock-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::try_load_from_path(path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded clock configuration");
                config
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unusable config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load and validate configuration, reporting why it failed.
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break layout math or the frame loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            (self.flip.row_height_px == 0, "flip.row_height_px must be positive"),
            (self.flip.transition_ms == 0, "flip.transition_ms must be positive"),
            (self.needle.dial_size_px == 0, "needle.dial_size_px must be positive"),
            (
                self.frame.frames_per_second == 0,
                "frame.frames_per_second must be positive",
            ),
            (
                self.frame.frames_per_second > MAX_FRAMES_PER_SECOND,
                "frame.frames_per_second must be at most 1000",
            ),
        ];
        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, reason)) => Err(ConfigError::Invalid((*reason).to_string())),
            None => Ok(()),
        }
    }

    /// Save current configuration as pretty TOML
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}
