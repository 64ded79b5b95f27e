//! Monitor configuration.
//!
//! Loaded with figment from, in increasing priority:
//! 1. built-in defaults
//! 2. a TOML file (`rig-monitor.toml` unless another path is given)
//! 3. environment variables prefixed `RIG_MONITOR_`, nested with `__`
//!    (e.g. `RIG_MONITOR_SCAN__RADIUS=400`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parsers::record::{DEFAULT_CHUNK_SIZE, ETX};
use crate::parsers::scan::{DEFAULT_RADIUS, MAX_RADIUS};

pub const DEFAULT_CONFIG_FILE: &str = "rig-monitor.toml";
pub const ENV_PREFIX: &str = "RIG_MONITOR_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] Box<figment::Error>),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub recording: RecordingConfig,
    pub scan: ScanConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Directory holding one sub-directory per channel.
    pub data_root: PathBuf,
    pub channels: ChannelDirs,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            channels: ChannelDirs::default(),
        }
    }
}

/// Per-channel directory names under the data root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelDirs {
    pub left: String,
    pub right: String,
    pub mid: String,
    pub scan: String,
}

impl Default for ChannelDirs {
    fn default() -> Self {
        Self {
            left: "leftcam".into(),
            right: "rightcam".into(),
            mid: "signcam".into(),
            scan: "lidar".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Bytes read from the scan channel per cycle.
    pub chunk_size: usize,
    /// Byte closing each record.
    pub terminator: u8,
    /// Display-space half-width used when projecting points.
    pub radius: i32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            terminator: ETX,
            radius: DEFAULT_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Upper bound on each keyboard poll, which also paces the render loop.
    pub key_poll_ms: u64,
    /// Minimum time between synchronized cycles during playback.
    pub frame_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            key_poll_ms: 1,
            frame_interval_ms: 33,
        }
    }
}

impl DisplayConfig {
    pub fn key_poll(&self) -> Duration {
        Duration::from_millis(self.key_poll_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// One of trace, debug, info, warn, error.
    pub level: String,
    /// Log file; the terminal is occupied by the canvas.
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: PathBuf::from("rig-monitor.log"),
        }
    }
}

impl MonitorConfig {
    /// Load from [`DEFAULT_CONFIG_FILE`] (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific TOML file (missing files are skipped) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log level '{}' must be one of: {}",
                self.log.level,
                LEVELS.join(", ")
            )));
        }
        if self.scan.chunk_size == 0 {
            return Err(ConfigError::Invalid("scan.chunk_size must be positive".into()));
        }
        if !(1..=MAX_RADIUS).contains(&self.scan.radius) {
            return Err(ConfigError::Invalid(format!(
                "scan.radius must be between 1 and {MAX_RADIUS}"
            )));
        }
        let t = self.scan.terminator;
        if !t.is_ascii_control() || t.is_ascii_whitespace() {
            return Err(ConfigError::Invalid(format!(
                "scan.terminator 0x{t:02x} must be a non-whitespace ASCII control byte"
            )));
        }
        Ok(())
    }
}
