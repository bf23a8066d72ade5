//! Configuration system using Figment
//!
//! Every setting has a built-in default matching the stock radar setup (115200 baud,
//! 50 ms refresh, 100 cm range, 2 s fade). An optional TOML file
//! (`config/radar.toml` unless another path is given) is merged over them. Nothing is
//! read from the environment, and a missing file leaves the defaults untouched.
//!
//! # Example
//! ```no_run
//! use radar_sweep::config::RadarConfig;
//!
//! let config = RadarConfig::load()?;
//! println!("Reading from {} at {} baud", config.serial.port, config.serial.baud_rate);
//! # Ok::<(), radar_sweep::error::RadarError>(())
//! ```

use crate::error::{RadarError, RadarResult};
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/radar.toml";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RadarConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Serial transport settings
    #[serde(default)]
    pub serial: SerialConfig,
    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
    /// Colored log output (ignored by the json format)
    #[serde(default = "default_log_ansi")]
    pub log_ansi: bool,
}

/// Serial transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial port path (e.g., "/dev/ttyUSB0", "COM13")
    #[serde(default = "default_port")]
    pub port: String,
    /// Communication speed
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Per-line read timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Radar display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Window title and plot heading
    #[serde(default = "default_title")]
    pub title: String,
    /// Pause between render ticks in milliseconds
    #[serde(default = "default_update_interval_ms")]
    pub update_interval_ms: u64,
    /// Outer radius of the plot, in centimeters
    #[serde(default = "default_max_range_cm")]
    pub max_range_cm: f64,
    /// Seconds a detection stays visible before it is pruned
    #[serde(default = "default_fade_time_secs")]
    pub fade_time_secs: f64,
    /// Initial window width in points
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    /// Initial window height in points
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Radius of a detection dot
    #[serde(default = "default_point_radius")]
    pub point_radius: f32,
    /// Stroke width of the sweep line
    #[serde(default = "default_sweep_width")]
    pub sweep_width: f32,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_log_ansi() -> bool {
    true
}

fn default_port() -> String {
    if cfg!(windows) {
        "COM13".to_string()
    } else {
        "/dev/ttyUSB0".to_string()
    }
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_title() -> String {
    "Heartbeat Radar (1m, L→R)".to_string()
}

fn default_update_interval_ms() -> u64 {
    50
}

fn default_max_range_cm() -> f64 {
    100.0
}

fn default_fade_time_secs() -> f64 {
    2.0
}

fn default_window_width() -> f32 {
    800.0
}

fn default_window_height() -> f32 {
    400.0
}

fn default_point_radius() -> f32 {
    4.0
}

fn default_sweep_width() -> f32 {
    2.0
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            log_ansi: default_log_ansi(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            update_interval_ms: default_update_interval_ms(),
            max_range_cm: default_max_range_cm(),
            fade_time_secs: default_fade_time_secs(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            point_radius: default_point_radius(),
            sweep_width: default_sweep_width(),
        }
    }
}

impl SerialConfig {
    /// Read timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl DisplayConfig {
    /// Render cadence as a `Duration`.
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    /// Fade window as a `Duration`.
    pub fn fade_time(&self) -> Duration {
        Duration::from_secs_f64(self.fade_time_secs)
    }
}

impl RadarConfig {
    /// Load configuration from `config/radar.toml`, if present
    pub fn load() -> RadarResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path.
    ///
    /// A missing file leaves the defaults in place; a malformed one is an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> RadarResult<Self> {
        let config: RadarConfig = Self::figment(path.as_ref()).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// The provider stack: defaults, then the TOML file.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(RadarConfig::default())).merge(Toml::file(path))
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> RadarResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.to_lowercase().as_str()) {
            return Err(RadarError::Configuration(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            )));
        }

        let valid_formats = ["pretty", "compact", "json"];
        if !valid_formats.contains(&self.application.log_format.to_lowercase().as_str()) {
            return Err(RadarError::Configuration(format!(
                "Invalid log_format '{}'. Must be one of: {}",
                self.application.log_format,
                valid_formats.join(", ")
            )));
        }

        if self.serial.port.trim().is_empty() {
            return Err(RadarError::Configuration(
                "serial.port must not be empty".to_string(),
            ));
        }

        if self.serial.baud_rate == 0 {
            return Err(RadarError::Configuration(
                "serial.baud_rate must be positive".to_string(),
            ));
        }

        if self.serial.timeout_ms == 0 {
            return Err(RadarError::Configuration(
                "serial.timeout_ms must be positive".to_string(),
            ));
        }

        if self.display.update_interval_ms == 0 {
            return Err(RadarError::Configuration(
                "display.update_interval_ms must be positive".to_string(),
            ));
        }

        if !self.display.max_range_cm.is_finite() || self.display.max_range_cm <= 0.0 {
            return Err(RadarError::Configuration(format!(
                "display.max_range_cm must be positive and finite, got {}",
                self.display.max_range_cm
            )));
        }

        if !self.display.fade_time_secs.is_finite() || self.display.fade_time_secs <= 0.0 {
            return Err(RadarError::Configuration(format!(
                "display.fade_time_secs must be positive and finite, got {}",
                self.display.fade_time_secs
            )));
        }

        if Duration::try_from_secs_f64(self.display.fade_time_secs).is_err() {
            return Err(RadarError::Configuration(format!(
                "display.fade_time_secs is too large to represent, got {}",
                self.display.fade_time_secs
            )));
        }

        Ok(())
    }
}
