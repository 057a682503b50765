use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::status::formatter::DEFAULT_MAX_STATUS_LEN;
use crate::core::status::schedule::DEFAULT_SETTLE_DELAY;
use crate::core::status::sensors::TunnelProbe;
use crate::error::{Result, StatusError};
use crate::ui::formatters::WeekdayStyle;

/// Longest settle delay accepted from the config file.
const MAX_SETTLE_DELAY_MS: u64 = 5_000;

/// Where each sensor adapter looks for its source.
///
/// Which metrics are shown is fixed; only their locations can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// sysfs backlight device directory
    pub backlight_dir: PathBuf,
    /// sysfs power supply directory of the battery
    pub battery_dir: PathBuf,
    /// ALSA device handed to `amixer -D`
    pub mixer_card: String,
    /// ALSA simple control to read
    pub mixer_control: String,
    pub tunnel: TunnelProbe,
    /// Per-source deadline for one sample
    pub sensor_timeout_ms: u64,
    /// Pause after a debounced refresh trigger
    pub settle_delay_ms: u64,
    /// Maximum status line length in bytes
    pub max_status_len: usize,
    pub weekday_style: WeekdayStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backlight_dir: PathBuf::from("/sys/class/backlight/intel_backlight"),
            battery_dir: PathBuf::from("/sys/class/power_supply/BAT0"),
            mixer_card: "default".to_string(),
            mixer_control: "Master".to_string(),
            tunnel: TunnelProbe::default(),
            sensor_timeout_ms: 2_000,
            settle_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
            max_status_len: DEFAULT_MAX_STATUS_LEN,
            weekday_style: WeekdayStyle::default(),
        }
    }
}

impl Config {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from `path`. A missing or empty file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let data = fs::read_to_string(path).map_err(|e| {
            StatusError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_json::from_str(&data).map_err(|e| {
            StatusError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        config.validate()?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StatusError::config("Could not determine config directory"))?;

        Ok(config_dir.join("dwmstat").join("config.json"))
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_status_len == 0 {
            return Err(StatusError::config("max_status_len must be at least 1"));
        }
        if self.sensor_timeout_ms == 0 {
            return Err(StatusError::config("sensor_timeout_ms must be at least 1"));
        }
        if self.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(StatusError::config(format!(
                "settle_delay_ms must not exceed {}",
                MAX_SETTLE_DELAY_MS
            )));
        }
        if self.mixer_card.is_empty() || self.mixer_control.is_empty() {
            return Err(StatusError::config("mixer_card and mixer_control must not be empty"));
        }

        match &self.tunnel {
            TunnelProbe::Interface(name) => {
                if name.is_empty() || name.contains('/') || name == "." || name == ".." {
                    return Err(StatusError::config(format!(
                        "invalid tunnel interface name: {:?}",
                        name
                    )));
                }
            }
            TunnelProbe::Reachability { host, timeout_secs } => {
                if host.is_empty() || host.starts_with('-') || host.contains(char::is_whitespace) {
                    return Err(StatusError::config(format!("invalid tunnel host: {:?}", host)));
                }
                if *timeout_secs == 0 {
                    return Err(StatusError::config("tunnel timeout_secs must be at least 1"));
                }
            }
        }

        Ok(())
    }

    pub fn sensor_timeout(&self) -> Duration {
        Duration::from_millis(self.sensor_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Deadline for one publish to the display sink.
    pub fn publish_timeout(&self) -> Duration {
        self.sensor_timeout()
    }
}
