//! Playback volume from the ALSA mixer, via `amixer`.

use std::time::Duration;

use futures_util::future::BoxFuture;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{source_error, Sensor};
use crate::core::status::reading::{percent_token, Metric, MetricReading};
use crate::error::{Result, StatusError};
use crate::platform::run_for_stdout;

static LIMITS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"Limits:(?:\s+Playback)?\s+(-?\d+)\s*-\s*(-?\d+)").ok());

static CHANNEL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r":\s+Playback\s+(-?\d+)(?:\s+\[(\d+)%\])?").ok());

pub struct VolumeSensor {
    card: String,
    control: String,
    timeout: Duration,
}

impl VolumeSensor {
    pub fn new(card: &str, control: &str, timeout: Duration) -> Self {
        Self {
            card: card.to_string(),
            control: control.to_string(),
            timeout,
        }
    }
}

impl Sensor for VolumeSensor {
    fn metric(&self) -> Metric {
        Metric::Volume
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn read(&self) -> BoxFuture<'_, Result<MetricReading>> {
        Box::pin(async move {
            let output = run_for_stdout(
                "amixer",
                &["-D", &self.card, "sget", &self.control],
                self.timeout,
            )
            .await
            .map_err(|e| source_error(Metric::Volume, e))?;

            parse_amixer(&output).map(MetricReading::ok).ok_or_else(|| {
                StatusError::unavailable(
                    Metric::Volume,
                    format!("no playback volume for control '{}'", self.control),
                )
            })
        })
    }
}

/// Extract the first channel's playback volume from `amixer sget` output.
///
/// The raw value is scaled against the control's limits; if the limits are
/// missing the bracketed percentage amixer prints is used as is.
pub fn parse_amixer(output: &str) -> Option<String> {
    let limits_re = LIMITS.as_ref()?;
    let channel_re = CHANNEL.as_ref()?;

    let limits = output
        .lines()
        .find_map(|line| limits_re.captures(line))
        .and_then(|caps| Some((caps[1].parse::<f64>().ok()?, caps[2].parse::<f64>().ok()?)));

    let channel = output
        .lines()
        .filter(|line| !line.trim_start().starts_with("Limits:"))
        .find_map(|line| channel_re.captures(line))?;

    let raw = channel[1].parse::<f64>().ok()?;
    if let Some((min, max)) = limits {
        if let Some(token) = percent_token(raw - min, max - min) {
            return Some(token);
        }
    }

    channel.get(2).map(|pct| format!("{}%", pct.as_str()))
}
