//! Active keyboard layout, via `setxkbmap -query`.

use std::time::Duration;

use futures_util::future::BoxFuture;

use super::{source_error, Sensor};
use crate::core::status::reading::{Metric, MetricReading};
use crate::error::{Result, StatusError};
use crate::platform::run_for_stdout;

pub struct KeyboardSensor {
    timeout: Duration,
}

impl KeyboardSensor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Sensor for KeyboardSensor {
    fn metric(&self) -> Metric {
        Metric::Keyboard
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn read(&self) -> BoxFuture<'_, Result<MetricReading>> {
        Box::pin(async move {
            let output = run_for_stdout("setxkbmap", &["-query"], self.timeout)
                .await
                .map_err(|e| source_error(Metric::Keyboard, e))?;

            parse_layout(&output)
                .map(MetricReading::ok)
                .ok_or_else(|| StatusError::unavailable(Metric::Keyboard, "no layout reported"))
        })
    }
}

/// First layout of the `layout:` line, e.g. `us` for `layout:     us,se`.
pub fn parse_layout(output: &str) -> Option<&str> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("layout:"))
        .and_then(|layouts| layouts.split(',').next())
        .map(str::trim)
        .filter(|layout| !layout.is_empty())
}
