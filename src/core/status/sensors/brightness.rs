//! Backlight brightness from sysfs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::future::BoxFuture;

use super::{read_blocking, source_error, Sensor};
use crate::core::status::reading::{percent_token, Metric, MetricReading};
use crate::error::{Result, StatusError};
use crate::platform::{read_first_number, read_number};

/// Reads `<dir>/actual_brightness` (or `brightness`) against `<dir>/max_brightness`.
pub struct BrightnessSensor {
    dir: PathBuf,
    timeout: Duration,
}

impl BrightnessSensor {
    pub fn new(dir: &Path, timeout: Duration) -> Self {
        Self {
            dir: dir.to_path_buf(),
            timeout,
        }
    }
}

fn read_backlight(dir: &Path) -> Result<MetricReading> {
    let max = read_number(&dir.join("max_brightness"))
        .map_err(|e| source_error(Metric::Brightness, e))?;
    let now = read_first_number(dir, &["actual_brightness", "brightness"])
        .map_err(|e| source_error(Metric::Brightness, e))?;

    percent_token(now, max)
        .map(MetricReading::ok)
        .ok_or_else(|| StatusError::unavailable(Metric::Brightness, "max_brightness is 0"))
}

impl Sensor for BrightnessSensor {
    fn metric(&self) -> Metric {
        Metric::Brightness
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn read(&self) -> BoxFuture<'_, Result<MetricReading>> {
        let dir = self.dir.clone();
        Box::pin(read_blocking(Metric::Brightness, move || read_backlight(&dir)))
    }
}
