//! Battery charge and state from `/sys/class/power_supply/BATn`.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::future::BoxFuture;

use super::{read_blocking, source_error, Sensor};
use crate::core::status::reading::{Metric, MetricReading};
use crate::error::{Result, StatusError};
use crate::platform::{read_number, read_trimmed};

/// Shown when the machine has no battery at the configured location.
pub const NO_BATTERY: &str = "❌";
/// Shown when the kernel reports a negative capacity.
pub const UNKNOWN_CAPACITY: &str = "???%";

const CHARGING: &str = "⌁⏶";
const DISCHARGING: &str = "⌁⏷";

pub struct BatterySensor {
    dir: PathBuf,
    timeout: Duration,
}

impl BatterySensor {
    pub fn new(dir: &Path, timeout: Duration) -> Self {
        Self {
            dir: dir.to_path_buf(),
            timeout,
        }
    }
}

/// Charge in percent: `capacity` if the driver exposes it, otherwise
/// `energy_now / energy_full` or `charge_now / charge_full`.
fn capacity(dir: &Path) -> io::Result<f64> {
    match read_number(&dir.join("capacity")) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        other => return other,
    }

    for (now_attr, full_attr) in [("energy_now", "energy_full"), ("charge_now", "charge_full")] {
        let pair = read_number(&dir.join(now_attr))
            .and_then(|now| read_number(&dir.join(full_attr)).map(|full| (now, full)));
        match pair {
            Ok((_, full)) if full <= 0.0 => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} is 0", full_attr),
                ))
            }
            Ok((now, full)) => return Ok(now / full * 100.0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no charge attributes under {}", dir.display()),
    ))
}

/// Glyph for the charge state; empty when the state is unknown.
fn state_glyph(dir: &Path) -> &'static str {
    match read_trimmed(&dir.join("status")) {
        Ok(status) => charge_state_glyph(&status),
        Err(e) => {
            log::debug!("battery status unreadable: {}", e);
            ""
        }
    }
}

fn read_supply(dir: &Path) -> Result<MetricReading> {
    let capacity = capacity(dir).map_err(|e| source_error(Metric::Battery, e))?;

    if capacity < 0.0 {
        return Ok(MetricReading::sentinel(UNKNOWN_CAPACITY));
    }

    Ok(MetricReading::ok(format!(
        "{}{}%",
        state_glyph(dir),
        capacity.round() as i64
    )))
}

/// Map a `status` attribute (`Charging`, `Discharging`, `Full`, ...) to its glyph.
pub fn charge_state_glyph(status: &str) -> &'static str {
    match status.chars().next() {
        Some('C') => CHARGING,
        Some('D') => DISCHARGING,
        _ => "",
    }
}

impl Sensor for BatterySensor {
    fn metric(&self) -> Metric {
        Metric::Battery
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn read(&self) -> BoxFuture<'_, Result<MetricReading>> {
        let dir = self.dir.clone();
        Box::pin(read_blocking(Metric::Battery, move || read_supply(&dir)))
    }

    fn on_failure(&self, err: &StatusError) -> MetricReading {
        match err {
            StatusError::SourceAbsent(_) => MetricReading::sentinel(NO_BATTERY),
            _ => MetricReading::unavailable(),
        }
    }
}
