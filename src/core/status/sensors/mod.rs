//! Sensor adapters.
//!
//! Every metric source sits behind the [`Sensor`] trait. The engine only ever
//! calls [`sample`], which enforces the source's own timeout and turns any
//! failure into a sentinel reading, so one broken source never takes the
//! others down with it.

mod battery;
mod brightness;
mod keyboard;
mod tunnel;
mod volume;

pub use battery::BatterySensor;
pub use brightness::BrightnessSensor;
pub use keyboard::KeyboardSensor;
pub use tunnel::{TunnelProbe, TunnelSensor, TUNNEL_DOWN, TUNNEL_UP};
pub use volume::VolumeSensor;

use std::io;
use std::time::Duration;

use futures_util::future::{join_all, BoxFuture};

use super::reading::{Metric, MetricReading};
use crate::core::config::Config;
use crate::error::{Result, StatusError};

/// A read-only source for one field of the status line.
pub trait Sensor: Send + Sync {
    fn metric(&self) -> Metric;

    /// Upper bound for a single [`Sensor::read`].
    fn timeout(&self) -> Duration;

    /// Query the source.
    ///
    /// Sources may return a sentinel reading themselves (`Ok` with
    /// `ok == false`) when they know a better placeholder than `err`.
    fn read(&self) -> BoxFuture<'_, Result<MetricReading>>;

    /// The reading shown in this source's slot when `read` failed.
    fn on_failure(&self, _err: &StatusError) -> MetricReading {
        MetricReading::unavailable()
    }
}

/// Sample one sensor. Never fails.
pub async fn sample(sensor: &dyn Sensor) -> MetricReading {
    let metric = sensor.metric();
    let limit = sensor.timeout();

    let err = match tokio::time::timeout(limit, sensor.read()).await {
        Ok(Ok(reading)) => {
            log::trace!("{} -> {:?}", metric, reading);
            return reading;
        }
        Ok(Err(err)) => err,
        Err(_) => StatusError::SourceTimeout {
            metric,
            after: limit,
        },
    };

    log::debug!("{} sample failed: {}", metric, err);
    sensor.on_failure(&err)
}

/// The fixed set of sensors sampled every cycle, in display order.
pub struct SensorSet {
    sensors: Vec<Box<dyn Sensor>>,
}

impl SensorSet {
    pub fn new(sensors: Vec<Box<dyn Sensor>>) -> Self {
        Self { sensors }
    }

    /// Build the compiled-in sensor set from the adapter configuration.
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.sensor_timeout();
        Self::new(vec![
            Box::new(BrightnessSensor::new(&config.backlight_dir, timeout)),
            Box::new(BatterySensor::new(&config.battery_dir, timeout)),
            Box::new(VolumeSensor::new(
                &config.mixer_card,
                &config.mixer_control,
                timeout,
            )),
            Box::new(KeyboardSensor::new(timeout)),
            Box::new(TunnelSensor::new(config.tunnel.clone(), timeout)),
        ])
    }

    pub fn metrics(&self) -> Vec<Metric> {
        self.sensors.iter().map(|s| s.metric()).collect()
    }

    /// Sample every sensor concurrently and return the readings in set order.
    pub async fn sample_all(&self) -> Vec<MetricReading> {
        join_all(self.sensors.iter().map(|s| sample(s.as_ref()))).await
    }
}

/// Run a synchronous source read on tokio's blocking pool.
///
/// File reads cannot be cancelled at an `.await`, so sysfs sources go
/// through here to stay under [`sample`]'s timeout. A read that hangs keeps
/// its blocking thread until the kernel returns.
pub(crate) async fn read_blocking<T, F>(metric: Metric, read: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(read)
        .await
        .map_err(|e| StatusError::unavailable(metric, format!("reader task failed: {}", e)))?
}

/// Map an I/O failure of `metric` onto the source error taxonomy.
pub(crate) fn source_error(metric: Metric, err: io::Error) -> StatusError {
    match err.kind() {
        io::ErrorKind::NotFound => StatusError::SourceAbsent(metric),
        _ => StatusError::unavailable(metric, err.to_string()),
    }
}
