//! VPN / tunnel presence.
//!
//! Two probes are supported: the existence of a network interface under
//! `/sys/class/net`, or a single ping to a host that is only reachable
//! through the tunnel.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::{read_blocking, Sensor};
use crate::core::status::reading::{Metric, MetricReading};
use crate::error::{Result, StatusError};
use crate::platform::run_with_timeout;

pub const TUNNEL_UP: &str = "🔒";
pub const TUNNEL_DOWN: &str = "🔓";

const SYS_CLASS_NET: &str = "/sys/class/net";

/// How tunnel presence is detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TunnelProbe {
    /// The tunnel is up when this interface exists.
    Interface(String),
    /// The tunnel is up when `host` answers one ping within `timeout_secs`.
    Reachability { host: String, timeout_secs: u64 },
}

impl Default for TunnelProbe {
    fn default() -> Self {
        TunnelProbe::Interface("tun0".to_string())
    }
}

pub struct TunnelSensor {
    probe: TunnelProbe,
    net_dir: PathBuf,
    timeout: Duration,
}

impl TunnelSensor {
    pub fn new(probe: TunnelProbe, timeout: Duration) -> Self {
        Self::with_net_dir(probe, Path::new(SYS_CLASS_NET), timeout)
    }

    /// Look interfaces up under `net_dir` instead of `/sys/class/net`.
    pub fn with_net_dir(probe: TunnelProbe, net_dir: &Path, timeout: Duration) -> Self {
        Self {
            probe,
            net_dir: net_dir.to_path_buf(),
            timeout,
        }
    }

    async fn check_interface(&self, name: &str) -> Result<bool> {
        let path = self.net_dir.join(name);
        read_blocking(Metric::Tunnel, move || interface_exists(&path)).await
    }

    async fn ping(&self, host: &str, timeout_secs: u64) -> Result<bool> {
        let deadline = timeout_secs.max(1).to_string();
        let output = run_with_timeout(
            "ping",
            &["-c1", "-w", &deadline, "--", host],
            Duration::from_secs(timeout_secs.max(1)) + Duration::from_millis(500),
        )
        .await
        .map_err(|e| StatusError::unavailable(Metric::Tunnel, format!("ping {}: {}", host, e)))?;

        Ok(output.status.success())
    }
}

fn interface_exists(path: &Path) -> Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StatusError::unavailable(
            Metric::Tunnel,
            format!("cannot inspect {}: {}", path.display(), e),
        )),
    }
}

impl Sensor for TunnelSensor {
    fn metric(&self) -> Metric {
        Metric::Tunnel
    }

    fn timeout(&self) -> Duration {
        match &self.probe {
            TunnelProbe::Interface(_) => self.timeout,
            TunnelProbe::Reachability { timeout_secs, .. } => {
                Duration::from_secs((*timeout_secs).max(1)) + Duration::from_secs(1)
            }
        }
    }

    fn read(&self) -> BoxFuture<'_, Result<MetricReading>> {
        Box::pin(async move {
            let up = match &self.probe {
                TunnelProbe::Interface(name) => self.check_interface(name).await?,
                TunnelProbe::Reachability { host, timeout_secs } => {
                    self.ping(host, *timeout_secs).await?
                }
            };
            log::debug!("tunnel {}", if up { "up" } else { "down" });
            Ok(MetricReading::ok(if up { TUNNEL_UP } else { TUNNEL_DOWN }))
        })
    }

    /// A failed check renders like a missing tunnel; only the log tells them apart.
    fn on_failure(&self, err: &StatusError) -> MetricReading {
        log::warn!("tunnel check failed, reporting it as down: {}", err);
        MetricReading::sentinel(TUNNEL_DOWN)
    }
}
