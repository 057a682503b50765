//! Display sinks.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use futures_util::future::{self, BoxFuture};

use crate::error::{Result, StatusError};
use crate::platform::run_with_env;

/// Receives one status line per cycle.
pub trait Publisher: Send {
    fn publish<'a>(&'a mut self, text: &'a str) -> BoxFuture<'a, Result<()>>;
}

/// Sets the X root window name, which dwm shows as its status text.
pub struct RootWindowPublisher {
    xsetroot: PathBuf,
    display: OsString,
    timeout: Duration,
}

impl RootWindowPublisher {
    /// Connect to the display named by `$DISPLAY`.
    pub async fn connect(timeout: Duration) -> Result<Self> {
        Self::connect_to(std::env::var_os("DISPLAY"), timeout).await
    }

    /// Locate `xsetroot` and check that `display` accepts a title.
    ///
    /// Every failure here is a [`StatusError::DisplaySink`].
    pub async fn connect_to(display: Option<OsString>, timeout: Duration) -> Result<Self> {
        let display = match display {
            Some(display) if !display.is_empty() => display,
            _ => return Err(StatusError::display_sink("DISPLAY is not set")),
        };

        let xsetroot = which::which("xsetroot")
            .map_err(|e| StatusError::display_sink(format!("xsetroot not found: {}", e)))?;

        let mut publisher = Self {
            xsetroot,
            display,
            timeout,
        };
        publisher
            .set_name("")
            .await
            .map_err(|e| StatusError::display_sink(e.to_string()))?;

        log::info!(
            "Publishing to the root window of {} via {}",
            publisher.display.to_string_lossy(),
            publisher.xsetroot.display()
        );
        Ok(publisher)
    }

    async fn set_name(&mut self, text: &str) -> Result<()> {
        let program = self.xsetroot.to_string_lossy();
        let output = run_with_env(
            &program,
            &["-name", text],
            &[("DISPLAY", self.display.as_os_str())],
            self.timeout,
        )
        .await
        .map_err(|e| StatusError::publish(format!("xsetroot: {}", e)))?;

        if !output.status.success() {
            return Err(StatusError::publish(format!(
                "xsetroot exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

impl Publisher for RootWindowPublisher {
    fn publish<'a>(&'a mut self, text: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(self.set_name(text))
    }
}

/// Writes one line per cycle to stdout.
#[derive(Debug, Default)]
pub struct StdoutPublisher;

impl StdoutPublisher {
    pub fn new() -> Self {
        Self
    }
}

impl Publisher for StdoutPublisher {
    fn publish<'a>(&'a mut self, text: &'a str) -> BoxFuture<'a, Result<()>> {
        let result = {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", text).and_then(|_| out.flush())
        };
        Box::pin(future::ready(
            result.map_err(|e| StatusError::publish(format!("stdout: {}", e))),
        ))
    }
}
