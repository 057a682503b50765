//! Status daemon command handler.
//!
//! Loads the configuration, connects to the display sink, installs the
//! refresh signals and hands control to the cycle loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use tokio::sync::broadcast;

use crate::core::status::{
    Publisher, RootWindowPublisher, ScheduleState, SensorSet, SignalBridge, StatusEngine,
    StatusFormatter, StdoutPublisher, WakeKind,
};
use crate::core::Config;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// How the daemon was asked to run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Publish a single line and exit
    pub once: bool,
    /// Write lines to stdout instead of the root window
    pub stdout: bool,
}

/// Execute the default (daemon) command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let options = RunOptions {
        once: matches.get_flag("once"),
        stdout: matches.get_flag("stdout"),
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .thread_name("dwmstat-worker")
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(run(config, options));
    // A sysfs read still stuck in the kernel must not hold up exit.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

/// Load the config named by `--config`, or the default one.
pub fn load_config(matches: &ArgMatches) -> Result<Config> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    Ok(config?)
}

async fn run(config: Config, options: RunOptions) -> Result<()> {
    if options.stdout {
        drive(StdoutPublisher::new(), &config, options).await
    } else {
        let publisher = RootWindowPublisher::connect(config.publish_timeout()).await?;
        drive(publisher, &config, options).await
    }
}

async fn drive<P: Publisher>(publisher: P, config: &Config, options: RunOptions) -> Result<()> {
    let sensors = SensorSet::from_config(config);
    log::debug!("Sampling {:?}", sensors.metrics());

    let state = Arc::new(ScheduleState::new());
    let mut engine = StatusEngine::new(sensors, publisher, Arc::clone(&state))
        .formatter(StatusFormatter::new(config.max_status_len))
        .settle_delay(config.settle_delay())
        .weekday_style(config.weekday_style);

    if options.once {
        let line = engine.run_cycle().await?;
        log::info!("Published: {}", line.text);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let _bridge = SignalBridge::register(Arc::clone(&state), shutdown_tx)?;

    // First line goes out right away instead of at the next minute.
    state.set_pending_wake(WakeKind::Immediate);

    log::info!("dwmstat running (pid {})", std::process::id());
    let cycles = engine.run(shutdown_rx).await;
    log::info!("Stopped after {} cycles", cycles);
    Ok(())
}
