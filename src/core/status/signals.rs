//! Bridge from OS signals to the scheduler.
//!
//! `SIGUSR1` requests an immediate refresh and `SIGUSR2` a debounced one
//! (bind it to volume or layout keys that fire in bursts). `SIGINT` and
//! `SIGTERM` ask the loop to stop between cycles.
//!
//! Listeners run as tokio tasks; the only thing they do is record the event
//! in [`ScheduleState`] or send on the shutdown channel.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::schedule::{ScheduleState, WakeKind};
use crate::error::{Result, StatusError};

/// Owns the signal listener tasks; dropping it stops them.
pub struct SignalBridge {
    tasks: Vec<JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalBridge {
    /// Install the listeners. Must be called from inside a tokio runtime.
    pub fn register(state: Arc<ScheduleState>, shutdown_tx: broadcast::Sender<()>) -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let listen = |kind: SignalKind, name: &str| {
            signal(kind).map_err(|e| StatusError::signal_registration(format!("{}: {}", name, e)))
        };

        let refresh_now = listen(SignalKind::user_defined1(), "SIGUSR1")?;
        let refresh_settled = listen(SignalKind::user_defined2(), "SIGUSR2")?;
        let mut interrupt = listen(SignalKind::interrupt(), "SIGINT")?;
        let mut terminate = listen(SignalKind::terminate(), "SIGTERM")?;

        let mut tasks = vec![
            tokio::spawn(forward_wakes(refresh_now, Arc::clone(&state), WakeKind::Immediate)),
            tokio::spawn(forward_wakes(refresh_settled, state, WakeKind::Debounced)),
        ];

        tasks.push(tokio::spawn(async move {
            let name = tokio::select! {
                _ = interrupt.recv() => "SIGINT",
                _ = terminate.recv() => "SIGTERM",
            };
            log::info!("Received {}, stopping after the current cycle", name);
            // No receivers left means the loop already stopped.
            let _ = shutdown_tx.send(());
        }));

        log::debug!("Signal listeners registered");
        Ok(Self { tasks })
    }
}

#[cfg(not(unix))]
impl SignalBridge {
    pub fn register(_state: Arc<ScheduleState>, _shutdown_tx: broadcast::Sender<()>) -> Result<Self> {
        Err(StatusError::signal_registration(
            "refresh signals need a unix platform",
        ))
    }
}

#[cfg(unix)]
async fn forward_wakes(
    mut signal: tokio::signal::unix::Signal,
    state: Arc<ScheduleState>,
    kind: WakeKind,
) {
    while signal.recv().await.is_some() {
        log::trace!("refresh trigger: {:?}", kind);
        state.set_pending_wake(kind);
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
