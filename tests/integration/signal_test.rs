// Real SIGUSR1 / SIGUSR2 delivery through the signal bridge

use std::sync::Arc;
use std::time::Duration;

use dwmstat::core::status::{ScheduleState, SignalBridge, WakeReason};
use tokio::sync::broadcast;

fn raise(signal: libc::c_int) {
    // SAFETY: sending a signal to our own pid; handlers are installed first.
    let rc = unsafe { libc::kill(libc::getpid(), signal) };
    assert_eq!(rc, 0);
}

async fn wait_for(state: &ScheduleState) -> WakeReason {
    tokio::time::timeout(Duration::from_secs(5), state.wait(Duration::from_secs(60)))
        .await
        .expect("signal did not wake the waiter")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_refresh_signals_wake_the_waiter() {
    let state = Arc::new(ScheduleState::new());
    let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);
    let _bridge = SignalBridge::register(Arc::clone(&state), shutdown_tx).unwrap();

    raise(libc::SIGUSR1);
    assert_eq!(wait_for(&state).await, WakeReason::ImmediateSignal);

    raise(libc::SIGUSR2);
    assert_eq!(wait_for(&state).await, WakeReason::DebouncedSignal);
    assert!(state.last_debounced_at().is_some());
}
