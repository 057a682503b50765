//! Cycle timing and the interruptible wait between cycles.
//!
//! Cycles are aligned to wall-clock minute boundaries. The wait can be cut
//! short by the two refresh triggers, which only ever touch
//! [`ScheduleState`] through [`ScheduleState::set_pending_wake`].

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{sleep_until, Instant};

/// Default pause after a debounced trigger before sampling.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(160);

const PENDING_IMMEDIATE: u8 = 0b01;
const PENDING_DEBOUNCED: u8 = 0b10;

/// The two kinds of external refresh trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeKind {
    /// Refresh now.
    Immediate,
    /// Refresh once the triggering burst has settled.
    Debounced,
}

/// Why the wait between cycles ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    Timeout,
    ImmediateSignal,
    DebouncedSignal,
}

/// Seconds to wait until the next minute boundary, clamped to `1..=60`.
pub fn delay_until_next_minute(seconds_into_minute: u32) -> Duration {
    let secs = 60u32.saturating_sub(seconds_into_minute).clamp(1, 60);
    Duration::from_secs(u64::from(secs))
}

/// Shared between the signal listeners (writers) and the scheduler (reader).
#[derive(Debug)]
pub struct ScheduleState {
    pending: AtomicU8,
    debounced_at: Mutex<Option<Instant>>,
    next_wake: Mutex<Option<Instant>>,
    wake: Notify,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleState {
    pub fn new() -> Self {
        Self {
            pending: AtomicU8::new(0),
            debounced_at: Mutex::new(None),
            next_wake: Mutex::new(None),
            wake: Notify::new(),
        }
    }

    /// Record a trigger and wake the waiter.
    ///
    /// Safe to call at any time, including while nobody is waiting: the flag
    /// stays set and `Notify` keeps a permit for the next wait.
    pub fn set_pending_wake(&self, kind: WakeKind) {
        let bit = match kind {
            WakeKind::Immediate => PENDING_IMMEDIATE,
            WakeKind::Debounced => {
                *self.debounced_at.lock() = Some(Instant::now());
                PENDING_DEBOUNCED
            }
        };
        self.pending.fetch_or(bit, Ordering::AcqRel);
        self.wake.notify_one();
    }

    /// Atomically take and clear every pending trigger.
    ///
    /// An immediate trigger wins over a debounced one.
    pub fn take_pending_wake(&self) -> Option<WakeReason> {
        let bits = self.pending.swap(0, Ordering::AcqRel);
        if bits & PENDING_IMMEDIATE != 0 {
            Some(WakeReason::ImmediateSignal)
        } else if bits & PENDING_DEBOUNCED != 0 {
            Some(WakeReason::DebouncedSignal)
        } else {
            None
        }
    }

    /// Arrival time of the most recent debounced trigger.
    pub fn last_debounced_at(&self) -> Option<Instant> {
        *self.debounced_at.lock()
    }

    /// Deadline of the wait currently in progress (or the last one).
    pub fn next_wake(&self) -> Option<Instant> {
        *self.next_wake.lock()
    }

    /// Block for `delay` or until a trigger is pending, whichever comes first.
    pub async fn wait(&self, delay: Duration) -> WakeReason {
        let deadline = Instant::now() + delay;
        *self.next_wake.lock() = Some(deadline);

        loop {
            if let Some(reason) = self.take_pending_wake() {
                return reason;
            }

            tokio::select! {
                _ = sleep_until(deadline) => {
                    // A trigger landing right at the deadline is served by
                    // this cycle rather than forcing another one.
                    return self.take_pending_wake().unwrap_or(WakeReason::Timeout);
                }
                _ = self.wake.notified() => {}
            }
        }
    }

    /// Hold off until `settle` has passed since the latest debounced trigger.
    ///
    /// Debounced triggers that arrive meanwhile push the deadline back, but
    /// never beyond `limit` (or one `settle` from now, if that is later). An
    /// immediate trigger ends the pause at once.
    pub async fn settle(&self, settle: Duration, limit: Instant) {
        let limit = limit.max(Instant::now() + settle);

        loop {
            let Some(arrived) = self.last_debounced_at() else {
                return;
            };
            let deadline = (arrived + settle).min(limit);

            tokio::select! {
                _ = sleep_until(deadline) => {}
                _ = self.wake.notified() => {}
            }

            match self.take_pending_wake() {
                Some(WakeReason::ImmediateSignal) => return,
                _ if Instant::now() >= limit => return,
                Some(_) => continue,
                None if Instant::now() >= deadline => return,
                None => continue,
            }
        }
    }
}
