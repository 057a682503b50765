//! Wall-clock source for cycle alignment and the time field.

use chrono::{DateTime, Local};

/// Source of the current local time.
///
/// The engine never calls `Local::now()` directly so cycles can be driven
/// with a simulated clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
