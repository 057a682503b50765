//! Status line engine.
//!
//! This module owns the polling loop: it samples every metric source,
//! composes the bounded status line and publishes it once per minute, or
//! sooner when a refresh signal arrives.

pub mod clock;
pub mod engine;
pub mod formatter;
pub mod publisher;
pub mod reading;
pub mod schedule;
pub mod sensors;
pub mod signals;

pub use clock::{Clock, SystemClock};
pub use engine::{EnginePhase, StatusEngine};
pub use formatter::{StatusFormatter, StatusLine, DEFAULT_MAX_STATUS_LEN, SEPARATOR};
pub use publisher::{Publisher, RootWindowPublisher, StdoutPublisher};
pub use reading::{Metric, MetricReading, ERR_TOKEN, MAX_TOKEN_LEN};
pub use schedule::{
    delay_until_next_minute, ScheduleState, WakeKind, WakeReason, DEFAULT_SETTLE_DELAY,
};
pub use sensors::{sample, Sensor, SensorSet, TunnelProbe};
pub use signals::SignalBridge;
