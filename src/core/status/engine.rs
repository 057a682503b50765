//! The polling loop: wait, sample, format, publish, repeat.

use std::sync::Arc;
use std::time::Duration;

use chrono::Timelike;
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::clock::{Clock, SystemClock};
use super::formatter::{StatusFormatter, StatusLine};
use super::publisher::Publisher;
use super::schedule::{delay_until_next_minute, ScheduleState, WakeReason, DEFAULT_SETTLE_DELAY};
use super::sensors::SensorSet;
use crate::error::Result;
use crate::ui::formatters::{format_clock, WeekdayStyle};

/// Where the engine currently is within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    Sampling,
    Publishing,
}

/// Drives the cycle loop.
///
/// Cycles never overlap: a cycle always runs to completion before the next
/// wait begins.
pub struct StatusEngine<P: Publisher, C: Clock = SystemClock> {
    sensors: SensorSet,
    formatter: StatusFormatter,
    publisher: P,
    clock: C,
    state: Arc<ScheduleState>,
    settle_delay: Duration,
    weekday_style: WeekdayStyle,
    phase: EnginePhase,
    cycles: u64,
}

impl<P: Publisher> StatusEngine<P, SystemClock> {
    pub fn new(sensors: SensorSet, publisher: P, state: Arc<ScheduleState>) -> Self {
        Self::with_clock(sensors, publisher, SystemClock, state)
    }
}

impl<P: Publisher, C: Clock> StatusEngine<P, C> {
    pub fn with_clock(sensors: SensorSet, publisher: P, clock: C, state: Arc<ScheduleState>) -> Self {
        Self {
            sensors,
            formatter: StatusFormatter::default(),
            publisher,
            clock,
            state,
            settle_delay: DEFAULT_SETTLE_DELAY,
            weekday_style: WeekdayStyle::default(),
            phase: EnginePhase::Idle,
            cycles: 0,
        }
    }

    pub fn formatter(mut self, formatter: StatusFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn weekday_style(mut self, style: WeekdayStyle) -> Self {
        self.weekday_style = style;
        self
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn state(&self) -> &Arc<ScheduleState> {
        &self.state
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Number of cycles completed so far, published or not.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Delay until the next minute boundary, from the current wall clock.
    pub fn next_delay(&self) -> Duration {
        delay_until_next_minute(self.clock.now().second())
    }

    /// Enter `Idle` and wait for the next wake.
    ///
    /// A debounced wake returns only once its settle delay has passed.
    /// Settling never runs past the minute boundary the wait was aiming for,
    /// unless that boundary is closer than one settle delay.
    pub async fn wait_for_wake(&mut self) -> WakeReason {
        self.phase = EnginePhase::Idle;
        let delay = self.next_delay();
        log::debug!("Idle for up to {:?}", delay);

        let reason = self.state.wait(delay).await;
        if reason == WakeReason::DebouncedSignal {
            // A burst may hold sampling back to the minute boundary, no further.
            let limit = self.state.next_wake().unwrap_or_else(Instant::now);
            self.state.settle(self.settle_delay, limit).await;
        }
        log::debug!("Woke up: {:?}", reason);
        reason
    }

    /// Run one Sampling → Publishing cycle.
    ///
    /// Sensor failures are already folded into sentinel tokens; the only
    /// error returned is a failed publish, which loses this cycle.
    pub async fn run_cycle(&mut self) -> Result<StatusLine> {
        self.phase = EnginePhase::Sampling;
        let readings = self.sensors.sample_all().await;

        self.phase = EnginePhase::Publishing;
        let now = self.clock.now();
        let time_text = format_clock(&now, self.weekday_style);
        let line = self.formatter.format(&readings, &time_text, now);

        let published = self.publisher.publish(&line.text).await;
        self.cycles += 1;
        self.phase = EnginePhase::Idle;

        published?;
        log::debug!("Published: {}", line.text);
        Ok(line)
    }

    /// Loop until `shutdown` fires. Returns the number of cycles run.
    ///
    /// Shutdown is only observed while idle, so an in-flight cycle always
    /// finishes.
    pub async fn run(&mut self, mut shutdown: broadcast::Receiver<()>) -> u64 {
        loop {
            tokio::select! {
                _ = self.wait_for_wake() => {}
                _ = shutdown.recv() => break,
            }

            if let Err(e) = self.run_cycle().await {
                log::warn!("Cycle lost: {}", e);
            }
        }

        self.phase = EnginePhase::Idle;
        self.cycles
    }
}
