// Cycle loop behaviour under simulated time

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use dwmstat::core::status::{
    EnginePhase, Metric, ScheduleState, SensorSet, StatusEngine, WakeKind, WakeReason,
};
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::support::{CountingSensor, FixedSensor, RecordingPublisher, SimulatedClock};

fn sensors(reads: Arc<AtomicUsize>) -> SensorSet {
    SensorSet::new(vec![
        Box::new(CountingSensor {
            metric: Metric::Brightness,
            reads,
        }),
        FixedSensor::failing(Metric::Battery),
        FixedSensor::ok(Metric::Volume, "45%"),
        FixedSensor::ok(Metric::Keyboard, "us"),
        FixedSensor::ok(Metric::Tunnel, "🔒"),
    ])
}

fn engine(
    publisher: RecordingPublisher,
    clock: SimulatedClock,
) -> StatusEngine<RecordingPublisher, SimulatedClock> {
    StatusEngine::with_clock(
        sensors(Arc::new(AtomicUsize::new(0))),
        publisher,
        clock,
        Arc::new(ScheduleState::new()),
    )
}

#[tokio::test(start_paused = true)]
async fn test_timeouts_over_several_minutes_publish_fresh_lines() {
    let publisher = RecordingPublisher::default();
    let mut engine = engine(publisher.clone(), SimulatedClock::at(9, 5, 30));
    let start = Instant::now();

    for _ in 0..4 {
        assert_eq!(engine.wait_for_wake().await, WakeReason::Timeout);
        engine.run_cycle().await.unwrap();
    }

    let lines = publisher.lines.lock().clone();
    assert_eq!(lines.len(), 4);

    // First wake at the next boundary (30s in), then every full minute.
    let offsets: Vec<_> = lines.iter().map(|(at, _)| *at - start).collect();
    assert_eq!(
        offsets,
        vec![
            Duration::from_secs(30),
            Duration::from_secs(90),
            Duration::from_secs(150),
            Duration::from_secs(210),
        ]
    );

    // Every cycle sampled anew and stamped with its own minute.
    for (i, (_, text)) in lines.iter().enumerate() {
        assert!(text.starts_with(&format!(" ☀ {}% | 🔋 err |", i)), "{}", text);
        assert!(text.ends_with(&format!("09:0{}", 6 + i)), "{}", text);
    }
}

#[tokio::test(start_paused = true)]
async fn test_late_cycle_does_not_drift() {
    let publisher = RecordingPublisher::default();
    let mut engine = engine(publisher.clone(), SimulatedClock::at(9, 5, 0));

    engine.state().set_pending_wake(WakeKind::Immediate);
    assert_eq!(engine.wait_for_wake().await, WakeReason::ImmediateSignal);
    // Pretend the cycle took 7 seconds.
    tokio::time::sleep(Duration::from_secs(7)).await;
    engine.run_cycle().await.unwrap();

    // Next deadline comes from the wall clock, not from the previous one.
    assert_eq!(engine.next_delay(), Duration::from_secs(53));
}

#[tokio::test(start_paused = true)]
async fn test_immediate_signal_interrupts_idle() {
    let publisher = RecordingPublisher::default();
    let mut engine = engine(publisher.clone(), SimulatedClock::at(9, 5, 10));
    let state = Arc::clone(engine.state());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(4)).await;
        state.set_pending_wake(WakeKind::Immediate);
    });

    let start = Instant::now();
    let reason = engine.wait_for_wake().await;
    assert_eq!(reason, WakeReason::ImmediateSignal);
    assert_eq!(start.elapsed(), Duration::from_secs(4));
    assert!(start.elapsed() < Duration::from_secs(50));

    engine.run_cycle().await.unwrap();
    assert_eq!(publisher.lines.lock()[0].0 - start, Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_debounced_signal_samples_after_settle() {
    let publisher = RecordingPublisher::default();
    let mut engine = engine(publisher.clone(), SimulatedClock::at(9, 5, 10))
        .settle_delay(Duration::from_millis(160));
    let state = Arc::clone(engine.state());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(4)).await;
        state.set_pending_wake(WakeKind::Debounced);
    });

    let start = Instant::now();
    assert_eq!(engine.wait_for_wake().await, WakeReason::DebouncedSignal);
    let arrived = engine.state().last_debounced_at().unwrap();
    assert_eq!(arrived - start, Duration::from_secs(4));
    assert!(arrived.elapsed() >= Duration::from_millis(160));

    engine.run_cycle().await.unwrap();
    let published_at = publisher.lines.lock()[0].0;
    assert_eq!(published_at - arrived, Duration::from_millis(160));
}

#[tokio::test(start_paused = true)]
async fn test_both_triggers_pending_prefers_immediate() {
    let mut engine = engine(RecordingPublisher::default(), SimulatedClock::at(9, 5, 10));
    engine.state().set_pending_wake(WakeKind::Debounced);
    engine.state().set_pending_wake(WakeKind::Immediate);

    let start = Instant::now();
    assert_eq!(engine.wait_for_wake().await, WakeReason::ImmediateSignal);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_publish_failures_do_not_stop_the_loop() {
    let mut engine = engine(RecordingPublisher::failing(), SimulatedClock::at(9, 5, 0));
    let (tx, rx) = broadcast::channel(1);
    engine.state().set_pending_wake(WakeKind::Immediate);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(150)).await;
        let _ = tx.send(());
    });

    // Startup wake, then the 60s and 120s boundaries.
    assert_eq!(engine.run(rx).await, 3);
    assert_eq!(engine.phase(), EnginePhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_waits_for_cycle_in_flight() {
    let publisher = RecordingPublisher::default();
    let slow = SensorSet::new(vec![Box::new(SlowSensor)]);
    let mut engine = StatusEngine::with_clock(
        slow,
        publisher.clone(),
        SimulatedClock::at(9, 5, 0),
        Arc::new(ScheduleState::new()),
    );
    let (tx, rx) = broadcast::channel(1);
    engine.state().set_pending_wake(WakeKind::Immediate);

    tokio::spawn(async move {
        // Lands while the first cycle is still sampling.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let _ = tx.send(());
    });

    assert_eq!(engine.run(rx).await, 1);
    assert_eq!(publisher.texts().len(), 1);
}

struct SlowSensor;

impl dwmstat::core::status::Sensor for SlowSensor {
    fn metric(&self) -> Metric {
        Metric::Volume
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(2)
    }

    fn read(
        &self,
    ) -> futures_util::future::BoxFuture<'_, dwmstat::Result<dwmstat::core::status::MetricReading>>
    {
        Box::pin(async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(dwmstat::core::status::MetricReading::ok("45%"))
        })
    }
}
