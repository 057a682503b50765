// Status line composition with real sysfs-backed sensors on fake trees

use std::fs;
use std::time::Duration;

use dwmstat::core::status::sensors::{BatterySensor, BrightnessSensor, TunnelProbe, TunnelSensor};
use dwmstat::core::status::{
    Metric, MetricReading, SensorSet, StatusFormatter, DEFAULT_MAX_STATUS_LEN, SEPARATOR,
};
use tempfile::TempDir;

use super::support::FixedSensor;

const TIME: &str = "W12 Tue 14 Mar 09:05";

#[tokio::test]
async fn test_end_to_end_example() {
    let root = TempDir::new().unwrap();
    let backlight = root.path().join("backlight");
    fs::create_dir(&backlight).unwrap();
    fs::write(backlight.join("max_brightness"), "255\n").unwrap();
    fs::write(backlight.join("actual_brightness"), "42\n").unwrap();
    let net = root.path().join("net");
    fs::create_dir(&net).unwrap();

    let timeout = Duration::from_secs(1);
    let sensors = SensorSet::new(vec![
        Box::new(BrightnessSensor::new(&backlight, timeout)),
        Box::new(BatterySensor::new(&root.path().join("BAT0"), timeout)),
        FixedSensor::ok(Metric::Volume, "45%"),
        FixedSensor::ok(Metric::Keyboard, "us"),
        Box::new(TunnelSensor::with_net_dir(
            TunnelProbe::Interface("tun0".into()),
            &net,
            timeout,
        )),
    ]);

    let readings = sensors.sample_all().await;
    let line = StatusFormatter::default().format(&readings, TIME, chrono::Local::now());

    assert_eq!(
        line.text,
        " ☀ 16% | 🔋 ❌ | 🔊 45% | ⌨ us | 🔓 | W12 Tue 14 Mar 09:05"
    );
    assert!(line.text.len() <= 128);
    assert!(!readings[1].ok, "missing battery is reported as a failure");
    assert!(readings[4].ok, "an absent tunnel is a normal reading");
}

#[tokio::test]
async fn test_every_failure_combination_keeps_layout() {
    let formatter = StatusFormatter::default();

    for mask in 0u32..(1 << Metric::ALL.len()) {
        let sensors = SensorSet::new(
            Metric::ALL
                .iter()
                .enumerate()
                .map(|(i, metric)| {
                    if mask & (1 << i) != 0 {
                        FixedSensor::failing(*metric)
                    } else {
                        FixedSensor::ok(*metric, "ok")
                    }
                })
                .collect(),
        );

        let readings = sensors.sample_all().await;
        let text = formatter.compose(&readings, TIME);

        assert!(text.len() <= DEFAULT_MAX_STATUS_LEN);
        assert_eq!(text.matches(SEPARATOR).count(), 5, "mask {:05b}: {}", mask, text);
        let fields: Vec<_> = text.split(SEPARATOR).collect();
        for (i, field) in fields.iter().take(5).enumerate() {
            let expected = if mask & (1 << i) != 0 { "err" } else { "ok" };
            assert!(field.ends_with(expected), "mask {:05b} field {}: {}", mask, i, field);
        }
        assert_eq!(fields[5], TIME);
    }
}

#[test]
fn test_oversized_tokens_never_overflow() {
    let formatter = StatusFormatter::default();
    let readings: Vec<_> = (0..5).map(|_| MetricReading::ok("🔋🔋🔋🔋🔋🔋🔋🔋")).collect();
    let long_time = "🕐".repeat(40);

    let text = formatter.compose(&readings, &long_time);
    assert!(text.len() <= DEFAULT_MAX_STATUS_LEN);
    // Still valid UTF-8 ending on a whole glyph.
    assert!(text.is_char_boundary(text.len()));
    assert!(text.ends_with('🕐') || text.ends_with(' ') || text.ends_with('|'));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_hung_sysfs_read_does_not_stall_the_line() {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let supply = TempDir::new().unwrap();
    let capacity = supply.path().join("capacity");
    let c_path = CString::new(capacity.as_os_str().as_bytes()).unwrap();
    assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);

    let sensors = SensorSet::new(vec![
        FixedSensor::ok(Metric::Brightness, "16%"),
        Box::new(BatterySensor::new(supply.path(), Duration::from_millis(200))),
        FixedSensor::ok(Metric::Volume, "45%"),
        FixedSensor::ok(Metric::Keyboard, "us"),
        FixedSensor::ok(Metric::Tunnel, "🔒"),
    ]);

    let start = std::time::Instant::now();
    let readings = tokio::time::timeout(Duration::from_secs(3), sensors.sample_all())
        .await
        .expect("cycle stalled on a hung battery read");
    assert!(start.elapsed() < Duration::from_secs(2));

    let text = StatusFormatter::default().compose(&readings, TIME);
    assert_eq!(text, " ☀ 16% | 🔋 err | 🔊 45% | ⌨ us | 🔒 | W12 Tue 14 Mar 09:05");

    // Let the blocked open finish before the runtime shuts down.
    drop(fs::OpenOptions::new().write(true).open(&capacity).unwrap());
}
