//! End-to-end tests for the telemetry analysis pipeline

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use telemetry_dashboard::analysis::{analyze, analyze_records, AnalyzerError, VIBRATION_LABEL};
use telemetry_dashboard::types::{Axes, Channel, MeasurementRecord};

fn fixture() -> Value {
    serde_json::from_str(include_str!("fixtures/measurements.json")).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {}, got {}", expected, actual);
}

// ============================================================================
// FIXTURE
// ============================================================================

#[test]
fn test_fixture_labels_follow_measurement_numbers() {
    let result = analyze(&fixture()).unwrap();

    assert_eq!(result.record_count(), 12);
    assert_eq!(result.labels.first().map(String::as_str), Some("Measurement 1"));
    assert_eq!(result.labels.last().map(String::as_str), Some("Measurement 12"));
}

#[test]
fn test_fixture_acceleration_spike_is_flagged() {
    let result = analyze(&fixture()).unwrap();

    let acc_x = result.series(Channel::AccX);
    assert_eq!(acc_x.anomaly_indices(), vec![6]);
    assert_close(acc_x.values[6], 5.0);
    let stats = acc_x.statistics.unwrap();
    assert_close(stats.mean, 4.0 / 3.0);

    // 恒为 0 的通道没有异常
    assert_eq!(result.series(Channel::AccY).anomaly_count(), 0);
    assert_eq!(result.series(Channel::AccY).statistics.unwrap().std_dev, 0.0);

    // ±1g 交替，偏差只有 1 个标准差
    let acc_z = result.series(Channel::AccZ);
    assert_eq!(acc_z.anomaly_count(), 0);
    assert_close(acc_z.statistics.unwrap().std_dev, 1.0);
}

#[test]
fn test_fixture_missing_gyro_counts_as_zero() {
    let result = analyze(&fixture()).unwrap();

    let gyro_x = result.series(Channel::GyroX);
    assert_eq!(gyro_x.values[2], 0.0);
    assert_eq!(gyro_x.anomaly_indices(), vec![2]);
    assert_eq!(result.series(Channel::GyroZ).anomaly_count(), 0);
    assert_eq!(result.total_anomalies(), 2);
}

#[test]
fn test_fixture_vibration_is_never_classified() {
    let result = analyze(&fixture()).unwrap();

    assert_eq!(result.vibration.label, VIBRATION_LABEL);
    assert!(result.vibration.statistics.is_none());
    assert_eq!(result.vibration.anomaly_count(), 0);
    assert_close(result.vibration.values[5], 2f64.sqrt());
    assert_close(result.vibration.values[6], 26f64.sqrt());
}

// ============================================================================
// SHAPE ERRORS
// ============================================================================

#[test]
fn test_non_array_payload_is_rejected() {
    let err = analyze(&json!({"data": []})).unwrap_err();
    assert_eq!(err, AnalyzerError::InvalidInputShape { found: "object" });
    assert!(err.to_string().contains("got object"));
}

// ============================================================================
// RANDOMIZED RECORD SETS
// ============================================================================

fn random_axes(rng: &mut StdRng) -> Axes {
    Axes::new(
        rng.random_range(-16384..16384) as f64,
        rng.random_range(-16384..16384) as f64,
        rng.random_range(-16384..16384) as f64,
    )
}

fn random_records(rng: &mut StdRng, count: usize) -> Vec<MeasurementRecord> {
    (0..count)
        .map(|i| {
            let acceleration = random_axes(rng);
            // 部分记录缺少陀螺仪数据
            let angular_velocity = if rng.random_bool(0.2) { Axes::default() } else { random_axes(rng) };
            MeasurementRecord::new(i as i64, acceleration, angular_velocity)
        })
        .collect()
}

#[test]
fn test_series_lengths_match_record_count() {
    let mut rng = StdRng::seed_from_u64(42);

    for count in [0usize, 1, 2, 17, 250] {
        let records = random_records(&mut rng, count);
        let result = analyze_records(&records);

        assert_eq!(result.labels.len(), count);
        for (channel, series) in result.channels() {
            assert_eq!(series.values.len(), count, "{} values", channel.label());
            assert_eq!(series.point_emphasis.len(), count, "{} emphasis", channel.label());
        }
        assert_eq!(result.vibration.values.len(), count);
        assert_eq!(result.vibration.point_emphasis.len(), count);
    }
}

#[test]
fn test_repeated_analysis_is_identical() {
    let mut rng = StdRng::seed_from_u64(7);
    let records = random_records(&mut rng, 100);

    let first = analyze_records(&records);
    let second = analyze_records(&records);
    assert_eq!(first, second);
}

#[test]
fn test_flags_agree_with_three_sigma_rule() {
    let mut rng = StdRng::seed_from_u64(1234);
    let mut records = random_records(&mut rng, 200);
    records[50].acceleration.x = 16384.0 * 40.0;

    let result = analyze_records(&records);
    for (_, series) in result.channels() {
        let stats = series.statistics.unwrap();
        for (value, flagged) in series.values.iter().zip(&series.point_emphasis) {
            assert_eq!(*flagged, (value - stats.mean).abs() > 3.0 * stats.std_dev);
        }
    }
    assert!(result.series(Channel::AccX).point_emphasis[50]);
}
