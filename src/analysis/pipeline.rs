use log::{debug, warn};
use serde_json::Value;

use super::statistics::{compute_statistics, is_anomaly, normalize, FULL_SCALE_DIVISOR};
use super::AnalyzerError;
use crate::types::measurement::json_kind;
use crate::types::{AnalysisResult, Channel, ChannelStatistics, ChartSeries, MeasurementRecord};

pub const VIBRATION_LABEL: &str = "Vibration Magnitude";

/// Classifies every value against the given statistics.
pub fn build_chart_series(values: Vec<f64>, label: impl Into<String>, mean: f64, std_dev: f64) -> ChartSeries {
    let point_emphasis = values.iter().map(|&v| is_anomaly(v, mean, std_dev)).collect();

    ChartSeries {
        label: label.into(),
        values,
        point_emphasis,
        statistics: Some(ChannelStatistics::new(mean, std_dev)),
    }
}

/// 每条记录归一化加速度的欧氏范数，不做异常判定
pub fn compute_vibration_magnitude(records: &[MeasurementRecord]) -> Vec<f64> {
    records
        .iter()
        .map(|record| {
            let x = record.acceleration.x / FULL_SCALE_DIVISOR;
            let y = record.acceleration.y / FULL_SCALE_DIVISOR;
            let z = record.acceleration.z / FULL_SCALE_DIVISOR;
            (x * x + y * y + z * z).sqrt()
        })
        .collect()
}

/// Decodes the fetched payload into records.
///
/// The payload must be an array. Elements that are not objects are replaced
/// by an all-zero record so every series keeps one point per element.
pub fn parse_records(payload: &Value) -> Result<Vec<MeasurementRecord>, AnalyzerError> {
    let items = payload.as_array().ok_or(AnalyzerError::InvalidInputShape {
        found: json_kind(payload),
    })?;

    let records = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            MeasurementRecord::from_json(item).unwrap_or_else(|e| {
                warn!("Measurement #{} malformed, treating as zero: {}", i + 1, e);
                MeasurementRecord::default()
            })
        })
        .collect();

    Ok(records)
}

/// Full pipeline over already-decoded records.
pub fn analyze_records(records: &[MeasurementRecord]) -> AnalysisResult {
    let labels: Vec<String> = records
        .iter()
        .enumerate()
        .map(|(i, record)| record.label(i))
        .collect();

    let classify = |channel: Channel| {
        let raw: Vec<f64> = records.iter().map(|r| channel.raw_value(r)).collect();
        let values = normalize(&raw);
        let stats = compute_statistics(&values);
        debug!(
            "{}: mean={:.5}, std_dev={:.5}, n={}",
            channel.label(),
            stats.mean,
            stats.std_dev,
            values.len()
        );
        build_chart_series(values, channel.label(), stats.mean, stats.std_dev)
    };

    AnalysisResult {
        labels,
        acceleration: [classify(Channel::AccX), classify(Channel::AccY), classify(Channel::AccZ)],
        angular_velocity: [classify(Channel::GyroX), classify(Channel::GyroY), classify(Channel::GyroZ)],
        vibration: ChartSeries::unclassified(VIBRATION_LABEL, compute_vibration_magnitude(records)),
    }
}

/// Validates the payload shape, then runs the pipeline. On error nothing is
/// computed.
pub fn analyze(payload: &Value) -> Result<AnalysisResult, AnalyzerError> {
    let records = parse_records(payload)?;
    Ok(analyze_records(&records))
}
