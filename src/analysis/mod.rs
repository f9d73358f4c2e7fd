//! Telemetry analysis: normalization, per-channel statistics and
//! anomaly classification. Everything here is synchronous and pure.

pub mod pipeline;
pub mod statistics;

pub use pipeline::{
    analyze, analyze_records, build_chart_series, compute_vibration_magnitude, parse_records,
    VIBRATION_LABEL,
};
pub use statistics::{compute_statistics, is_anomaly, normalize, ANOMALY_SIGMA, FULL_SCALE_DIVISOR};

/// 分析错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Invalid input shape: expected an array of measurements, got {found}")]
    InvalidInputShape { found: &'static str },
}
