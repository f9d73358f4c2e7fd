use log::debug;

use crate::types::ChannelStatistics;

/// 传感器满量程除数
pub const FULL_SCALE_DIVISOR: f64 = 8192.0;

/// 异常判定阈值（标准差倍数），固定不可配置
pub const ANOMALY_SIGMA: f64 = 3.0;

/// Scales raw sensor units to a fraction of full scale.
///
/// Length and order are preserved; non-finite inputs propagate unchanged.
pub fn normalize(raw_values: &[f64]) -> Vec<f64> {
    raw_values.iter().map(|&v| v / FULL_SCALE_DIVISOR).collect()
}

/// Mean and population standard deviation of `values`.
///
/// An empty slice yields `{ mean: 0, std_dev: 0 }` rather than NaN. A
/// constant slice yields exactly that constant with zero deviation.
pub fn compute_statistics(values: &[f64]) -> ChannelStatistics {
    let Some(&first) = values.first() else {
        debug!("Empty channel, using zero statistics");
        return ChannelStatistics::default();
    };

    // 求和会引入舍入误差，常量序列直接返回
    if values.iter().all(|&v| v == first) {
        return ChannelStatistics::new(first, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    ChannelStatistics::new(mean, variance.sqrt())
}

/// `|value - mean| > 3 * std_dev`, strict. With zero deviation any
/// difference from the mean counts.
pub fn is_anomaly(value: f64, mean: f64, std_dev: f64) -> bool {
    (value - mean).abs() > ANOMALY_SIGMA * std_dev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_divides_by_full_scale() {
        assert_eq!(normalize(&[8192.0, 4096.0, 0.0]), vec![1.0, 0.5, 0.0]);
        assert_eq!(normalize(&[-16384.0]), vec![-2.0]);
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn normalize_propagates_non_finite_values() {
        let out = normalize(&[f64::NAN, f64::INFINITY]);
        assert!(out[0].is_nan());
        assert_eq!(out[1], f64::INFINITY);
    }

    #[test]
    fn statistics_use_population_deviation() {
        let stats = compute_statistics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn constant_sequence_has_zero_deviation() {
        for c in [1.5, -2.0, 0.0, 0.1, 0.3, 1.0 / 3.0, 4097.0 / 8192.0] {
            let stats = compute_statistics(&[c; 3]);
            assert_eq!(stats.mean, c);
            assert_eq!(stats.std_dev, 0.0);

            let stats = compute_statistics(&[c; 7]);
            assert_eq!(stats.mean, c);
            assert_eq!(stats.std_dev, 0.0);
        }
    }

    #[test]
    fn empty_channel_yields_zero_statistics() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats, ChannelStatistics::new(0.0, 0.0));
    }

    #[test]
    fn zero_deviation_flags_any_difference() {
        assert!(is_anomaly(0.001, 0.0, 0.0));
        assert!(is_anomaly(-0.001, 0.0, 0.0));
        assert!(!is_anomaly(0.25, 0.25, 0.0));
    }

    #[test]
    fn threshold_is_strict() {
        // 0.5 ± 3 * 0.25 在二进制下可精确表示
        assert!(!is_anomaly(1.25, 0.5, 0.25));
        assert!(!is_anomaly(-0.25, 0.5, 0.25));
        assert!(is_anomaly(1.25 + 1e-9, 0.5, 0.25));
        assert!(is_anomaly(-0.25 - 1e-9, 0.5, 0.25));

        assert!(!is_anomaly(3.0, 0.0, 1.0));
        assert!(is_anomaly(3.0 + f64::EPSILON * 4.0, 0.0, 1.0));
    }
}
