use super::measurement::MeasurementRecord;

/// 单通道统计量（总体标准差）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelStatistics {
    pub mean: f64,
    pub std_dev: f64,
}

impl ChannelStatistics {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }
}

/// 六个原始通道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    AccX,
    AccY,
    AccZ,
    GyroX,
    GyroY,
    GyroZ,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::AccX,
        Channel::AccY,
        Channel::AccZ,
        Channel::GyroX,
        Channel::GyroY,
        Channel::GyroZ,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Channel::AccX => "Acc X",
            Channel::AccY => "Acc Y",
            Channel::AccZ => "Acc Z",
            Channel::GyroX => "Gyro X",
            Channel::GyroY => "Gyro Y",
            Channel::GyroZ => "Gyro Z",
        }
    }

    /// Raw (un-normalized) value of this channel in `record`.
    pub fn raw_value(self, record: &MeasurementRecord) -> f64 {
        match self {
            Channel::AccX => record.acceleration.x,
            Channel::AccY => record.acceleration.y,
            Channel::AccZ => record.acceleration.z,
            Channel::GyroX => record.angular_velocity.x,
            Channel::GyroY => record.angular_velocity.y,
            Channel::GyroZ => record.angular_velocity.z,
        }
    }

    pub fn is_gyroscope(self) -> bool {
        matches!(self, Channel::GyroX | Channel::GyroY | Channel::GyroZ)
    }
}

/// Chart-ready series: one value and one emphasis flag per record.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
    pub point_emphasis: Vec<bool>,
    /// `None` for derived series that are never classified.
    pub statistics: Option<ChannelStatistics>,
}

impl ChartSeries {
    /// 不做异常判定的序列（振动幅值）
    pub fn unclassified(label: impl Into<String>, values: Vec<f64>) -> Self {
        let point_emphasis = vec![false; values.len()];
        Self {
            label: label.into(),
            values,
            point_emphasis,
            statistics: None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn anomaly_count(&self) -> usize {
        self.point_emphasis.iter().filter(|&&flag| flag).count()
    }

    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.point_emphasis
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| flag.then_some(i))
            .collect()
    }
}

/// Output of one analysis cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub labels: Vec<String>,
    pub acceleration: [ChartSeries; 3],
    pub angular_velocity: [ChartSeries; 3],
    pub vibration: ChartSeries,
}

impl AnalysisResult {
    pub fn record_count(&self) -> usize {
        self.labels.len()
    }

    /// 六个已分类通道，顺序与 `Channel::ALL` 一致
    pub fn channels(&self) -> impl Iterator<Item = (Channel, &ChartSeries)> {
        Channel::ALL
            .into_iter()
            .zip(self.acceleration.iter().chain(self.angular_velocity.iter()))
    }

    pub fn series(&self, channel: Channel) -> &ChartSeries {
        match channel {
            Channel::AccX => &self.acceleration[0],
            Channel::AccY => &self.acceleration[1],
            Channel::AccZ => &self.acceleration[2],
            Channel::GyroX => &self.angular_velocity[0],
            Channel::GyroY => &self.angular_velocity[1],
            Channel::GyroZ => &self.angular_velocity[2],
        }
    }

    pub fn total_anomalies(&self) -> usize {
        self.channels().map(|(_, series)| series.anomaly_count()).sum()
    }
}
