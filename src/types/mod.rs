pub mod measurement;
pub mod series;
pub mod results;

pub use measurement::{Axes, MeasurementNumber, MeasurementRecord};
pub use series::{AnalysisResult, Channel, ChannelStatistics, ChartSeries};
pub use results::{RefreshError, RefreshReason, RefreshResult};
