use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};

use super::series::AnalysisResult;
use crate::analysis::AnalyzerError;
use crate::source::FetchError;

/// 刷新失败的原因：取数失败或数据形状不对
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Analyze(#[from] AnalyzerError),
}

/// Why a refresh cycle was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    Startup,
    Manual,
    Scheduled,
}

impl fmt::Display for RefreshReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefreshReason::Startup => "startup",
            RefreshReason::Manual => "manual",
            RefreshReason::Scheduled => "scheduled",
        };
        f.write_str(name)
    }
}

/// Result of one refresh cycle, sent back from the worker thread.
#[derive(Debug)]
pub struct RefreshResult {
    pub reason: RefreshReason,
    pub outcome: Result<AnalysisResult, RefreshError>,
    pub finished_at: DateTime<Local>,
    pub elapsed: Duration,
}

impl RefreshResult {
    pub fn new(reason: RefreshReason, outcome: Result<AnalysisResult, RefreshError>, elapsed: Duration) -> Self {
        Self {
            reason,
            outcome,
            finished_at: Local::now(),
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
