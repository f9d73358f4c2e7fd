use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, Sender};
use egui::Color32;
use log::warn;

use crate::types::{AnalysisResult, RefreshReason, RefreshResult};

/// 应用状态管理模块
/// 仪表盘数据状态与 GUI 无关，便于单独测试

/// 仪表盘当前显示状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardStatus {
    /// 尚未发起任何请求
    Waiting,
    Loading,
    Live,
    /// 最近一次刷新失败，仍显示上一次的数据
    Stale,
    Failed,
}

impl DashboardStatus {
    pub fn label(self) -> &'static str {
        match self {
            DashboardStatus::Waiting => "Waiting",
            DashboardStatus::Loading => "Loading",
            DashboardStatus::Live => "Live",
            DashboardStatus::Stale => "Stale",
            DashboardStatus::Failed => "Failed",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            DashboardStatus::Waiting => Color32::from_rgb(120, 120, 120), // 灰色
            DashboardStatus::Loading => Color32::from_rgb(255, 165, 0),   // 橙色
            DashboardStatus::Live => Color32::from_rgb(0, 150, 0),        // 绿色
            DashboardStatus::Stale => Color32::from_rgb(200, 120, 0),
            DashboardStatus::Failed => Color32::from_rgb(150, 0, 0),      // 红色
        }
    }
}

/// Latest analysis plus bookkeeping about refresh cycles.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub analysis: Option<AnalysisResult>,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
    pub last_reason: Option<RefreshReason>,
    pub refresh_in_flight: bool,
    pub last_request_at: Option<Instant>,
    pub successful_cycles: u64,
    pub failed_cycles: u64,
}

impl DashboardState {
    pub fn begin_refresh(&mut self, reason: RefreshReason, now: Instant) {
        self.refresh_in_flight = true;
        self.last_reason = Some(reason);
        self.last_request_at = Some(now);
    }

    /// 失败时保留上一次的分析结果，只记录错误
    pub fn apply_refresh(&mut self, result: RefreshResult) {
        self.refresh_in_flight = false;
        match result.outcome {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.last_error = None;
                self.last_updated = Some(result.finished_at);
                self.successful_cycles += 1;
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.failed_cycles += 1;
            }
        }
    }

    /// Whether an automatic refresh is due. Never while one is in flight.
    pub fn should_schedule(&self, now: Instant, interval: Option<Duration>) -> bool {
        let Some(interval) = interval else {
            return false;
        };
        if self.refresh_in_flight {
            return false;
        }
        match self.last_request_at {
            Some(last) => now.saturating_duration_since(last) >= interval,
            None => true,
        }
    }

    pub fn status(&self) -> DashboardStatus {
        match (&self.analysis, &self.last_error) {
            _ if self.refresh_in_flight => DashboardStatus::Loading,
            (Some(_), None) => DashboardStatus::Live,
            (Some(_), Some(_)) => DashboardStatus::Stale,
            (None, Some(_)) => DashboardStatus::Failed,
            (None, None) => DashboardStatus::Waiting,
        }
    }

    pub fn last_updated_text(&self) -> String {
        self.last_updated
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string())
    }
}

/// 与刷新线程通信的通道
#[derive(Debug)]
pub struct RefreshChannels {
    pub request_sender: Sender<RefreshReason>,
    pub result_receiver: Receiver<RefreshResult>,
}

/// 统一的应用状态管理
#[derive(Debug)]
pub struct AppState {
    pub dashboard: DashboardState,
    pub channels: RefreshChannels,
    pub source_label: String,
}

impl AppState {
    pub fn new(
        request_sender: Sender<RefreshReason>,
        result_receiver: Receiver<RefreshResult>,
        source_label: String,
    ) -> Self {
        Self {
            dashboard: DashboardState::default(),
            channels: RefreshChannels {
                request_sender,
                result_receiver,
            },
            source_label,
        }
    }

    /// 发送刷新请求；已有请求未完成时忽略
    pub fn request_refresh(&mut self, reason: RefreshReason) -> bool {
        if self.dashboard.refresh_in_flight {
            return false;
        }

        let now = Instant::now();
        match self.channels.request_sender.try_send(reason) {
            Ok(()) => {
                self.dashboard.begin_refresh(reason, now);
                true
            }
            Err(e) => {
                // 记录请求时间，自动刷新按间隔重试而不是每帧重试
                self.dashboard.last_request_at = Some(now);
                warn!("Failed to queue {} refresh: {}", reason, e);
                self.dashboard.last_error = Some(format!("Failed to queue refresh: {}", e));
                false
            }
        }
    }

    /// 处理刷新线程返回的结果
    pub fn drain_results(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.channels.result_receiver.try_recv() {
            self.dashboard.apply_refresh(result);
            applied += 1;
        }
        applied
    }
}
