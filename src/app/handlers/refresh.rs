use std::time::Instant;

use eframe::egui;
use log::info;

use crate::app::app_core::DashboardApp;
use crate::types::RefreshReason;

pub struct RefreshHandler;

impl RefreshHandler {
    /// 每帧调用：收取结果，到期时自动刷新
    pub fn handle_refresh(app: &mut DashboardApp) {
        // 结果日志由刷新线程输出，这里只更新状态
        app.state.drain_results();

        let interval = app.config.get_config().source.auto_refresh_interval();
        if app.state.dashboard.should_schedule(Instant::now(), interval) {
            app.state.request_refresh(RefreshReason::Scheduled);
        }
    }

    pub fn handle_keyboard_input(app: &mut DashboardApp, ctx: &egui::Context) {
        let refresh_pressed = ctx.input(|i| i.key_pressed(egui::Key::R) || i.key_pressed(egui::Key::F5));
        if refresh_pressed {
            Self::request_manual_refresh(app);
        }
    }

    pub fn request_manual_refresh(app: &mut DashboardApp) {
        if app.state.dashboard.refresh_in_flight {
            info!("Refresh already in progress, ignoring manual request");
            return;
        }
        app.state.request_refresh(RefreshReason::Manual);
    }
}
