use std::time::Duration;
use eframe::{egui, Frame};
use crossbeam_channel::{Receiver, Sender};
use log::info;

use crate::config::ConfigManager;
use crate::types::{RefreshReason, RefreshResult};
use super::handlers::RefreshHandler;
use super::state::AppState;

pub struct DashboardApp {
    // 统一的状态管理
    pub state: AppState,

    // 配置管理
    pub config: ConfigManager,

    // 最近一次保存配置的结果
    pub settings_status: String,
}

impl DashboardApp {
    pub fn new(
        request_sender: Sender<RefreshReason>,
        result_receiver: Receiver<RefreshResult>,
        config: ConfigManager,
    ) -> Self {
        let source_label = config.get_config().source.data_source().to_string();
        let mut state = AppState::new(request_sender, result_receiver, source_label);

        // 启动时总是先取一次数据
        state.request_refresh(RefreshReason::Startup);

        info!("Dashboard started, source: {}", state.source_label);

        Self {
            state,
            config,
            settings_status: String::new(),
        }
    }

    pub fn save_settings(&mut self) {
        self.settings_status = match self.config.save() {
            Ok(()) => "Settings saved".to_string(),
            Err(e) => {
                log::error!("Failed to save settings: {}", e);
                format!("Failed to save settings: {}", e)
            }
        };
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 设置明亮模式主题
        ctx.set_visuals(egui::Visuals::light());

        // 渲染UI组件
        crate::app::ui::render_status_bar(self, ctx);
        crate::app::ui::render_bottom_status_bar(self, ctx);
        crate::app::ui::render_main_panel(self, ctx);

        // 处理刷新结果与定时刷新
        RefreshHandler::handle_refresh(self);

        // 处理键盘输入
        RefreshHandler::handle_keyboard_input(self, ctx);

        ctx.request_repaint_after(Duration::from_millis(150));
    }
}
