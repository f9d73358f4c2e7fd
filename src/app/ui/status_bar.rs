use eframe::egui;
use crate::app::app_core::DashboardApp;
use crate::app::handlers::RefreshHandler;
use crate::plotter::anomaly_summary;

pub fn render_status_bar(app: &mut DashboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("status_bar")
        .min_height(40.0)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("Status:");

                let status = app.state.dashboard.status();
                ui.colored_label(status.color(), status.label());

                ui.separator();
                ui.label(format!("Source: {}", app.state.source_label));

                ui.separator();
                render_analysis_details(app, ui);

                ui.separator();
                ui.label(format!("Updated: {}", app.state.dashboard.last_updated_text()));

                if let Some(interval) = app.config.get_config().source.auto_refresh_interval() {
                    ui.separator();
                    ui.label(format!("Auto refresh: {}s", interval.as_secs()));
                }

                // 最右边放刷新按钮
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let idle = !app.state.dashboard.refresh_in_flight;
                    if ui
                        .add_enabled(idle, egui::Button::new("🔄 Refresh (R)"))
                        .clicked()
                    {
                        RefreshHandler::request_manual_refresh(app);
                    }

                    if !idle {
                        ui.spinner();
                    }
                });
            });
            ui.add_space(5.0);
        });
}

fn render_analysis_details(app: &DashboardApp, ui: &mut egui::Ui) {
    match &app.state.dashboard.analysis {
        Some(analysis) => {
            ui.label(format!("Measurements: {}", analysis.record_count()));
            ui.separator();

            let total = analysis.total_anomalies();
            let response = if total > 0 {
                ui.colored_label(egui::Color32::from_rgb(200, 80, 0), format!("Anomalies: {}", total))
            } else {
                ui.label("Anomalies: 0")
            };

            let summary = anomaly_summary(analysis);
            if !summary.is_empty() {
                let text = summary
                    .iter()
                    .map(|(channel, count)| format!("{}: {}", channel.label(), count))
                    .collect::<Vec<_>>()
                    .join("\n");
                response.on_hover_text(text);
            }
        }
        None => {
            ui.label("waiting for data...");
        }
    }
}

pub fn render_bottom_status_bar(app: &mut DashboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("bottom_status_bar")
        .min_height(25.0)
        .show(ctx, |ui| {
            ui.add_space(3.0);
            ui.horizontal(|ui| {
                // 左侧：最近一次错误
                if let Some(error) = &app.state.dashboard.last_error {
                    ui.colored_label(egui::Color32::from_rgb(180, 0, 0), format!("⚠ {}", error));
                    ui.separator();
                }

                if let Some(reason) = app.state.dashboard.last_reason {
                    ui.label(format!("Last refresh: {}", reason));
                    ui.separator();
                }

                ui.label(format!(
                    "Cycles: {} ok / {} failed",
                    app.state.dashboard.successful_cycles, app.state.dashboard.failed_cycles
                ));

                // 右侧：设置保存状态
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if !app.settings_status.is_empty() {
                        ui.colored_label(egui::Color32::from_rgb(0, 150, 100), &app.settings_status);
                    }
                });
            });
            ui.add_space(3.0);
        });
}
