use eframe::egui;
use crate::app::app_core::DashboardApp;
use crate::plotter::TelemetryPlot;

pub fn render_main_panel(app: &mut DashboardApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        // 控制面板
        ui.horizontal(|ui| {
            ui.label("Hotkey:");
            ui.colored_label(egui::Color32::from_rgb(0, 150, 0), "R");
            ui.label("Refresh data");

            ui.separator();

            // 显示选项控制
            ui.label("Display:");
            let plot = &mut app.config.get_config_mut().plot;
            ui.checkbox(&mut plot.show_gyroscope, "Show Gyroscope");
            ui.checkbox(&mut plot.show_vibration, "Show Vibration");

            ui.separator();

            if ui.button("💾 Save Settings").clicked() {
                app.save_settings();
            }
        });
        ui.add_space(10.0);

        match &app.state.dashboard.analysis {
            Some(analysis) if analysis.record_count() > 0 => {
                TelemetryPlot::new(analysis).ui(ui, &app.config.get_config().plot);
            }
            Some(_) => {
                ui.label("The data source returned no measurements.");
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    if app.state.dashboard.refresh_in_flight {
                        ui.spinner();
                        ui.label("Loading telemetry...");
                    } else {
                        ui.label("No telemetry loaded yet. Press R to refresh.");
                    }
                });
            }
        }
    });
}
