use egui::Color32;
use egui_plot::{Legend, Line, LineStyle, MarkerShape, Plot, PlotPoints, Points};

use crate::config::PlotConfig;
use crate::types::{AnalysisResult, Channel, ChartSeries};

/// 格式化数字为固定宽度的 y 轴标签
fn format_fixed_width_y_label(value: f64) -> String {
    let abs_value = value.abs();
    if abs_value >= 1000.0 {
        format!("{:-6.1e}", value)
    } else if abs_value >= 100.0 {
        format!("{:-6.0}", value)
    } else if abs_value >= 10.0 {
        format!("{:-6.1}", value)
    } else {
        // 归一化后的数据大多落在这里
        format!("{:-6.3}", value)
    }
}

pub fn color_from_rgb(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// 折线数据点，横轴为记录序号
pub fn series_points(series: &ChartSeries) -> Vec<[f64; 2]> {
    series
        .values
        .iter()
        .enumerate()
        .map(|(i, &y)| [i as f64, y])
        .collect()
}

/// 需要强调显示的异常点
pub fn anomaly_points(series: &ChartSeries) -> Vec<[f64; 2]> {
    series
        .values
        .iter()
        .zip(series.point_emphasis.iter())
        .enumerate()
        .filter(|(_, (_, &emphasized))| emphasized)
        .map(|(i, (&y, _))| [i as f64, y])
        .collect()
}

/// Tick text for x-axis position `value`; empty between records.
pub fn label_for_tick(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if rounded < 0.0 || (value - rounded).abs() > 1e-6 {
        return String::new();
    }
    labels
        .get(rounded as usize)
        .map(|label| label.trim_start_matches("Measurement ").to_string())
        .unwrap_or_default()
}

struct StyledSeries<'a> {
    series: &'a ChartSeries,
    color: Color32,
    dashed: bool,
}

/// Renders one analysis result as the dashboard's chart stack.
pub struct TelemetryPlot<'a> {
    analysis: &'a AnalysisResult,
}

impl<'a> TelemetryPlot<'a> {
    pub fn new(analysis: &'a AnalysisResult) -> Self {
        Self { analysis }
    }

    pub fn ui(&self, ui: &mut egui::Ui, config: &PlotConfig) {
        let axis_colors = [
            color_from_rgb(config.colors.x_axis),
            color_from_rgb(config.colors.y_axis),
            color_from_rgb(config.colors.z_axis),
        ];

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical(|ui| {
                ui.heading("Accelerometer");
                let acc: Vec<StyledSeries> = self
                    .analysis
                    .acceleration
                    .iter()
                    .zip(axis_colors)
                    .map(|(series, color)| StyledSeries { series, color, dashed: false })
                    .collect();
                self.plot_group(ui, "accelerometer_plot", &acc, config);

                ui.separator();

                // 陀螺仪数据显示（可选）
                if config.show_gyroscope {
                    ui.heading("Gyroscope");
                    let gyro: Vec<StyledSeries> = self
                        .analysis
                        .angular_velocity
                        .iter()
                        .zip(axis_colors)
                        .map(|(series, color)| StyledSeries { series, color, dashed: true })
                        .collect();
                    self.plot_group(ui, "gyroscope_plot", &gyro, config);

                    ui.separator();
                }

                if config.show_vibration {
                    ui.heading("Vibration");
                    let vibration = [StyledSeries {
                        series: &self.analysis.vibration,
                        color: color_from_rgb(config.colors.vibration),
                        dashed: false,
                    }];
                    self.plot_group(ui, "vibration_plot", &vibration, config);

                    ui.separator();
                }

                ui.heading("Channel Statistics");
                self.statistics_grid(ui, config);
            });
        });
    }

    fn plot_group(&self, ui: &mut egui::Ui, id: &str, group: &[StyledSeries], config: &PlotConfig) {
        let tick_labels = self.analysis.labels.clone();
        let hover_labels = self.analysis.labels.clone();
        let anomaly_color = color_from_rgb(config.colors.anomaly);

        Plot::new(id)
            .height(config.plot_height)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _| label_for_tick(&tick_labels, mark.value))
            .y_axis_formatter(|mark, _| format_fixed_width_y_label(mark.value))
            .label_formatter(move |name, point| {
                let label = label_for_tick(&hover_labels, point.x);
                if name.is_empty() {
                    format!("{}\n{:.4}", label, point.y)
                } else {
                    format!("{}\nMeasurement {}\n{:.4}", name, label, point.y)
                }
            })
            .show(ui, |plot_ui| {
                for styled in group {
                    let mut line = Line::new(styled.series.label.clone(), PlotPoints::from(series_points(styled.series)))
                        .color(styled.color)
                        .width(config.line_width);
                    if styled.dashed {
                        line = line.style(LineStyle::dashed_loose());
                    }
                    plot_ui.line(line);

                    let anomalies = anomaly_points(styled.series);
                    if !anomalies.is_empty() {
                        plot_ui.points(
                            Points::new(format!("{} anomalies", styled.series.label), PlotPoints::from(anomalies))
                                .shape(MarkerShape::Circle)
                                .filled(true)
                                .radius(config.anomaly_marker_radius)
                                .color(anomaly_color),
                        );
                    }
                }
            });
    }

    fn statistics_grid(&self, ui: &mut egui::Ui, config: &PlotConfig) {
        egui::Grid::new("channel_statistics")
            .striped(true)
            .num_columns(4)
            .show(ui, |ui| {
                ui.strong("Channel");
                ui.strong("Mean");
                ui.strong("Std Dev");
                ui.strong("Anomalies");
                ui.end_row();

                for (channel, series) in self.analysis.channels() {
                    if channel.is_gyroscope() && !config.show_gyroscope {
                        continue;
                    }
                    let stats = series.statistics.unwrap_or_default();
                    ui.label(channel.label());
                    ui.label(format!("{:.5}", stats.mean));
                    ui.label(format!("{:.5}", stats.std_dev));
                    let count = series.anomaly_count();
                    if count > 0 {
                        ui.colored_label(color_from_rgb(config.colors.anomaly), count.to_string());
                    } else {
                        ui.label("0");
                    }
                    ui.end_row();
                }
            });
    }
}

/// 仅用于状态栏：按通道统计异常个数
pub fn anomaly_summary(analysis: &AnalysisResult) -> Vec<(Channel, usize)> {
    analysis
        .channels()
        .map(|(channel, series)| (channel, series.anomaly_count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}
