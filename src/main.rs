use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use dotenv::dotenv;
use eframe::egui;
use log::{error, info};

use telemetry_dashboard::app::DashboardApp;
use telemetry_dashboard::config::{ConfigManager, DEFAULT_CONFIG_FILE};
use telemetry_dashboard::logger;
use telemetry_dashboard::source::{run_refresh_worker, DataFetcher};

fn main() {
    dotenv().ok(); // 加载 .env 文件
    logger::init_logger();
    info!("Application starting");

    let config = match ConfigManager::load_with_env(DEFAULT_CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let app_config = config.get_config().clone();

    let fetcher = match DataFetcher::new(app_config.source.data_source(), app_config.source.timeout()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to create data fetcher: {}", e);
            std::process::exit(1);
        }
    };

    let (request_sender, request_receiver) = bounded(app_config.channels.request_channel_capacity);
    let (result_sender, result_receiver) = bounded(app_config.channels.result_channel_capacity);
    let shutdown_signal = Arc::new(AtomicBool::new(false));

    let worker_shutdown = Arc::clone(&shutdown_signal);
    let worker_handle = thread::spawn(move || {
        if let Err(e) = run_refresh_worker(fetcher, request_receiver, result_sender, worker_shutdown) {
            error!("Refresh worker failed: {}", e);
        }
    });

    let options = eframe::NativeOptions {
        vsync: app_config.window.vsync,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        renderer: eframe::Renderer::Glow,
        viewport: egui::ViewportBuilder::default()
            .with_title(app_config.window.title.clone())
            .with_inner_size([app_config.window.width, app_config.window.height])
            .with_resizable(app_config.window.resizable),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        &app_config.window.title,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(request_sender, result_receiver, config)))),
    ) {
        error!("GUI failed: {}", e);
        shutdown_signal.store(true, Ordering::Relaxed);
        std::process::exit(1);
    }

    // GUI 关闭后通知刷新线程退出
    info!("GUI closed, signaling refresh worker to shutdown");
    shutdown_signal.store(true, Ordering::Relaxed);

    match worker_handle.join() {
        Ok(()) => info!("Refresh worker shut down gracefully"),
        Err(e) => error!("Refresh worker panicked: {:?}", e),
    }
}
