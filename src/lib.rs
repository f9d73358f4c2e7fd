//! Telemetry dashboard: fetches accelerometer/gyroscope measurements,
//! flags statistical anomalies and renders them with egui.

pub mod analysis;
pub mod app;
pub mod config;
pub mod logger;
pub mod plotter;
pub mod source;
pub mod types;
