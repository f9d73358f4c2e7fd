use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;

use crate::source::DataSource;

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// 主配置结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub source: SourceConfig,
    pub plot: PlotConfig,
    pub channels: ChannelConfig,
}

/// 窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
}

/// 数据源配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// `http(s)://` URL or a local JSON file path.
    pub location: String,
    pub timeout_seconds: u64,
    /// 0 表示只在启动和手动刷新时取数
    pub auto_refresh_seconds: u64,
}

/// 绘图配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub plot_height: f32,
    pub show_gyroscope: bool,
    pub show_vibration: bool,
    pub anomaly_marker_radius: f32,
    pub line_width: f32,
    pub colors: PlotColors,
}

/// 绘图颜色配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotColors {
    pub x_axis: [u8; 3],
    pub y_axis: [u8; 3],
    pub z_axis: [u8; 3],
    pub vibration: [u8; 3],
    pub anomaly: [u8; 3],
}

/// 通道配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub request_channel_capacity: usize,
    pub result_channel_capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            title: "Telemetry Dashboard".to_string(),
            resizable: true,
            vsync: true,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: "assets/data.json".to_string(),
            timeout_seconds: 10,
            auto_refresh_seconds: 0,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            plot_height: 220.0,
            show_gyroscope: true,
            show_vibration: true,
            anomaly_marker_radius: 5.0,
            line_width: 2.0,
            colors: PlotColors::default(),
        }
    }
}

impl Default for PlotColors {
    fn default() -> Self {
        Self {
            x_axis: [0x20, 0xa8, 0xd8],    // info 蓝
            y_axis: [0x4d, 0xbd, 0x74],    // success 绿
            z_axis: [0xf8, 0x6c, 0x6b],    // danger 红
            vibration: [0x6f, 0x42, 0xc1], // 紫色
            anomaly: [0xff, 0xa5, 0x00],   // 橙色
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            request_channel_capacity: 4,
            result_channel_capacity: 4,
        }
    }
}

impl SourceConfig {
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.location)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn auto_refresh_interval(&self) -> Option<Duration> {
        (self.auto_refresh_seconds > 0).then(|| Duration::from_secs(self.auto_refresh_seconds))
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content)
            .map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// Applies `DASHBOARD_*` overrides from an environment lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(location) = lookup("DASHBOARD_SOURCE") {
            self.source.location = location;
        }
        if let Some(value) = lookup("DASHBOARD_TIMEOUT_SECS") {
            self.source.timeout_seconds = parse_env_number("DASHBOARD_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("DASHBOARD_REFRESH_SECS") {
            self.source.auto_refresh_seconds = parse_env_number("DASHBOARD_REFRESH_SECS", &value)?;
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        if self.source.location.trim().is_empty() {
            return Err(ConfigError::ValidationError("Data source location must not be empty".to_string()));
        }

        if self.source.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError("Request timeout must be positive".to_string()));
        }

        if self.plot.plot_height <= 0.0 || self.plot.anomaly_marker_radius <= 0.0 {
            return Err(ConfigError::ValidationError("Plot height and marker radius must be positive".to_string()));
        }

        if self.channels.request_channel_capacity == 0 || self.channels.result_channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Channel capacities must be positive".to_string()));
        }

        Ok(())
    }
}

fn parse_env_number(name: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::EnvError {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invalid value for {name}: {value:?}")]
    EnvError { name: String, value: String },
}

/// 配置管理器
///
/// `config` 是生效的配置（含环境变量覆盖），`file_config` 是文件中的配置，
/// 保存时只把界面可修改的部分写回文件配置。
#[derive(Debug, Default)]
pub struct ConfigManager {
    config: AppConfig,
    file_config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            file_config: config.clone(),
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// 启动时使用：文件存在则加载，否则用默认值；随后应用环境变量覆盖
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_overrides(path, |name| env::var(name).ok())
    }

    pub fn load_with_overrides<P, F>(path: P, lookup: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let mut manager = if path.as_ref().exists() {
            info!("Loading configuration from {}", path.as_ref().display());
            Self::load_from_file(&path)?
        } else {
            info!("No {} found, using default configuration", path.as_ref().display());
            Self {
                config_path: Some(path.as_ref().to_path_buf()),
                ..Self::default()
            }
        };

        manager.config.apply_overrides(lookup)?;
        manager.config.validate()?;
        Ok(manager)
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取可变配置
    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// 保存配置；环境变量覆盖的数据源设置不会写入文件
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = &self.config_path {
            self.file_config.plot = self.config.plot.clone();
            self.file_config.save_to_file(path)?;
        }
        Ok(())
    }
}
