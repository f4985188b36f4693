use crate::application::print_sequencer::PrintTiming;
use crate::domain::projection::ChartOptions;
use crate::domain::time_window::TimeWindow;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct TrackerConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub print: PrintSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    #[serde(default = "default_window")]
    pub default_window: String,
    #[serde(default = "default_x_axis_title")]
    pub x_axis_title: String,
    #[serde(default = "default_y_axis_title")]
    pub y_axis_title: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PrintSettings {
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_pre_print_ms")]
    pub pre_print_ms: u64,
    #[serde(default = "default_restore_ms")]
    pub restore_ms: u64,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Program run with the exported frame path as its last argument
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_base_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_window() -> String {
    "7d".to_string()
}

fn default_x_axis_title() -> String {
    "Time".to_string()
}

fn default_y_axis_title() -> String {
    "Temperature Value".to_string()
}

fn default_settle_ms() -> u64 {
    400
}

fn default_pre_print_ms() -> u64 {
    100
}

fn default_restore_ms() -> u64 {
    150
}

fn default_output_path() -> String {
    "chart-print.json".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            default_window: default_window(),
            x_axis_title: default_x_axis_title(),
            y_axis_title: default_y_axis_title(),
        }
    }
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            pre_print_ms: default_pre_print_ms(),
            restore_ms: default_restore_ms(),
            output_path: default_output_path(),
            command: None,
            args: Vec::new(),
        }
    }
}

impl ChartSettings {
    pub fn window(&self) -> anyhow::Result<TimeWindow> {
        Ok(self.default_window.parse()?)
    }

    pub fn options(&self) -> ChartOptions {
        ChartOptions::new(self.x_axis_title.clone(), self.y_axis_title.clone())
    }
}

impl PrintSettings {
    pub fn timing(&self) -> PrintTiming {
        PrintTiming {
            settle: Duration::from_millis(self.settle_ms),
            pre_print: Duration::from_millis(self.pre_print_ms),
            restore: Duration::from_millis(self.restore_ms),
        }
    }
}

/// Reads `config/tracker.*` when present, overridden by `TRACKER__*` variables
pub fn load_tracker_config() -> anyhow::Result<TrackerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/tracker").required(false))
        .add_source(config::Environment::with_prefix("TRACKER").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
