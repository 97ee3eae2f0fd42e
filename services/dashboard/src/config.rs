//! Configuration types for the dashboard service

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::environment::RuntimeEnvironment;
use crate::settings::SettingsTree;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Overrides the process environment classification when set
    #[serde(default)]
    pub environment: Option<RuntimeEnvironment>,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub settings: SettingsTree,
}

impl Config {
    /// Environment from the config file, or the process classification
    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment.unwrap_or_else(RuntimeEnvironment::from_env)
    }
}

/// Connection to the live dark-field backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_backend_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_backend_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/api/v1/darkfield", self.host, self.port)
    }
}

/// Behaviour of the simulated dark-field capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Frames the simulation captures per progress query
    #[serde(default = "default_frames_per_poll")]
    pub frames_per_poll: u32,
    /// Sensor temperature reported when the request sets no target
    #[serde(default = "default_sensor_temperature")]
    pub sensor_temperature: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            frames_per_poll: default_frames_per_poll(),
            sensor_temperature: default_sensor_temperature(),
        }
    }
}

/// How the CLI drives a calibration sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_backend_port() -> u16 {
    11120
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_frames_per_poll() -> u32 {
    1
}

fn default_sensor_temperature() -> f64 {
    -10.0
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(1)
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    tracing::debug!(
        "Loaded configuration with {} setting group(s)",
        config.settings.groups().len()
    );
    Ok(config)
}
