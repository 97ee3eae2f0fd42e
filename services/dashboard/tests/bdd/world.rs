//! BDD test world for the dashboard service

use std::sync::Arc;

use cucumber::World;
use dashboard::settings::{Setting, SettingGroup};
use dashboard::{CalibrationProgress, DarkFieldApi, RuntimeEnvironment};

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    // Settings resolution
    pub groups: Vec<SettingGroup>,
    pub resolved: Option<Setting>,

    // Capability selection
    pub environment: Option<RuntimeEnvironment>,
    pub api: Option<Arc<dyn DarkFieldApi>>,
    pub last_progress: Option<CalibrationProgress>,
    pub last_error: Option<String>,
}
