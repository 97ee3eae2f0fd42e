//! Dashboard - settings resolution and capability selection
//!
//! Resolves setting paths against the configured settings tree and hands
//! out the dark-field calibration capability matching the runtime
//! environment: simulated during development, backed by the calibration
//! backend in production.

pub mod client;
pub mod config;
pub mod darkfield;
pub mod environment;
pub mod error;
pub mod io;
pub mod mock;
pub mod selector;
pub mod settings;
pub mod state;
pub mod store;

pub use client::HttpDarkFieldApi;
pub use config::{load_config, Config};
pub use darkfield::{
    ApiVariant, CalibrationProgress, CalibrationState, DarkFieldApi, DarkFieldRequest,
    DarkFieldStatus,
};
pub use environment::RuntimeEnvironment;
pub use error::{DashboardError, Result};
pub use mock::MockDarkFieldApi;
pub use selector::{create_dark_field_api, ServiceSelector};
pub use settings::{resolve, Setting, SettingGroup, SettingsTree};
pub use state::UiState;
pub use store::Store;

use std::time::Duration;

/// Start a calibration sequence and poll it until it finishes.
///
/// Returns the final progress report. Errors from any call end the run.
pub async fn run_calibration(
    api: &dyn DarkFieldApi,
    request: &DarkFieldRequest,
    poll_interval: Duration,
) -> Result<CalibrationProgress> {
    let mut progress = api.start(request).await?;
    tracing::info!(
        "Dark-field calibration started ({} variant, {} frames)",
        api.variant(),
        progress.frames_total
    );

    while !progress.is_finished() {
        tokio::time::sleep(poll_interval).await;
        progress = api.progress().await?;
        tracing::debug!(
            "Calibration {}: {}/{} frames ({:.0}%)",
            progress.state,
            progress.frames_captured,
            progress.frames_total,
            progress.percent()
        );
    }

    tracing::info!("Dark-field calibration finished: {}", progress.state);
    Ok(progress)
}
