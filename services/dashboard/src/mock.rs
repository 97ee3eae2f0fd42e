//! Simulated dark-field capability
//!
//! Performs no I/O. Every progress query advances the sequence by a fixed
//! number of frames, so the same calls always produce the same results.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::MockConfig;
use crate::darkfield::{
    ApiVariant, CalibrationProgress, CalibrationState, DarkFieldApi, DarkFieldRequest,
    DarkFieldStatus, DarkFrame,
};
use crate::error::{DashboardError, Result};

/// Simulated sequence state
#[derive(Debug)]
struct MockState {
    request: Option<DarkFieldRequest>,
    exposures: Vec<f64>,
    progress: CalibrationProgress,
    library: Vec<DarkFrame>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            request: None,
            exposures: Vec::new(),
            progress: CalibrationProgress::idle(),
            library: Vec::new(),
        }
    }
}

impl MockState {
    fn advance(&mut self, frames: u32, sensor_temperature: f64) {
        let Some(request) = self.request.as_ref() else {
            return;
        };

        let progress = &mut self.progress;
        progress.frames_captured = progress
            .frames_captured
            .saturating_add(frames)
            .min(progress.frames_total);

        if progress.frames_captured < progress.frames_total {
            let index = progress.frames_captured / request.frames_per_exposure.max(1);
            progress.current_exposure_secs = self.exposures.get(index as usize).copied();
            return;
        }

        progress.state = CalibrationState::Completed;
        progress.current_exposure_secs = None;
        progress.message = Some(format!(
            "Captured {} dark frames",
            progress.frames_captured
        ));

        let temperature = request.target_temperature.unwrap_or(sensor_temperature);
        for exposure in &self.exposures {
            self.library.push(DarkFrame {
                exposure_secs: *exposure,
                frames: request.frames_per_exposure,
                binning: request.binning,
                temperature: Some(temperature),
            });
        }
        debug!(
            "Mock calibration completed, library holds {} dark(s)",
            self.library.len()
        );
    }
}

/// Dark-field capability backed by an in-memory simulation
#[derive(Debug, Clone)]
pub struct MockDarkFieldApi {
    config: MockConfig,
    state: Arc<Mutex<MockState>>,
}

impl Default for MockDarkFieldApi {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

impl MockDarkFieldApi {
    pub fn new(config: MockConfig) -> Self {
        debug!(
            "Created MockDarkFieldApi ({} frame(s) per poll)",
            config.frames_per_poll
        );
        Self {
            config,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }
}

#[async_trait]
impl DarkFieldApi for MockDarkFieldApi {
    fn variant(&self) -> ApiVariant {
        ApiVariant::Mock
    }

    async fn start(&self, request: &DarkFieldRequest) -> Result<CalibrationProgress> {
        request.validate()?;

        let mut state = self.state.lock().await;
        if state.progress.state == CalibrationState::Running {
            return Err(DashboardError::AlreadyRunning);
        }

        state.exposures = request.exposures();
        state.request = Some(request.clone());
        state.progress = CalibrationProgress {
            state: CalibrationState::Running,
            frames_captured: 0,
            frames_total: request.total_frames(),
            current_exposure_secs: state.exposures.first().copied(),
            message: None,
        };
        debug!(
            "Mock calibration started: {} exposure(s), {} frame(s)",
            state.exposures.len(),
            state.progress.frames_total
        );
        Ok(state.progress.clone())
    }

    async fn stop(&self) -> Result<CalibrationProgress> {
        let mut state = self.state.lock().await;
        if state.progress.state != CalibrationState::Running {
            return Err(DashboardError::NotRunning);
        }

        let progress = &mut state.progress;
        progress.state = CalibrationState::Stopped;
        progress.current_exposure_secs = None;
        progress.message = Some(format!(
            "Stopped after {} of {} frames",
            progress.frames_captured, progress.frames_total
        ));
        debug!("Mock calibration stopped");
        Ok(progress.clone())
    }

    async fn progress(&self) -> Result<CalibrationProgress> {
        let mut state = self.state.lock().await;
        if state.progress.state == CalibrationState::Running {
            state.advance(
                self.config.frames_per_poll.max(1),
                self.config.sensor_temperature,
            );
        }
        Ok(state.progress.clone())
    }

    async fn status(&self) -> Result<DarkFieldStatus> {
        let state = self.state.lock().await;
        let sensor_temperature = state
            .request
            .as_ref()
            .and_then(|r| r.target_temperature)
            .unwrap_or(self.config.sensor_temperature);
        Ok(DarkFieldStatus {
            state: state.progress.state,
            sensor_temperature: Some(sensor_temperature),
            library: state.library.clone(),
        })
    }
}
