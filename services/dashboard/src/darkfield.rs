//! Dark-field calibration capability
//!
//! A dark-field sequence captures `frames_per_exposure` dark frames at each
//! exposure of a ladder running from `min_exposure_secs` to
//! `max_exposure_secs`. Finished exposures end up in the dark library.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Highest supported binning factor
pub const MAX_BINNING: u8 = 4;

/// Longest supported exposure ladder
pub const MAX_EXPOSURE_STEPS: u32 = 100;

/// Parameters of a dark-field calibration sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkFieldRequest {
    pub min_exposure_secs: f64,
    pub max_exposure_secs: f64,
    #[serde(default = "default_exposure_steps")]
    pub exposure_steps: u32,
    #[serde(default = "default_frames_per_exposure")]
    pub frames_per_exposure: u32,
    #[serde(default = "default_binning")]
    pub binning: u8,
    #[serde(default)]
    pub target_temperature: Option<f64>,
}

fn default_exposure_steps() -> u32 {
    5
}

fn default_frames_per_exposure() -> u32 {
    10
}

fn default_binning() -> u8 {
    1
}

impl Default for DarkFieldRequest {
    fn default() -> Self {
        Self {
            min_exposure_secs: 1.0,
            max_exposure_secs: 60.0,
            exposure_steps: default_exposure_steps(),
            frames_per_exposure: default_frames_per_exposure(),
            binning: default_binning(),
            target_temperature: None,
        }
    }
}

impl DarkFieldRequest {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(DashboardError::InvalidRequest(msg));

        if !(self.min_exposure_secs > 0.0 && self.min_exposure_secs.is_finite()) {
            return invalid(format!(
                "minimum exposure must be positive, got {}",
                self.min_exposure_secs
            ));
        }
        if !self.max_exposure_secs.is_finite() || self.max_exposure_secs < self.min_exposure_secs
        {
            return invalid(format!(
                "maximum exposure {} is below minimum {}",
                self.max_exposure_secs, self.min_exposure_secs
            ));
        }
        if self.exposure_steps == 0 {
            return invalid("at least one exposure step is required".to_string());
        }
        if self.exposure_steps > MAX_EXPOSURE_STEPS {
            return invalid(format!(
                "exposure steps must be at most {}, got {}",
                MAX_EXPOSURE_STEPS, self.exposure_steps
            ));
        }
        if self.frames_per_exposure == 0 {
            return invalid("at least one frame per exposure is required".to_string());
        }
        if self
            .exposure_steps
            .checked_mul(self.frames_per_exposure)
            .is_none()
        {
            return invalid(format!(
                "{} steps of {} frames exceeds the frame counter",
                self.exposure_steps, self.frames_per_exposure
            ));
        }
        if self.binning == 0 || self.binning > MAX_BINNING {
            return invalid(format!(
                "binning must be 1..={}, got {}",
                MAX_BINNING, self.binning
            ));
        }
        Ok(())
    }

    /// Exposure ladder, evenly spaced from min to max
    pub fn exposures(&self) -> Vec<f64> {
        match self.exposure_steps {
            0 => Vec::new(),
            1 => vec![self.min_exposure_secs],
            steps => {
                let span = self.max_exposure_secs - self.min_exposure_secs;
                let last = (steps - 1) as f64;
                (0..steps)
                    .map(|i| self.min_exposure_secs + span * i as f64 / last)
                    .collect()
            }
        }
    }

    /// Frames in the whole sequence; saturates for requests that fail
    /// [`validate`](Self::validate)
    pub fn total_frames(&self) -> u32 {
        self.exposure_steps.saturating_mul(self.frames_per_exposure)
    }
}

/// Lifecycle of a calibration sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationState {
    Idle,
    Running,
    Completed,
    Stopped,
    Failed,
}

impl fmt::Display for CalibrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationState::Idle => write!(f, "Idle"),
            CalibrationState::Running => write!(f, "Running"),
            CalibrationState::Completed => write!(f, "Completed"),
            CalibrationState::Stopped => write!(f, "Stopped"),
            CalibrationState::Failed => write!(f, "Failed"),
        }
    }
}

/// Progress report of the current (or last) sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProgress {
    pub state: CalibrationState,
    pub frames_captured: u32,
    pub frames_total: u32,
    #[serde(default)]
    pub current_exposure_secs: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CalibrationProgress {
    pub fn idle() -> Self {
        Self {
            state: CalibrationState::Idle,
            frames_captured: 0,
            frames_total: 0,
            current_exposure_secs: None,
            message: None,
        }
    }

    /// Completion in percent; an empty sequence counts as 0
    pub fn percent(&self) -> f64 {
        if self.frames_total == 0 {
            0.0
        } else {
            100.0 * f64::from(self.frames_captured) / f64::from(self.frames_total)
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            CalibrationState::Completed | CalibrationState::Stopped | CalibrationState::Failed
        )
    }
}

/// A finished master dark in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkFrame {
    pub exposure_secs: f64,
    pub frames: u32,
    pub binning: u8,
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Overall capability status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkFieldStatus {
    pub state: CalibrationState,
    #[serde(default)]
    pub sensor_temperature: Option<f64>,
    #[serde(default)]
    pub library: Vec<DarkFrame>,
}

/// Which implementation backs a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiVariant {
    Real,
    Mock,
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVariant::Real => write!(f, "real"),
            ApiVariant::Mock => write!(f, "mock"),
        }
    }
}

/// Dark-field calibration control
#[async_trait]
pub trait DarkFieldApi: Send + Sync + fmt::Debug {
    /// Which implementation this is
    fn variant(&self) -> ApiVariant;

    /// Start a calibration sequence
    async fn start(&self, request: &DarkFieldRequest) -> Result<CalibrationProgress>;

    /// Stop the running sequence
    async fn stop(&self) -> Result<CalibrationProgress>;

    /// Report progress of the current or last sequence
    async fn progress(&self) -> Result<CalibrationProgress>;

    /// Fetch overall status including the dark library
    async fn status(&self) -> Result<DarkFieldStatus>;
}
