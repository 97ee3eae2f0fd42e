//! Dark-field capability backed by the live calibration backend

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::BackendConfig;
use crate::darkfield::{
    ApiVariant, CalibrationProgress, DarkFieldApi, DarkFieldRequest, DarkFieldStatus,
};
use crate::error::{DashboardError, Result};
use crate::io::{HttpClient, HttpResponse};

/// HTTP status the backend uses when a sequence is already running
const STATUS_CONFLICT: u16 = 409;

/// Client for the dark-field calibration backend
pub struct HttpDarkFieldApi {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for HttpDarkFieldApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDarkFieldApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpDarkFieldApi {
    pub fn new(config: &BackendConfig, http: Arc<dyn HttpClient>) -> Self {
        let base_url = config.base_url();
        tracing::debug!("Created HttpDarkFieldApi at {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn parse<T: DeserializeOwned>(&self, endpoint: &str, response: HttpResponse) -> Result<T> {
        if response.status == STATUS_CONFLICT {
            tracing::debug!("{} rejected: sequence already running", endpoint);
            return Err(DashboardError::AlreadyRunning);
        }
        if !response.is_success() {
            tracing::debug!(
                "Non-success response from {}: status={}",
                endpoint,
                response.status
            );
            return Err(DashboardError::Backend {
                status: response.status,
                body: response.body,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.http.get(&url).await?;
        self.parse(endpoint, response)
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self.http.post_json(&url, body).await?;
        self.parse(endpoint, response)
    }
}

#[async_trait]
impl DarkFieldApi for HttpDarkFieldApi {
    fn variant(&self) -> ApiVariant {
        ApiVariant::Real
    }

    async fn start(&self, request: &DarkFieldRequest) -> Result<CalibrationProgress> {
        request.validate()?;
        let body = serde_json::to_string(request)?;
        tracing::debug!("Starting dark-field calibration: {}", body);
        self.post("start", &body).await
    }

    async fn stop(&self) -> Result<CalibrationProgress> {
        tracing::debug!("Stopping dark-field calibration");
        self.post("stop", "{}").await
    }

    async fn progress(&self) -> Result<CalibrationProgress> {
        self.get("progress").await
    }

    async fn status(&self) -> Result<DarkFieldStatus> {
        self.get("status").await
    }
}
