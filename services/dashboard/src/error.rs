//! Error types for the dashboard service

/// Errors that can occur in the dashboard service
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Backend returned status {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid calibration request: {0}")]
    InvalidRequest(String),

    #[error("A calibration sequence is already running")]
    AlreadyRunning,

    #[error("No calibration sequence is running")]
    NotRunning,
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
