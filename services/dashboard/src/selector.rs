//! Environment-based selection of capability implementations
//!
//! Development runs get the simulated dark-field capability, production runs
//! the one talking to the live backend. The environment is always passed in
//! explicitly; nothing here reads process state.

use std::sync::Arc;

use crate::client::HttpDarkFieldApi;
use crate::config::Config;
use crate::darkfield::DarkFieldApi;
use crate::environment::RuntimeEnvironment;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::mock::MockDarkFieldApi;

/// Builder that hands out dark-field capability instances.
///
/// Every call to [`ServiceSelector::create_dark_field_api`] builds a fresh
/// instance; nothing is cached.
pub struct ServiceSelector {
    config: Config,
    environment: RuntimeEnvironment,
    http: Option<Arc<dyn HttpClient>>,
}

impl ServiceSelector {
    /// Selector for `environment`; the `environment` field of `config` is
    /// not consulted
    pub fn new(config: Config, environment: RuntimeEnvironment) -> Self {
        Self {
            config,
            environment,
            http: None,
        }
    }

    /// Use `http` instead of a reqwest client for the real variant
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn create_dark_field_api(&self) -> Arc<dyn DarkFieldApi> {
        match self.environment {
            RuntimeEnvironment::Development => {
                tracing::info!("Using simulated dark-field calibration");
                Arc::new(MockDarkFieldApi::new(self.config.mock.clone()))
            }
            RuntimeEnvironment::Production => {
                let http: Arc<dyn HttpClient> = match &self.http {
                    Some(http) => Arc::clone(http),
                    None => Arc::new(ReqwestHttpClient::with_timeout(
                        self.config.backend.request_timeout,
                    )),
                };
                tracing::info!(
                    "Using dark-field backend at {}:{}",
                    self.config.backend.host,
                    self.config.backend.port
                );
                Arc::new(HttpDarkFieldApi::new(&self.config.backend, http))
            }
        }
    }
}

/// Build a dark-field capability for `environment`
pub fn create_dark_field_api(
    environment: RuntimeEnvironment,
    config: &Config,
) -> Arc<dyn DarkFieldApi> {
    ServiceSelector::new(config.clone(), environment).create_dark_field_api()
}
