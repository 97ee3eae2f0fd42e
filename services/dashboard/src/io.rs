//! HTTP client abstraction for testability

use std::time::Duration;

use async_trait::async_trait;

use crate::DashboardError;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request to the given URL
    async fn get(&self, url: &str) -> crate::Result<HttpResponse>;

    /// Send a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &str) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Client with a per-request timeout.
    ///
    /// Falls back to reqwest defaults if the client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Self {
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => Self { client },
            Err(e) => {
                tracing::warn!(
                    "Failed to build HTTP client with {:?} timeout: {}. Using defaults.",
                    timeout,
                    e
                );
                Self::default()
            }
        }
    }

    async fn finish(
        method: &str,
        url: &str,
        sent: reqwest::Result<reqwest::Response>,
    ) -> crate::Result<HttpResponse> {
        let response = sent
            .map_err(|e| DashboardError::Http(format!("{} {} failed: {}", method, url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        let sent = self.client.get(url).send().await;
        Self::finish("GET", url, sent).await
    }

    async fn post_json(&self, url: &str, body: &str) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", url);
        let sent = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await;
        Self::finish("POST", url, sent).await
    }
}
