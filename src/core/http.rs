//! HTTP seam between the page flows and the backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::ServerSettings;

/// A completed HTTP exchange. The body is kept raw; each flow decides how
/// strictly to parse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON. An empty body is a parse error like any other.
    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_str(&self.body).map_err(AppError::from)
    }
}

/// Issues JSON POSTs against the backend.
///
/// `Err` means the exchange did not complete (connection refused, timeout,
/// unreadable body). Any status code, including 4xx/5xx, is an `Ok`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
        headers: Vec<(String, String)>,
    ) -> AppResult<HttpResponse>;
}

pub struct ReqwestHttpClient {
    http: Client,
    base_url: String,
}

impl ReqwestHttpClient {
    pub fn new(settings: &ServerSettings) -> AppResult<Self> {
        Self::with_timeout(&settings.base_url, &settings.user_agent, settings.request_timeout())
    }

    pub fn with_timeout(base_url: &str, user_agent: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
        headers: Vec<(String, String)>,
    ) -> AppResult<HttpResponse> {
        let url = self.url_for(path);
        log::debug!("[Http] POST {}", url);

        let mut request = self.http.post(&url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(format!("Failed to read response body: {}", e)))?;

        log::debug!("[Http] {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
