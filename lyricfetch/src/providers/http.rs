//! Shared HTTP client for providers
//!
//! One `reqwest::Client` per run (connection pooling is shared across all
//! providers and workers; cloning is cheap).

use super::ProviderError;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default timeout for provider requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// User-Agent header sent with every request
const USER_AGENT: &str = concat!("lyricfetch/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create the client with default timeout and user agent
    pub fn new() -> Result<Self, ProviderError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// GET `url` and return the body as text
    ///
    /// # Errors
    /// `ProviderError::Status` for non-success responses,
    /// `ProviderError::Network` for transport failures.
    pub async fn get_text(&self, url: &str) -> Result<String, ProviderError> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    /// GET `url` and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}
