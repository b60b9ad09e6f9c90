//! HTTP client for the map page, its script assets, and geodata endpoints.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScrapeError;

const ACCEPT_TEXT: &str = "text/html,application/json;q=0.9,*/*;q=0.8";
const ACCEPT_JSON: &str = "application/json,text/plain,*/*";

/// HTTP client applying the uniform timeout ceiling and `User-Agent` to every
/// request. There is no retry layer: a failed call is surfaced to the caller,
/// which either skips that asset/candidate or aborts the run, depending on
/// the pipeline stage.
pub struct MapClient {
    client: Client,
}

impl MapClient {
    /// Creates a `MapClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a text body (map HTML or a referenced script asset).
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] on transport failure or timeout, and
    /// [`ScrapeError::HttpStatus`] for non-2xx responses.
    pub async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_TEXT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ScrapeError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }

    /// Fetch a body and decode it as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] on transport failure or timeout,
    /// [`ScrapeError::HttpStatus`] for non-2xx responses, and
    /// [`ScrapeError::Json`] when the body is not valid JSON.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, ScrapeError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_JSON)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ScrapeError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_owned(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ScrapeError::Json {
            url: url.to_owned(),
            source,
        })
    }
}
