//! HTTP client for the Instagram Statistics API on `RapidAPI`.
//!
//! Wraps `reqwest` with the `X-RapidAPI-*` credential headers, the upstream
//! timeout, optional retries, and status handling that keeps the upstream
//! error body so the proxy can relay it.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::RapidApiError;
use crate::retry::retry_with_backoff;
use crate::types::CommunityEnvelope;

const INSTAGRAM_PROFILE_BASE: &str = "https://www.instagram.com";

/// Client for the `/community` endpoint.
///
/// Use [`RapidApiClient::new`] for production or
/// [`RapidApiClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct RapidApiClient {
    client: Client,
    api_key: String,
    host: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for RapidApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapidApiClient")
            .field("host", &self.host)
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl RapidApiClient {
    /// Creates a client for `https://{host}/`.
    ///
    /// # Errors
    ///
    /// Returns [`RapidApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RapidApiError::InvalidBaseUrl`] if `host`
    /// does not form a valid URL.
    pub fn new(api_key: &str, host: &str, timeout: Duration) -> Result<Self, RapidApiError> {
        Self::with_base_url(api_key, host, timeout, &format!("https://{host}"))
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// `host` is still sent as the `X-RapidAPI-Host` header.
    ///
    /// # Errors
    ///
    /// Returns [`RapidApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RapidApiError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        host: &str,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self, RapidApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("instalytics/0.1 (profile-proxy)")
            .build()?;

        // Exactly one trailing slash; `community_url` pops the empty segment
        // before appending.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| RapidApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            host: host.to_owned(),
            base_url,
            max_retries: 0,
            backoff_base_ms: 1_000,
        })
    }

    /// Enables retries on transient failures (timeouts, 429, 503).
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches community statistics for `username` and returns the upstream
    /// JSON body untouched.
    ///
    /// # Errors
    ///
    /// - [`RapidApiError::Status`] on a non-2xx upstream response.
    /// - [`RapidApiError::Http`] on network failure or timeout.
    /// - [`RapidApiError::Deserialize`] if the body is not JSON.
    pub async fn fetch_community_raw(
        &self,
        username: &str,
    ) -> Result<serde_json::Value, RapidApiError> {
        let url = self.community_url(username);
        let url = &url;
        retry_with_backoff(self.max_retries, self.backoff_base_ms, move || {
            self.request_json(url)
        })
        .await
    }

    /// Fetches and decodes community statistics for `username`.
    ///
    /// # Errors
    ///
    /// Same as [`RapidApiClient::fetch_community_raw`], plus
    /// [`RapidApiError::Deserialize`] when the body does not match
    /// [`CommunityEnvelope`].
    pub async fn fetch_community(&self, username: &str) -> Result<CommunityEnvelope, RapidApiError> {
        let body = self.fetch_community_raw(username).await?;
        serde_json::from_value(body).map_err(|e| RapidApiError::Deserialize {
            context: format!("community(username={username})"),
            source: e,
        })
    }

    /// `{base}/community?url=https://www.instagram.com/{username}/`
    fn community_url(&self, username: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("community");
        }
        url.query_pairs_mut().append_pair(
            "url",
            &format!("{INSTAGRAM_PROFILE_BASE}/{username}/"),
        );
        url
    }

    /// Sends the GET with credential headers. Non-2xx statuses keep their
    /// body in [`RapidApiError::Status`].
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, RapidApiError> {
        let response = self
            .client
            .get(url.clone())
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
            tracing::warn!(status = status.as_u16(), "upstream returned error status");
            return Err(RapidApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&text).map_err(|e| RapidApiError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> RapidApiClient {
        RapidApiClient::with_base_url(
            "test-key",
            "instagram-statistics-api.p.rapidapi.com",
            Duration::from_secs(15),
            base_url,
        )
        .expect("client construction should not fail")
    }

    #[test]
    fn community_url_encodes_profile_url() {
        let client = test_client("https://api.example.com");
        let url = client.community_url("cristiano");
        assert_eq!(
            url.as_str(),
            "https://api.example.com/community?url=https%3A%2F%2Fwww.instagram.com%2Fcristiano%2F"
        );
    }

    #[test]
    fn community_url_keeps_base_path() {
        let client = test_client("http://127.0.0.1:9999/mock/");
        let url = client.community_url("therock");
        assert_eq!(url.path(), "/mock/community");
    }

    #[test]
    fn new_builds_https_url_from_host() {
        let client = RapidApiClient::new("k", "example.p.rapidapi.com", Duration::from_secs(1))
            .expect("client");
        assert_eq!(client.base_url.as_str(), "https://example.p.rapidapi.com/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = RapidApiClient::with_base_url("k", "h", Duration::from_secs(1), "not a url")
            .unwrap_err();
        assert!(matches!(err, RapidApiError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn debug_redacts_key() {
        let client = test_client("https://api.example.com");
        let debug = format!("{client:?}");
        assert!(!debug.contains("test-key"));
    }
}
