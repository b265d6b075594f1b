//! Analytics lookup through the proxy, with mock fallback.
//!
//! Callers always get an aggregate. Whether it came from upstream statistics
//! or from the synthetic builder is carried in [`Fetched`].

use std::fmt::Display;
use std::time::Duration;

use chrono::Utc;
use instalytics_core::InstagramAnalytics;
use instalytics_rapidapi::CommunityEnvelope;
use reqwest::{Client, Url};

use crate::mapper::map_community;
use crate::mock::mock_analytics;

/// Outcome of an analytics lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Upstream(InstagramAnalytics),
    /// Synthetic data; `reason` says why upstream data was not used.
    Fallback {
        analytics: InstagramAnalytics,
        reason: String,
    },
}

impl Fetched {
    #[must_use]
    pub fn analytics(&self) -> &InstagramAnalytics {
        match self {
            Self::Upstream(analytics) | Self::Fallback { analytics, .. } => analytics,
        }
    }

    #[must_use]
    pub fn into_analytics(self) -> InstagramAnalytics {
        match self {
            Self::Upstream(analytics) | Self::Fallback { analytics, .. } => analytics,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// `"upstream"` or `"fallback"`.
    #[must_use]
    pub fn source(&self) -> &'static str {
        match self {
            Self::Upstream(_) => "upstream",
            Self::Fallback { .. } => "fallback",
        }
    }
}

fn fallback(username: &str, reason: String) -> Fetched {
    tracing::warn!(username, reason = %reason, "using mock analytics");
    let today = Utc::now().date_naive();
    Fetched::Fallback {
        analytics: mock_analytics(username, today, &mut rand::rng()),
        reason,
    }
}

/// Turns an upstream lookup result into an aggregate.
///
/// A decoded envelope with `data` is mapped; an error or a missing `data`
/// field yields mock analytics.
pub fn resolve_upstream<E: Display>(
    username: &str,
    result: Result<CommunityEnvelope, E>,
) -> Fetched {
    match result {
        Ok(CommunityEnvelope { data: Some(data) }) => {
            let today = Utc::now().date_naive();
            Fetched::Upstream(map_community(username, &data, today, &mut rand::rng()))
        }
        Ok(CommunityEnvelope { data: None }) => {
            fallback(username, "response has no data field".to_string())
        }
        Err(e) => fallback(username, e.to_string()),
    }
}

/// Client side of the proxy: fetches `/api/instagram/profile` and builds the
/// aggregate.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    client: Client,
    proxy_url: String,
}

impl AnalyticsService {
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest::Client` cannot be built.
    pub fn new(proxy_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("instalytics/0.1 (analytics)")
            .build()?;
        Ok(Self {
            client,
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        })
    }

    fn profile_url(&self, username: &str) -> Result<Url, String> {
        let mut url = Url::parse(&format!("{}/api/instagram/profile", self.proxy_url))
            .map_err(|e| format!("invalid proxy url {}: {e}", self.proxy_url))?;
        url.query_pairs_mut().append_pair("username", username);
        Ok(url)
    }

    async fn fetch_envelope(&self, username: &str) -> Result<CommunityEnvelope, String> {
        let url = self.profile_url(username)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("proxy request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("proxy returned {}", status.as_u16()));
        }

        response
            .json::<CommunityEnvelope>()
            .await
            .map_err(|e| format!("undecodable proxy response: {e}"))
    }

    /// Full analytics for `username`. Never fails: any problem reaching or
    /// reading the proxy produces [`Fetched::Fallback`].
    pub async fn complete_analytics(&self, username: &str) -> Fetched {
        let result = self.fetch_envelope(username).await;
        resolve_upstream(username, result)
    }
}
