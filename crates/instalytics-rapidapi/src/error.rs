use thiserror::Error;

/// Errors returned by the `RapidAPI` client.
#[derive(Debug, Error)]
pub enum RapidApiError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status. `body` is the decoded JSON
    /// body, or the raw text wrapped in a JSON string when it is not JSON.
    #[error("upstream returned HTTP {status}")]
    Status {
        status: u16,
        body: serde_json::Value,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl RapidApiError {
    /// HTTP status reported by upstream, if the request got that far.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Deserialize { .. } | Self::InvalidBaseUrl { .. } => None,
        }
    }

    /// The upstream `message` field when present, else this error's text.
    #[must_use]
    pub fn upstream_message(&self) -> String {
        if let Self::Status { body, .. } = self {
            if let Some(msg) = body.get("message").and_then(serde_json::Value::as_str) {
                return msg.to_string();
            }
        }
        self.to_string()
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}
