use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub rapidapi_key: Option<String>,
    pub rapidapi_host: String,
    pub rapidapi_timeout_secs: u64,
    pub rapidapi_max_retries: u32,
    pub rapidapi_retry_backoff_base_ms: u64,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
    pub suggestions_path: Option<PathBuf>,
    pub proxy_url: String,
    pub api_rate_limit_max: usize,
    pub api_rate_limit_window_secs: u64,
    pub search_rate_limit_max: usize,
    pub search_rate_limit_window_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.env == Environment::Production
    }

    #[must_use]
    pub fn rapidapi_timeout(&self) -> Duration {
        Duration::from_secs(self.rapidapi_timeout_secs)
    }

    /// The API key reduced to `***` plus its last four characters, or
    /// `NOT SET`. Safe to log.
    #[must_use]
    pub fn masked_rapidapi_key(&self) -> String {
        mask_secret(self.rapidapi_key.as_deref())
    }
}

/// Masks a secret down to its last four characters.
#[must_use]
pub fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        Some(s) if !s.is_empty() => {
            let tail: String = s
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("***{tail}")
        }
        _ => "NOT SET".to_string(),
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("rapidapi_key", &self.masked_rapidapi_key())
            .field("rapidapi_host", &self.rapidapi_host)
            .field("rapidapi_timeout_secs", &self.rapidapi_timeout_secs)
            .field("rapidapi_max_retries", &self.rapidapi_max_retries)
            .field(
                "rapidapi_retry_backoff_base_ms",
                &self.rapidapi_retry_backoff_base_ms,
            )
            .field("allowed_origins", &self.allowed_origins)
            .field("suggestions_path", &self.suggestions_path)
            .field("proxy_url", &self.proxy_url)
            .field("api_rate_limit_max", &self.api_rate_limit_max)
            .field(
                "api_rate_limit_window_secs",
                &self.api_rate_limit_window_secs,
            )
            .field("search_rate_limit_max", &self.search_rate_limit_max)
            .field(
                "search_rate_limit_window_secs",
                &self.search_rate_limit_window_secs,
            )
            .finish()
    }
}
