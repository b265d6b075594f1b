pub mod analytics;
pub mod app_config;
pub mod catalog;
pub mod config;
pub mod format;
pub mod suggestions;
pub mod username;

pub use analytics::{
    AudienceQuality, ContentCategory, EngagementMetrics, FollowerGrowth, InstagramAnalytics,
    InstagramProfile, Rankings,
};
pub use app_config::{AppConfig, Environment};
pub use catalog::{catalog, Catalog};
pub use config::{load_app_config, load_app_config_from_env};
pub use format::{format_number, format_percentage};
pub use suggestions::{load_suggestions, SearchResult, Suggestion, SuggestionTable};
pub use username::{validate_username, UsernameError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read suggestions file {path}: {source}")]
    SuggestionsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse suggestions file: {0}")]
    SuggestionsFileParse(#[from] serde_yaml::Error),

    #[error("suggestion table validation failed: {0}")]
    Validation(String),
}
