//! Builds the `InstagramAnalytics` aggregate from upstream statistics, with a
//! deterministic synthetic fallback when real data is unavailable.

pub mod mapper;
pub mod mock;
pub mod percentages;
pub mod service;

pub use mapper::map_community;
pub use mock::{avatar_url, follower_growth, mock_analytics};
pub use percentages::{unique_percentages, PercentageError, UsernameSeed};
pub use service::{resolve_upstream, AnalyticsService, Fetched};
