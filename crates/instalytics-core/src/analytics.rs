//! The `InstagramAnalytics` aggregate and its parts.
//!
//! Every type serializes in camelCase so the JSON matches what dashboard
//! clients already consume.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramProfile {
    pub username: String,
    pub full_name: String,
    pub biography: String,
    pub profile_pic_url: String,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    pub is_verified: bool,
    pub is_private: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    /// Interactions as a percentage of followers, two decimals.
    pub engagement_rate: f64,
    pub avg_likes: u64,
    pub avg_comments: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCategory {
    pub name: String,
    pub percentage: u8,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    pub global_rank: u64,
    pub country_rank: u64,
    pub country: String,
    /// Display form, e.g. `#12`.
    pub category_rank: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceQuality {
    pub quality_score: u8,
    pub real_followers: u64,
    pub suspicious_followers: u64,
}

impl AudienceQuality {
    /// Splits `followers` into real and suspicious counts by `quality_score`
    /// (clamped to 100). The two counts always add up to `followers`.
    #[must_use]
    pub fn split(followers: u64, quality_score: u8) -> Self {
        let quality_score = quality_score.min(100);
        let real = u128::from(followers) * u128::from(quality_score) / 100;
        // real <= followers, so the narrowing cannot fail
        let real_followers = u64::try_from(real).unwrap_or(followers);
        Self {
            quality_score,
            real_followers,
            suspicious_followers: followers - real_followers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerGrowth {
    pub date: NaiveDate,
    pub followers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstagramAnalytics {
    pub profile: InstagramProfile,
    pub engagement: EngagementMetrics,
    pub categories: Vec<ContentCategory>,
    pub rankings: Rankings,
    pub audience_quality: AudienceQuality,
    pub follower_growth: Vec<FollowerGrowth>,
}

impl InstagramAnalytics {
    /// Follower delta between the first and last growth samples.
    #[must_use]
    pub fn growth_delta(&self) -> i64 {
        match (self.follower_growth.first(), self.follower_growth.last()) {
            (Some(first), Some(last)) => {
                i64::try_from(last.followers).unwrap_or(i64::MAX)
                    - i64::try_from(first.followers).unwrap_or(i64::MAX)
            }
            _ => 0,
        }
    }
}
