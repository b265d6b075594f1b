//! Maps the upstream `/community` payload onto `InstagramAnalytics`.
//!
//! Upstream does not report everything the dashboard shows. Gaps are filled
//! with estimates: likes and comments are a fixed split of average
//! interactions, following/post counts come from follower-size tiers, and
//! the growth series is synthetic.

use chrono::NaiveDate;
use instalytics_core::catalog::{COMMENTS_RATIO, DEFAULT_COUNTRY, LIKES_RATIO};
use instalytics_core::{
    catalog, AudienceQuality, EngagementMetrics, InstagramAnalytics, InstagramProfile, Rankings,
};
use instalytics_rapidapi::CommunityProfile;
use rand::Rng;

use crate::mock::{avatar_url, categories_for, follower_growth};

/// Recognized tags needed before upstream tags replace the fallback list.
const MIN_RECOGNIZED_TAGS: usize = 3;
const MAX_TAG_CATEGORIES: usize = 5;
const DEFAULT_QUALITY: f64 = 0.5;

/// Follower-count bucket used to estimate counts upstream leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccountTier {
    /// More than one million followers.
    Celebrity,
    /// More than one hundred thousand followers.
    Influencer,
    Regular,
}

impl AccountTier {
    fn for_followers(followers: u64) -> Self {
        if followers > 1_000_000 {
            Self::Celebrity
        } else if followers > 100_000 {
            Self::Influencer
        } else {
            Self::Regular
        }
    }

    /// Bigger accounts follow fewer people.
    fn following_range(self) -> std::ops::Range<u64> {
        match self {
            Self::Celebrity => 300..800,
            Self::Influencer => 500..2_000,
            Self::Regular => 1_000..4_000,
        }
    }

    fn posts_range(self) -> std::ops::Range<u64> {
        match self {
            Self::Celebrity => 500..2_500,
            Self::Influencer => 300..1_800,
            Self::Regular => 100..1_100,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_to_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `round(score × 100)` clamped to 0–100; absent or zero scores count as 0.5.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quality_percent(score: Option<f64>) -> u8 {
    let score = score
        .filter(|s| s.is_finite() && *s != 0.0)
        .unwrap_or(DEFAULT_QUALITY);
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Category display names for the recognized tags, in upstream order, capped
/// at five. `None` when fewer than three tags are recognized.
fn tag_categories(tags: &[String]) -> Option<Vec<&'static str>> {
    let recognized: Vec<&'static str> = tags
        .iter()
        .filter_map(|tag| catalog().category_for_tag(tag))
        .take(MAX_TAG_CATEGORIES)
        .collect();
    (recognized.len() >= MIN_RECOGNIZED_TAGS).then_some(recognized)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Translates an upstream profile into the analytics aggregate.
///
/// `username` is the requested name; it backs up missing identity fields and
/// keys the category shares. Randomized estimates draw from `rng`.
pub fn map_community<R: Rng>(
    username: &str,
    data: &CommunityProfile,
    today: NaiveDate,
    rng: &mut R,
) -> InstagramAnalytics {
    let followers = data.followers();
    let avg_interactions = data.avg_interactions.unwrap_or_default();
    let tier = AccountTier::for_followers(followers);

    let category_names = tag_categories(data.tags())
        .unwrap_or_else(|| catalog().fallback_categories().to_vec());
    let categories = categories_for(username, &category_names);
    let top_category = categories
        .first()
        .map_or_else(String::new, |c| c.name.clone());

    let following = data
        .following()
        .unwrap_or_else(|| rng.random_range(tier.following_range()));
    let posts = data
        .posts()
        .unwrap_or_else(|| rng.random_range(tier.posts_range()));

    let global_rank = data
        .rating_index()
        .unwrap_or_else(|| rng.random_range(500..5_500));
    let country_rank = rng.random_range(20..220);
    let category_rank = format!("#{}", rng.random_range(1..=50));

    let quality_score = quality_percent(data.quality_score);

    InstagramAnalytics {
        profile: InstagramProfile {
            username: non_blank(data.screen_name.as_deref())
                .unwrap_or(username)
                .to_string(),
            full_name: non_blank(data.name.as_deref())
                .unwrap_or(username)
                .to_string(),
            biography: data.description.clone().unwrap_or_default(),
            profile_pic_url: non_blank(data.image.as_deref())
                .map_or_else(|| avatar_url(username), ToString::to_string),
            followers,
            following,
            posts,
            is_verified: data.verified.unwrap_or(false),
            is_private: data.is_closed.unwrap_or(false),
        },
        engagement: EngagementMetrics {
            engagement_rate: round_two_decimals(data.avg_er.unwrap_or_default() * 100.0),
            avg_likes: floor_to_u64(avg_interactions * LIKES_RATIO),
            avg_comments: floor_to_u64(avg_interactions * COMMENTS_RATIO),
        },
        categories,
        rankings: Rankings {
            global_rank,
            country_rank,
            country: data.top_city().unwrap_or(DEFAULT_COUNTRY).to_string(),
            category_rank,
            category: top_category,
        },
        audience_quality: AudienceQuality::split(followers, quality_score),
        follower_growth: follower_growth(today, rng),
    }
}

#[cfg(test)]
#[path = "mapper_test.rs"]
mod tests;
