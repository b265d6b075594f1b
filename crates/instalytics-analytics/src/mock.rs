//! Synthetic analytics for any username, used when upstream data is missing.
//!
//! Category shares are deterministic per username. The growth series mixes in
//! jitter from the supplied RNG, so two calls produce different curves with
//! the same overall trend.

use chrono::{Months, NaiveDate};
use instalytics_core::{
    catalog, AudienceQuality, ContentCategory, EngagementMetrics, FollowerGrowth,
    InstagramAnalytics, InstagramProfile, Rankings,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::Rng;

use crate::percentages::unique_percentages;

/// Number of monthly samples in a growth series.
pub const GROWTH_MONTHS: u32 = 12;

const BASE_FOLLOWERS: u64 = 550_000;
const MONTHLY_GAIN: u64 = 5_000;
const MAX_JITTER: u64 = 3_000;

const MOCK_DISPLAY_NAME: &str = "Demo Creator";
const MOCK_BIOGRAPHY: &str = "Content creator | Digital influencer | Inspiring people around the world 🌎";
const MOCK_FOLLOWERS: u64 = 617_500;
const MOCK_QUALITY_SCORE: u8 = 92;

const AVATAR_NAME: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

/// Placeholder avatar rendered from the username's initials.
#[must_use]
pub fn avatar_url(username: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&size=200&background=f97316&color=fff",
        utf8_percent_encode(username, AVATAR_NAME)
    )
}

/// Twelve monthly samples ending at `today`, oldest first.
///
/// Month `k` (0 = eleven months ago) holds `550 000 + k × 5 000 + jitter`
/// with jitter in `0..3000`, so each sample is strictly above the previous.
pub fn follower_growth<R: Rng>(today: NaiveDate, rng: &mut R) -> Vec<FollowerGrowth> {
    (0..GROWTH_MONTHS)
        .rev()
        .map(|months_back| {
            let elapsed = u64::from(GROWTH_MONTHS - 1 - months_back);
            let date = today
                .checked_sub_months(Months::new(months_back))
                .unwrap_or(today);
            FollowerGrowth {
                date,
                followers: BASE_FOLLOWERS + elapsed * MONTHLY_GAIN + rng.random_range(0..MAX_JITTER),
            }
        })
        .collect()
}

/// Pairs `names` with per-username shares and palette colors by position.
pub(crate) fn categories_for(username: &str, names: &[&str]) -> Vec<ContentCategory> {
    let Ok(shares) = unique_percentages(username, names.len()) else {
        return Vec::new();
    };

    names
        .iter()
        .zip(shares)
        .enumerate()
        .map(|(index, (name, percentage))| ContentCategory {
            name: (*name).to_string(),
            percentage,
            color: catalog().color_for(index).to_string(),
        })
        .collect()
}

/// Builds a complete analytics record for `username` without any network.
pub fn mock_analytics<R: Rng>(
    username: &str,
    today: NaiveDate,
    rng: &mut R,
) -> InstagramAnalytics {
    let categories = categories_for(username, catalog().mock_categories());
    let top_category = categories
        .first()
        .map_or_else(String::new, |c| c.name.clone());

    InstagramAnalytics {
        profile: InstagramProfile {
            username: username.to_string(),
            full_name: MOCK_DISPLAY_NAME.to_string(),
            biography: MOCK_BIOGRAPHY.to_string(),
            profile_pic_url: avatar_url(username),
            followers: MOCK_FOLLOWERS,
            following: 450,
            posts: 1_234,
            is_verified: true,
            is_private: false,
        },
        engagement: EngagementMetrics {
            engagement_rate: 4.18,
            avg_likes: 25_800,
            avg_comments: 1_234,
        },
        categories,
        rankings: Rankings {
            global_rank: 1_250,
            country_rank: 45,
            country: "España".to_string(),
            category_rank: "#12".to_string(),
            category: top_category,
        },
        audience_quality: AudienceQuality::split(MOCK_FOLLOWERS, MOCK_QUALITY_SCORE),
        follower_growth: follower_growth(today, rng),
    }
}
