//! Response types for the `/community` endpoint.
//!
//! Upstream is loose about numbers (counts sometimes arrive as floats) and
//! about nulls, so every field is optional and numeric fields decode as
//! `f64`. Accessors convert to the integer shapes callers need.

use serde::{Deserialize, Serialize};

/// Top-level `{ "data": { ... } }` envelope. `data` is absent on some
/// error-shaped 200 responses.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommunityEnvelope {
    #[serde(default)]
    pub data: Option<CommunityProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityProfile {
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub users_count: Option<f64>,
    #[serde(default)]
    pub users_followed_count: Option<f64>,
    #[serde(default)]
    pub posts_count: Option<f64>,
    #[serde(default)]
    pub avg_interactions: Option<f64>,
    /// Engagement rate as a fraction (0.0418 is 4.18 %).
    #[serde(default, rename = "avgER")]
    pub avg_er: Option<f64>,
    /// Fraction of followers judged genuine, 0.0–1.0.
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub rating_index: Option<f64>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub members_cities: Option<Vec<MemberCity>>,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub is_closed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MemberCity {
    #[serde(default)]
    pub name: Option<String>,
}

/// Converts an upstream number to a count, treating missing, negative and
/// non-finite values as zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_count(value: Option<f64>) -> u64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.floor() as u64,
        _ => 0,
    }
}

impl CommunityProfile {
    #[must_use]
    pub fn followers(&self) -> u64 {
        as_count(self.users_count)
    }

    /// Following count, `None` when upstream left it absent or zero.
    #[must_use]
    pub fn following(&self) -> Option<u64> {
        Some(as_count(self.users_followed_count)).filter(|n| *n > 0)
    }

    /// Post count, `None` when upstream left it absent or zero.
    #[must_use]
    pub fn posts(&self) -> Option<u64> {
        Some(as_count(self.posts_count)).filter(|n| *n > 0)
    }

    /// Global rating index, `None` when absent or not positive.
    #[must_use]
    pub fn rating_index(&self) -> Option<u64> {
        Some(as_count(self.rating_index)).filter(|n| *n > 0)
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Name of the first audience city, if upstream supplied a non-empty one.
    #[must_use]
    pub fn top_city(&self) -> Option<&str> {
        self.members_cities
            .as_deref()
            .and_then(|cities| cities.first())
            .and_then(|c| c.name.as_deref())
            .filter(|n| !n.trim().is_empty())
    }
}
