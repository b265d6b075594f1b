//! Immutable lookup tables shared by the mapper and the mock builder.
//!
//! Built once on first access and handed out as `&'static Catalog`.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Share of average interactions attributed to likes.
pub const LIKES_RATIO: f64 = 0.9;
/// Share of average interactions attributed to comments.
pub const COMMENTS_RATIO: f64 = 0.1;

/// Country reported when upstream has no audience city data.
pub const DEFAULT_COUNTRY: &str = "Estados Unidos";

const CATEGORY_COLORS: [&str; 5] = ["#f97316", "#ef4444", "#ec4899", "#f59e0b", "#fb923c"];

const TAG_CATEGORIES: [(&str, &str); 9] = [
    ("lifestyle", "Lifestyle"),
    ("fitness-and-gym", "Fitness"),
    ("cinema-and-Actors-actresses", "Entertainment"),
    ("business-and-careers", "Business"),
    ("art-artists", "Art"),
    ("celebrities", "Celebrity"),
    ("fashion-and-style", "Fashion"),
    ("travel-and-tourism", "Travel"),
    ("food-and-Cooking", "Food"),
];

const FALLBACK_CATEGORIES: [&str; 5] = ["Lifestyle", "Entertainment", "Creative", "Personal", "Other"];

const MOCK_CATEGORIES: [&str; 5] = ["Lifestyle", "Fashion", "Travel", "Food", "Fitness"];

#[derive(Debug)]
pub struct Catalog {
    colors: Vec<&'static str>,
    tag_categories: HashMap<&'static str, &'static str>,
    fallback_categories: Vec<&'static str>,
    mock_categories: Vec<&'static str>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    colors: CATEGORY_COLORS.to_vec(),
    tag_categories: TAG_CATEGORIES.into_iter().collect(),
    fallback_categories: FALLBACK_CATEGORIES.to_vec(),
    mock_categories: MOCK_CATEGORIES.to_vec(),
});

/// Returns the process-wide catalog.
#[must_use]
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

impl Catalog {
    #[must_use]
    pub fn colors(&self) -> &[&'static str] {
        &self.colors
    }

    /// Color for the category at `index`; wraps to the first color past the
    /// end of the palette.
    #[must_use]
    pub fn color_for(&self, index: usize) -> &'static str {
        self.colors.get(index).copied().unwrap_or(self.colors[0])
    }

    /// Display name for an upstream tag. Matching is case sensitive.
    #[must_use]
    pub fn category_for_tag(&self, tag: &str) -> Option<&'static str> {
        self.tag_categories.get(tag).copied()
    }

    #[must_use]
    pub fn fallback_categories(&self) -> &[&'static str] {
        &self.fallback_categories
    }

    #[must_use]
    pub fn mock_categories(&self) -> &[&'static str] {
        &self.mock_categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_five_hex_colors() {
        let colors = catalog().colors();
        assert_eq!(colors.len(), 5);
        for color in colors {
            assert_eq!(color.len(), 7, "{color}");
            assert!(color.starts_with('#'));
            assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()), "{color}");
        }
    }

    #[test]
    fn color_for_out_of_range_uses_first() {
        assert_eq!(catalog().color_for(2), "#ec4899");
        assert_eq!(catalog().color_for(99), "#f97316");
    }

    #[test]
    fn tag_lookup_is_case_sensitive() {
        assert_eq!(catalog().category_for_tag("food-and-Cooking"), Some("Food"));
        assert_eq!(catalog().category_for_tag("food-and-cooking"), None);
        assert_eq!(catalog().category_for_tag("celebrities"), Some("Celebrity"));
    }

    #[test]
    fn category_lists_have_five_names() {
        assert_eq!(catalog().fallback_categories().len(), 5);
        assert_eq!(catalog().mock_categories()[0], "Lifestyle");
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn interaction_ratios_sum_to_one() {
        assert_eq!(LIKES_RATIO + COMMENTS_RATIO, 1.0);
    }
}
