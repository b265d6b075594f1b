use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::username::validate_username;
use crate::ConfigError;

/// Maximum number of suggestions returned by a search.
pub const MAX_RESULTS: usize = 8;
/// Longest accepted search query, in characters.
pub const MAX_QUERY_LEN: usize = 100;

const BUILTIN_SUGGESTIONS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../config/suggestions.yaml"
));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub username: String,
    pub full_name: String,
    #[serde(default)]
    pub profile_pic_url: String,
    pub followers: u64,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub category: Option<String>,
    /// Lower sorts first.
    pub priority: u32,
}

/// One search hit as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub username: String,
    pub full_name: String,
    pub profile_pic_url: String,
    pub followers: u64,
    pub is_verified: bool,
}

impl From<&Suggestion> for SearchResult {
    fn from(s: &Suggestion) -> Self {
        Self {
            username: s.username.clone(),
            full_name: s.full_name.clone(),
            profile_pic_url: s.profile_pic_url.clone(),
            followers: s.followers,
            is_verified: s.is_verified,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionTable {
    suggestions: Vec<Suggestion>,
}

impl SuggestionTable {
    /// The table shipped with the binary (`config/suggestions.yaml`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the embedded file fails to parse or validate.
    pub fn builtin() -> Result<Self, ConfigError> {
        parse_suggestions(BUILTIN_SUGGESTIONS)
    }

    #[must_use]
    pub fn entries(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Case-insensitive substring search over username and full name.
    ///
    /// Hits are ordered by priority, then by follower count descending, and
    /// capped at [`MAX_RESULTS`]. A blank query yields no hits.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<&Suggestion> = self
            .suggestions
            .iter()
            .filter(|s| {
                s.username.to_lowercase().contains(&query)
                    || s.full_name.to_lowercase().contains(&query)
            })
            .collect();

        hits.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| b.followers.cmp(&a.followers))
        });

        hits.into_iter()
            .take(MAX_RESULTS)
            .map(SearchResult::from)
            .collect()
    }
}

/// Load and validate a suggestion table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_suggestions(path: &Path) -> Result<SuggestionTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SuggestionsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_suggestions(&content)
}

fn parse_suggestions(content: &str) -> Result<SuggestionTable, ConfigError> {
    let table: SuggestionTable = serde_yaml::from_str(content)?;
    validate_suggestions(&table)?;
    Ok(table)
}

fn validate_suggestions(table: &SuggestionTable) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in &table.suggestions {
        if validate_username(Some(&entry.username)).is_err() {
            return Err(ConfigError::Validation(format!(
                "invalid username '{}'",
                entry.username
            )));
        }

        if entry.priority == 0 {
            return Err(ConfigError::Validation(format!(
                "suggestion '{}' has priority 0; priorities start at 1",
                entry.username
            )));
        }

        if !seen.insert(entry.username.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate username: '{}'",
                entry.username
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "suggestions_test.rs"]
mod tests;
