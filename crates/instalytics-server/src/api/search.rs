use axum::{
    extract::{Query, State},
    Json,
};
use instalytics_core::suggestions::MAX_QUERY_LEN;
use instalytics_core::SearchResult;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    results: Vec<SearchResult>,
}

pub(super) async fn search_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let raw = query.query.unwrap_or_default();
    if raw.trim().is_empty() {
        return Ok(Json(SearchResponse {
            results: Vec::new(),
        }));
    }

    if raw.chars().count() > MAX_QUERY_LEN {
        return Err(
            ApiError::bad_request("La búsqueda debe tener máximo 100 caracteres")
                .with_empty_results(),
        );
    }

    let results = state.suggestions.search(&raw);
    tracing::debug!(query = %raw.trim(), count = results.len(), "suggestion search");
    Ok(Json(SearchResponse { results }))
}
