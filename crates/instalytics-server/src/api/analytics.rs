use axum::{
    extract::{Query, State},
    Extension, Json,
};
use instalytics_analytics::resolve_upstream;
use instalytics_core::{validate_username, InstagramAnalytics};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyticsQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyticsResponse {
    data: InstagramAnalytics,
    source: &'static str,
}

/// Builds the aggregate server-side; falls back to mock data when upstream
/// is unavailable, so only validation errors reach the client.
pub(super) async fn get_analytics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let username = validate_username(query.username.as_deref())?;

    let fetched = match state.upstream.as_ref() {
        Some(client) => resolve_upstream(username, client.fetch_community(username).await),
        None => resolve_upstream(username, Err("RAPIDAPI_KEY is not configured")),
    };

    tracing::info!(
        request_id = %req_id.0,
        username,
        source = fetched.source(),
        "analytics built"
    );

    let source = fetched.source();
    Ok(Json(AnalyticsResponse {
        data: fetched.into_analytics(),
        source,
    }))
}
