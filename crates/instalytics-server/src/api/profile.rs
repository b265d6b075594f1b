use axum::{
    extract::{Query, State},
    Extension, Json,
};
use instalytics_core::validate_username;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_upstream_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProfileQuery {
    pub username: Option<String>,
}

/// Relays the upstream `/community` body for a validated username.
pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let username = validate_username(query.username.as_deref())?;
    let client = state.require_upstream()?;

    tracing::info!(request_id = %req_id.0, username, "fetching upstream profile");
    let body = client
        .fetch_community_raw(username)
        .await
        .map_err(|e| map_upstream_error(&state.config, &e))?;

    tracing::debug!(request_id = %req_id.0, username, "upstream profile relayed");
    Ok(Json(body))
}
