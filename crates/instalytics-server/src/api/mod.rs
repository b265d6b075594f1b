mod analytics;
mod profile;
mod search;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use instalytics_core::{AppConfig, SearchResult, SuggestionTable, UsernameError};
use instalytics_rapidapi::{RapidApiClient, RapidApiError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, API_RATE_LIMIT_MESSAGE,
    SEARCH_RATE_LIMIT_MESSAGE,
};

const GENERIC_SERVER_ERROR: &str = "Ocurrió un error en el servidor";
const MISSING_KEY_MESSAGE: &str = "RAPIDAPI_KEY no está configurada en el servidor";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` when no `RAPIDAPI_KEY` is configured.
    pub upstream: Option<RapidApiClient>,
    pub suggestions: Arc<SuggestionTable>,
}

impl AppState {
    pub(super) fn require_upstream(&self) -> Result<&RapidApiClient, ApiError> {
        self.upstream.as_ref().ok_or_else(|| {
            ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable",
                MISSING_KEY_MESSAGE,
            )
        })
    }
}

/// JSON error envelope: `{ error, message, details?, results? }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    /// Search errors carry an empty result list so clients can render as usual.
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<Vec<SearchResult>>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
            details: None,
            results: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", message)
    }

    pub fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            "El endpoint solicitado no existe",
        )
    }

    /// 500 envelope; the detail is replaced by a generic message in
    /// production.
    pub fn server_error(config: &AppConfig, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::error!(error = %detail, "request failed");
        let message = if config.is_production() {
            GENERIC_SERVER_ERROR.to_string()
        } else {
            detail
        };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server Error", message)
    }

    #[must_use]
    pub fn with_empty_results(mut self) -> Self {
        self.results = Some(Vec::new());
        self
    }
}

impl From<UsernameError> for ApiError {
    fn from(error: UsernameError) -> Self {
        Self::bad_request(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Relays upstream non-2xx statuses with their body; anything else is a 500.
pub(super) fn map_upstream_error(config: &AppConfig, error: &RapidApiError) -> ApiError {
    match error {
        RapidApiError::Status { status, body } => {
            tracing::warn!(status, "relaying upstream error");
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            ApiError {
                details: Some(body.clone()),
                ..ApiError::new(status, "API Error", error.upstream_message())
            }
        }
        other => ApiError::server_error(config, other.to_string()),
    }
}

/// The two request limits: all `/api/` routes, and the search route on top.
#[derive(Debug, Clone)]
pub struct RateLimits {
    pub api: RateLimitState,
    pub search: RateLimitState,
}

impl RateLimits {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api: RateLimitState::new(
                config.api_rate_limit_max,
                Duration::from_secs(config.api_rate_limit_window_secs),
                API_RATE_LIMIT_MESSAGE,
            ),
            search: RateLimitState::new(
                config.search_rate_limit_max,
                Duration::from_secs(config.search_rate_limit_window_secs),
                SEARCH_RATE_LIMIT_MESSAGE,
            ),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthData {
    status: &'static str,
    api_key: String,
    timestamp: DateTime<Utc>,
}

fn build_cors(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Routes mounted under `/api`. The general limiter wraps the nested
/// fallback too, so unknown `/api/...` paths count against it.
fn api_router(limits: RateLimits) -> Router<AppState> {
    let search = Router::new()
        .route("/instagram/search", get(search::search_suggestions))
        .route_layer(axum::middleware::from_fn_with_state(
            limits.search,
            enforce_rate_limit,
        ));

    Router::new()
        .route("/instagram/profile", get(profile::get_profile))
        .route("/instagram/analytics", get(analytics::get_analytics))
        .merge(search)
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(
            limits.api,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, limits: RateLimits) -> Router {
    let cors = build_cors(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router(limits))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::middleware::from_fn(request_id))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                )),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "OK",
        api_key: state.config.masked_rapidapi_key(),
        timestamp: Utc::now(),
    })
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
