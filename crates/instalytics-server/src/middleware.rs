use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

pub const API_RATE_LIMIT_MESSAGE: &str =
    "Demasiadas peticiones desde esta IP, por favor intenta de nuevo más tarde.";
pub const SEARCH_RATE_LIMIT_MESSAGE: &str = "Demasiadas búsquedas, por favor espera un momento.";

const RATELIMIT_LIMIT: &str = "ratelimit-limit";
const RATELIMIT_REMAINING: &str = "ratelimit-remaining";
const RATELIMIT_RESET: &str = "ratelimit-reset";

/// Clients tracked before expired windows are swept.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter keyed by client IP.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    message: &'static str,
    clients: Arc<Mutex<HashMap<String, RateLimitWindow>>>,
}

/// Where a single request stands in its client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Quota {
    limit: usize,
    remaining: usize,
    reset_secs: u64,
    allowed: bool,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration, message: &'static str) -> Self {
        Self {
            max_requests,
            window,
            message,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn check(&self, client: &str) -> Quota {
        let now = Instant::now();
        let mut clients = self.clients.lock().await;

        if clients.len() >= SWEEP_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started_at) < window);
        }

        let entry = clients
            .entry(client.to_owned())
            .or_insert_with(|| RateLimitWindow {
                started_at: now,
                count: 0,
            });

        if now.duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.count = 0;
        }

        let allowed = entry.count < self.max_requests;
        if allowed {
            entry.count += 1;
        }

        let reset_secs = self
            .window
            .saturating_sub(now.duration_since(entry.started_at))
            .as_secs();

        Quota {
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_secs,
            allowed,
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: &'static str,
    message: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Peer address from `ConnectInfo`, then the first `x-forwarded-for` hop,
/// else `unknown`.
fn client_key(req: &Request) -> String {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    forwarded_for(req.headers()).unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Sets the `RateLimit-*` headers unless an inner limiter already did.
fn apply_quota_headers(headers: &mut HeaderMap, quota: Quota) {
    if headers.contains_key(RATELIMIT_LIMIT) {
        return;
    }
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(quota.limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(quota.remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(quota.reset_secs));
}

/// Middleware enforcing a per-client request limit per window.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_key(&req);
    let quota = rate_limit.check(&client).await;

    let mut res = if quota.allowed {
        next.run(req).await
    } else {
        tracing::warn!(client = %client, path = %req.uri().path(), "rate limit exceeded");
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(MiddlewareErrorBody {
                error: "Too Many Requests",
                message: rate_limit.message,
            }),
        )
            .into_response()
    };

    apply_quota_headers(res.headers_mut(), quota);
    res
}
