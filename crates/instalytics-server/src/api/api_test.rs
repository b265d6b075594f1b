use axum::body::{to_bytes, Body};
use axum::http::Request;
use instalytics_core::Environment;
use tower::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const HOST: &str = "instagram-statistics-api.p.rapidapi.com";

fn test_config(env: Environment, key: Option<&str>) -> AppConfig {
    AppConfig {
        env,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "info".to_string(),
        rapidapi_key: key.map(ToString::to_string),
        rapidapi_host: HOST.to_string(),
        rapidapi_timeout_secs: 15,
        rapidapi_max_retries: 0,
        rapidapi_retry_backoff_base_ms: 1_000,
        allowed_origins: Vec::new(),
        suggestions_path: None,
        proxy_url: "http://localhost:3001".to_string(),
        api_rate_limit_max: 100,
        api_rate_limit_window_secs: 900,
        search_rate_limit_max: 30,
        search_rate_limit_window_secs: 60,
    }
}

fn state_with(config: AppConfig, upstream_base: Option<&str>) -> AppState {
    let upstream = upstream_base.map(|base| {
        RapidApiClient::with_base_url(
            config.rapidapi_key.as_deref().unwrap_or("test-key"),
            HOST,
            config.rapidapi_timeout(),
            base,
        )
        .expect("client")
    });
    AppState {
        config: Arc::new(config),
        upstream,
        suggestions: Arc::new(SuggestionTable::builtin().expect("builtin suggestions")),
    }
}

fn app_with(state: AppState) -> Router {
    let limits = RateLimits::from_config(&state.config);
    build_app(state, limits)
}

fn offline_app() -> Router {
    app_with(state_with(test_config(Environment::Test, None), None))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, headers, json)
}

#[tokio::test]
async fn health_reports_masked_key() {
    let app = app_with(state_with(
        test_config(Environment::Test, Some("secret-key-abcd")),
        None,
    ));
    let (status, headers, json) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["apiKey"], "***abcd");
    assert!(json["timestamp"].is_string());
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn health_without_key_says_not_set() {
    let (_, _, json) = get(offline_app(), "/health").await;
    assert_eq!(json["apiKey"], "NOT SET");
}

#[tokio::test]
async fn unknown_route_is_404_envelope() {
    let (status, _, json) = get(offline_app(), "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Not Found");
    assert_eq!(json["message"], "El endpoint solicitado no existe");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let response = offline_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn profile_requires_username() {
    for uri in ["/api/instagram/profile", "/api/instagram/profile?username=%20%20"] {
        let (status, _, json) = get(offline_app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["error"], "Bad Request");
        assert_eq!(json["message"], "Username required");
    }
}

#[tokio::test]
async fn invalid_username_never_reaches_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = state_with(
        test_config(Environment::Test, Some("test-key")),
        Some(&server.uri()),
    );
    let long = "a".repeat(31);
    for uri in [
        "/api/instagram/profile?username=a!b".to_string(),
        format!("/api/instagram/profile?username={long}"),
        "/api/instagram/analytics?username=a!b".to_string(),
    ] {
        let (status, _, json) = get(app_with(state.clone()), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(
            json["message"]
                .as_str()
                .is_some_and(|m| m.contains("30 caracteres")),
            "{json}"
        );
    }
}

#[tokio::test]
async fn profile_without_key_is_unavailable() {
    let (status, _, json) = get(offline_app(), "/api/instagram/profile?username=therock").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "Service Unavailable");
}

#[tokio::test]
async fn profile_relays_upstream_body_verbatim() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "data": { "screenName": "therock", "usersCount": 396000000, "extra": [1, 2] },
        "meta": { "code": 200 }
    });
    Mock::given(method("GET"))
        .and(path("/community"))
        .and(query_param("url", "https://www.instagram.com/therock/"))
        .and(header_eq("X-RapidAPI-Key", "test-key"))
        .and(header_eq("X-RapidAPI-Host", HOST))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_with(state_with(
        test_config(Environment::Test, Some("test-key")),
        Some(&server.uri()),
    ));
    let (status, _, json) = get(app, "/api/instagram/profile?username=%20therock%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, body);
}

#[tokio::test]
async fn upstream_error_status_is_relayed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/community"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "message": "You are not subscribed to this API."
        })))
        .mount(&server)
        .await;

    let app = app_with(state_with(
        test_config(Environment::Test, Some("test-key")),
        Some(&server.uri()),
    ));
    let (status, _, json) = get(app, "/api/instagram/profile?username=cristiano").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "API Error");
    assert_eq!(json["message"], "You are not subscribed to this API.");
    assert_eq!(json["details"]["message"], "You are not subscribed to this API.");
}

#[tokio::test]
async fn transport_failure_is_server_error() {
    let app = app_with(state_with(
        test_config(Environment::Development, Some("test-key")),
        Some("http://127.0.0.1:9"),
    ));
    let (status, _, json) = get(app, "/api/instagram/profile?username=cristiano").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Server Error");
    assert_ne!(json["message"], "Ocurrió un error en el servidor");
}

#[tokio::test]
async fn production_hides_failure_detail() {
    let app = app_with(state_with(
        test_config(Environment::Production, Some("test-key")),
        Some("http://127.0.0.1:9"),
    ));
    let (status, _, json) = get(app, "/api/instagram/profile?username=cristiano").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Ocurrió un error en el servidor");
}

#[tokio::test]
async fn search_finds_suggestions() {
    let (status, _, json) = get(offline_app(), "/api/instagram/search?query=cristiano").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().expect("results");
    assert_eq!(results[0]["username"], "cristiano");
    assert_eq!(results[0]["fullName"], "Cristiano Ronaldo");
    assert_eq!(results[0]["isVerified"], true);
    assert_eq!(results[0]["followers"], 643_000_000);
}

#[tokio::test]
async fn blank_search_returns_empty_results() {
    for uri in ["/api/instagram/search", "/api/instagram/search?query=%20"] {
        let (status, _, json) = get(offline_app(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "results": [] }));
    }
}

#[tokio::test]
async fn overlong_search_is_rejected_with_results() {
    let uri = format!("/api/instagram/search?query={}", "a".repeat(101));
    let (status, _, json) = get(offline_app(), &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["results"], serde_json::json!([]));
    assert_eq!(json["message"], "La búsqueda debe tener máximo 100 caracteres");
}

#[tokio::test]
async fn analytics_maps_upstream_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/community"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "screenName": "leomessi",
                "name": "Leo Messi",
                "usersCount": 506000000,
                "avgInteractions": 1000,
                "qualityScore": 0.9
            }
        })))
        .mount(&server)
        .await;

    let app = app_with(state_with(
        test_config(Environment::Test, Some("test-key")),
        Some(&server.uri()),
    ));
    let (status, _, json) = get(app, "/api/instagram/analytics?username=leomessi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "upstream");
    assert_eq!(json["data"]["profile"]["fullName"], "Leo Messi");
    assert_eq!(json["data"]["engagement"]["avgLikes"], 900);
    assert_eq!(json["data"]["audienceQuality"]["qualityScore"], 90);
    assert_eq!(json["data"]["followerGrowth"].as_array().map(Vec::len), Some(12));
}

#[tokio::test]
async fn analytics_without_key_falls_back() {
    let (status, _, json) = get(offline_app(), "/api/instagram/analytics?username=someone").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["data"]["profile"]["username"], "someone");
    assert_eq!(json["data"]["categories"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn search_rate_limit_returns_429() {
    let mut config = test_config(Environment::Test, None);
    config.search_rate_limit_max = 2;
    let app = app_with(state_with(config, None));

    for _ in 0..2 {
        let (status, headers, _) = get(app.clone(), "/api/instagram/search?query=leo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["ratelimit-limit"], "2");
    }
    let (status, headers, json) = get(app, "/api/instagram/search?query=leo").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"], "Too Many Requests");
    assert_eq!(json["message"], "Demasiadas búsquedas, por favor espera un momento.");
    assert_eq!(headers["ratelimit-remaining"], "0");
}

#[tokio::test]
async fn api_rate_limit_covers_all_api_routes() {
    let mut config = test_config(Environment::Test, None);
    config.api_rate_limit_max = 1;
    let app = app_with(state_with(config, None));

    let (status, _, _) = get(app.clone(), "/api/instagram/search?query=leo").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, json) = get(app.clone(), "/api/instagram/profile?username=leomessi").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        json["message"],
        "Demasiadas peticiones desde esta IP, por favor intenta de nuevo más tarde."
    );

    let (status, _, _) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_api_paths_count_against_api_limit() {
    let mut config = test_config(Environment::Test, None);
    config.api_rate_limit_max = 2;
    let app = app_with(state_with(config, None));

    let (status, headers, json) = get(app.clone(), "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Not Found");
    assert_eq!(headers["ratelimit-remaining"], "1");

    let (status, _, _) = get(app.clone(), "/api/instagram/search?query=leo").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = get(app.clone(), "/api/other").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, headers, _) = get(app, "/elsewhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!headers.contains_key("ratelimit-limit"));
}

#[test]
fn cors_accepts_configured_origins() {
    // construction must not panic with a mix of valid and invalid origins
    let _ = build_cors(&["http://localhost:5173".to_string(), "bad\norigin".to_string()]);
    let _ = build_cors(&[]);
}
