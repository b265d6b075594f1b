mod api;
mod middleware;

use std::{net::SocketAddr, sync::Arc};

use instalytics_core::{load_suggestions, AppConfig, SuggestionTable};
use instalytics_rapidapi::RapidApiClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, RateLimits};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(instalytics_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let suggestions = match &config.suggestions_path {
        Some(path) => load_suggestions(path)?,
        None => SuggestionTable::builtin()?,
    };
    tracing::info!(entries = suggestions.entries().len(), "suggestion table loaded");

    let upstream = build_upstream(&config)?;
    tracing::info!(
        env = %config.env,
        host = %config.rapidapi_host,
        api_key = %config.masked_rapidapi_key(),
        "proxy starting"
    );

    let limits = RateLimits::from_config(&config);
    let app = build_app(
        AppState {
            config: Arc::clone(&config),
            upstream,
            suggestions: Arc::new(suggestions),
        },
        limits,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

fn build_upstream(config: &AppConfig) -> anyhow::Result<Option<RapidApiClient>> {
    let Some(key) = config.rapidapi_key.as_deref() else {
        tracing::warn!("RAPIDAPI_KEY not set; profile requests will return 503");
        return Ok(None);
    };

    let client = RapidApiClient::new(key, &config.rapidapi_host, config.rapidapi_timeout())?
        .with_retry(
            config.rapidapi_max_retries,
            config.rapidapi_retry_backoff_base_ms,
        );
    Ok(Some(client))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
