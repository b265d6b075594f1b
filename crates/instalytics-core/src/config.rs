use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_RAPIDAPI_HOST: &str = "instagram-statistics-api.p.rapidapi.com";
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3001";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("INSTALYTICS_ENV", "development"));
    let bind_addr = parse("INSTALYTICS_BIND_ADDR", "0.0.0.0:3001")?;
    let log_level = or_default("INSTALYTICS_LOG_LEVEL", "info");

    let rapidapi_key = optional("RAPIDAPI_KEY");
    let rapidapi_host = optional("RAPIDAPI_HOST").unwrap_or_else(|| DEFAULT_RAPIDAPI_HOST.to_string());
    let rapidapi_timeout_secs = parse_u64("RAPIDAPI_TIMEOUT_SECS", "15")?;
    if rapidapi_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RAPIDAPI_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let rapidapi_max_retries = parse_u32("RAPIDAPI_MAX_RETRIES", "0")?;
    let rapidapi_retry_backoff_base_ms = parse_u64("RAPIDAPI_RETRY_BACKOFF_BASE_MS", "1000")?;

    let allowed_origins = parse_origins(lookup("ALLOWED_ORIGINS").ok().as_deref());
    let suggestions_path = optional("INSTALYTICS_SUGGESTIONS_PATH").map(PathBuf::from);
    let proxy_url = optional("VITE_PROXY_URL").unwrap_or_else(|| DEFAULT_PROXY_URL.to_string());

    let api_rate_limit_max = parse_usize("INSTALYTICS_API_RATE_LIMIT_MAX", "100")?;
    let api_rate_limit_window_secs = parse_u64("INSTALYTICS_API_RATE_LIMIT_WINDOW_SECS", "900")?;
    let search_rate_limit_max = parse_usize("INSTALYTICS_SEARCH_RATE_LIMIT_MAX", "30")?;
    let search_rate_limit_window_secs =
        parse_u64("INSTALYTICS_SEARCH_RATE_LIMIT_WINDOW_SECS", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        rapidapi_key,
        rapidapi_host,
        rapidapi_timeout_secs,
        rapidapi_max_retries,
        rapidapi_retry_backoff_base_ms,
        allowed_origins,
        suggestions_path,
        proxy_url,
        api_rate_limit_max,
        api_rate_limit_window_secs,
        search_rate_limit_max,
        search_rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// Splits a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
