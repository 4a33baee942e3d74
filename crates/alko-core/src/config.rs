use std::env::VarError;

use crate::app_config::AppConfig;
use crate::cities::{city_id, DEFAULT_CITY};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the city is unknown.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    load_app_config_with_overrides(&[])
}

/// Like [`load_app_config`], but each `(var, value)` in `overrides` wins over
/// the environment, so a command-line flag replaces a bad env value instead of
/// failing on it.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the city is unknown.
pub fn load_app_config_with_overrides(
    overrides: &[(&str, &str)],
) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(overriding(overrides, |key| std::env::var(key)))
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the city is unknown.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Wraps `lookup` so that keys present in `overrides` resolve to their override.
fn overriding<'a, F>(
    overrides: &'a [(&'a str, &'a str)],
    lookup: F,
) -> impl Fn(&str) -> Result<String, VarError> + 'a
where
    F: Fn(&str) -> Result<String, VarError> + 'a,
{
    move |key| match overrides.iter().find(|(var, _)| *var == key) {
        Some((_, value)) => Ok((*value).to_string()),
        None => lookup(key),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let base_url = or_default("ALKO_BASE_URL", "https://alkoteka.com")
        .trim_end_matches('/')
        .to_string();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(
            "ALKO_BASE_URL",
            format!("\"{base_url}\" must start with http:// or https://"),
        ));
    }

    let city_name = or_default("ALKO_CITY", DEFAULT_CITY).trim().to_string();
    let city_id = city_id(&city_name)
        .ok_or_else(|| invalid("ALKO_CITY", format!("unknown city \"{city_name}\"")))?
        .to_string();

    let categories_path = PathBuf::from(or_default("ALKO_CATEGORIES_PATH", "./input_urls.txt"));
    let proxies_path = PathBuf::from(or_default("ALKO_PROXIES_PATH", "./proxy_http_ip.txt"));
    let output_path = PathBuf::from(or_default("ALKO_OUTPUT_PATH", "./result.json"));
    let log_level = or_default("ALKO_LOG_LEVEL", "info");
    let user_agent = or_default("ALKO_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_u64("ALKO_REQUEST_TIMEOUT_SECS", "30")?;
    let max_concurrent_requests = parse_usize("ALKO_MAX_CONCURRENT_REQUESTS", "10")?;
    if max_concurrent_requests == 0 {
        return Err(invalid(
            "ALKO_MAX_CONCURRENT_REQUESTS",
            "must be at least 1".to_string(),
        ));
    }
    let inter_request_delay_ms = parse_u64("ALKO_INTER_REQUEST_DELAY_MS", "200")?;
    let max_attempts = parse_u32("ALKO_MAX_ATTEMPTS", "3")?;
    if max_attempts == 0 {
        return Err(invalid("ALKO_MAX_ATTEMPTS", "must be at least 1".to_string()));
    }
    let backoff_initial_secs = parse_u64("ALKO_BACKOFF_INITIAL_SECS", "3")?;
    let backoff_step_secs = parse_u64("ALKO_BACKOFF_STEP_SECS", "3")?;
    let listing_page_size = parse_u32("ALKO_LISTING_PAGE_SIZE", "10000")?;

    let proxy_login = lookup("ALKO_PROXY_LOGIN").ok().filter(|s| !s.is_empty());
    let proxy_password = lookup("ALKO_PROXY_PASSWORD").ok().filter(|s| !s.is_empty());

    Ok(AppConfig {
        base_url,
        city_name,
        city_id,
        categories_path,
        proxies_path,
        output_path,
        log_level,
        user_agent,
        request_timeout_secs,
        max_concurrent_requests,
        inter_request_delay_ms,
        max_attempts,
        backoff_initial_secs,
        backoff_step_secs,
        listing_page_size,
        proxy_login,
        proxy_password,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
