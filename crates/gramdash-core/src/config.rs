use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let api_base_url = require("GRAMDASH_API_BASE_URL")?;
    let api_token = lookup("GRAMDASH_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());

    let env = parse_environment(&or_default("GRAMDASH_ENV", "development"));
    let log_level = or_default("GRAMDASH_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("GRAMDASH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("GRAMDASH_USER_AGENT", "gramdash/0.1 (sanitation-dashboard)");

    let geo_page_limit = parse_u32("GRAMDASH_GEO_PAGE_LIMIT", "100")?;
    if geo_page_limit == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "GRAMDASH_GEO_PAGE_LIMIT".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let complaints_limit = parse_u32("GRAMDASH_COMPLAINTS_LIMIT", "500")?;
    let state_name = or_default("GRAMDASH_STATE_NAME", "Rajasthan");

    Ok(AppConfig {
        api_base_url,
        api_token,
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        geo_page_limit,
        complaints_limit,
        state_name,
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
