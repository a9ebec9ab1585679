use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::engagement::EngagementThresholds;
use crate::ConfigError;

/// Upper bound `search.list` accepts for `maxResults`.
const MAX_SEARCH_RESULTS: u32 = 50;

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
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    // Empty values count as unset, matching how shells export blank keys.
    let non_empty = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        non_empty(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { non_empty(var).unwrap_or_else(|| default.to_string()) };

    let youtube_api_key = require("YOUTUBE_API_KEY")?;
    let openrouter_api_key = non_empty("OPENROUTER_API_KEY");
    let openrouter_model = or_default("OPENROUTER_MODEL", "deepseek/deepseek-chat");
    let openrouter_base_url = or_default("OPENROUTER_BASE_URL", "https://openrouter.ai/api/v1");

    let sheets_credentials_file =
        PathBuf::from(or_default("GOOGLE_SHEETS_CREDENTIALS_FILE", "credentials.json"));
    let sheets_spreadsheet_id = or_default("GOOGLE_SHEETS_SPREADSHEET_ID", "");
    let sheets_sheet_name = or_default("GOOGLE_SHEETS_SHEET_NAME", "Sheet1");

    let search_days = parse_var::<u32>(&or_default("YTSCOUT_SEARCH_DAYS", "7"), "YTSCOUT_SEARCH_DAYS")?;
    let max_results = parse_var::<u32>(&or_default("YTSCOUT_MAX_RESULTS", "50"), "YTSCOUT_MAX_RESULTS")?;
    if max_results > MAX_SEARCH_RESULTS {
        return Err(ConfigError::InvalidEnvVar {
            var: "YTSCOUT_MAX_RESULTS".to_string(),
            reason: format!("search returns at most {MAX_SEARCH_RESULTS} results, got {max_results}"),
        });
    }
    let min_views = parse_var::<u64>(&or_default("YTSCOUT_MIN_VIEWS", "1000"), "YTSCOUT_MIN_VIEWS")?;
    let min_like_ratio = parse_ratio(
        &or_default("YTSCOUT_MIN_LIKE_RATIO", "0.05"),
        "YTSCOUT_MIN_LIKE_RATIO",
    )?;
    let min_comment_ratio = parse_ratio(
        &or_default("YTSCOUT_MIN_COMMENT_RATIO", "0.002"),
        "YTSCOUT_MIN_COMMENT_RATIO",
    )?;
    let request_timeout_secs = parse_var::<u64>(
        &or_default("YTSCOUT_REQUEST_TIMEOUT_SECS", "30"),
        "YTSCOUT_REQUEST_TIMEOUT_SECS",
    )?;
    let log_level = or_default("YTSCOUT_LOG_LEVEL", "info");

    Ok(AppConfig {
        youtube_api_key,
        openrouter_api_key,
        openrouter_model,
        openrouter_base_url,
        sheets_credentials_file,
        sheets_spreadsheet_id,
        sheets_sheet_name,
        search_days,
        max_results,
        thresholds: EngagementThresholds {
            min_like_ratio,
            min_comment_ratio,
            min_views,
        },
        request_timeout_secs,
        log_level,
    })
}

fn parse_var<T>(raw: &str, var: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a non-negative, finite ratio such as `0.05`.
fn parse_ratio(raw: &str, var: &str) -> Result<f64, ConfigError> {
    let value = parse_var::<f64>(raw, var)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a non-negative ratio, got {raw}"),
        });
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
