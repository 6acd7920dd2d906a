use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

const MAX_SCRAPE_DELAY_SECS: f64 = 3600.0;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but malformed.
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
/// Returns `ConfigError` if a variable is present but malformed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so parsing can be tested with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let scrape_delay_secs = {
        let var = "SCRAPE_DELAY_SECONDS";
        let value = or_default(var, "3")
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || !(0.0..=MAX_SCRAPE_DELAY_SECS).contains(&value) {
            return Err(invalid(
                var,
                format!("must be between 0 and {MAX_SCRAPE_DELAY_SECS} seconds, got {value}"),
            ));
        }
        value
    };

    let request_timeout_secs = parse_u64("REQUEST_TIMEOUT", "15")?;
    if request_timeout_secs == 0 {
        return Err(invalid("REQUEST_TIMEOUT", "must be greater than 0".into()));
    }

    let check_interval_hours = parse_u64("CHECK_INTERVAL_HOURS", "1")?;
    if check_interval_hours == 0 {
        return Err(invalid(
            "CHECK_INTERVAL_HOURS",
            "must be greater than 0".into(),
        ));
    }

    let log_level = or_default("PRICEWATCH_LOG_LEVEL", "info");
    let products_path = PathBuf::from(or_default(
        "PRICEWATCH_PRODUCTS_PATH",
        "./config/products.yaml",
    ));
    let max_concurrent = parse_usize("PRICEWATCH_MAX_CONCURRENT", "2")?.max(1);
    let render_settle_ms = parse_u64("PRICEWATCH_RENDER_SETTLE_MS", "2000")?;
    let browser_enabled = parse_bool("PRICEWATCH_BROWSER_ENABLED", "true")?;
    let chromium_path = lookup("PRICEWATCH_CHROMIUM_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        log_level,
        products_path,
        scrape_delay_secs,
        request_timeout_secs,
        max_concurrent,
        render_settle_ms,
        browser_enabled,
        chromium_path,
        check_interval_hours,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
