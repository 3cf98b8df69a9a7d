use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_STORES_PATH: &str = "./config/stores.yaml";

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

/// Build application configuration from an env-var lookup function, so tests
/// can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default("DLVFEE_ENV", "development"))?;

    let bind_addr = or_default("DLVFEE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("DLVFEE_BIND_ADDR", e.to_string()))?;

    let log_level = or_default("DLVFEE_LOG_LEVEL", "info");

    // Production must point at its registry explicitly rather than whatever
    // happens to sit in the working directory.
    let stores_path = match lookup("DLVFEE_STORES_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) if env == Environment::Production => {
            return Err(ConfigError::MissingEnvVar("DLVFEE_STORES_PATH".to_string()));
        }
        Err(_) => PathBuf::from(DEFAULT_STORES_PATH),
    };

    let legacy_fee_rollback = parse_bool(&or_default("DLVFEE_LEGACY_FEE_ROLLBACK", "false"))
        .ok_or_else(|| {
            invalid(
                "DLVFEE_LEGACY_FEE_ROLLBACK",
                "expected true/false/1/0".to_string(),
            )
        })?;

    let rate_limit_per_minute = or_default("DLVFEE_RATE_LIMIT_PER_MINUTE", "120")
        .parse::<usize>()
        .map_err(|e| invalid("DLVFEE_RATE_LIMIT_PER_MINUTE", e.to_string()))?;
    if rate_limit_per_minute == 0 {
        return Err(invalid(
            "DLVFEE_RATE_LIMIT_PER_MINUTE",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        stores_path,
        legacy_fee_rollback,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DLVFEE_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
