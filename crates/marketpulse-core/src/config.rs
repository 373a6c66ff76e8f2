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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let classifier_url = require("MARKETPULSE_CLASSIFIER_URL")?;

    let env = parse_environment(&or_default("MARKETPULSE_ENV", "development"));
    let bind_addr = parse_addr("MARKETPULSE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MARKETPULSE_LOG_LEVEL", "info");
    let user_agent = or_default(
        "MARKETPULSE_USER_AGENT",
        "marketpulse/0.1 (news-sentiment)",
    );

    let request_timeout_secs = parse_u64("MARKETPULSE_REQUEST_TIMEOUT_SECS", "10")?;
    let resolve_timeout_secs = parse_u64("MARKETPULSE_RESOLVE_TIMEOUT_SECS", "5")?;
    let articles_per_query = parse_usize("MARKETPULSE_ARTICLES_PER_QUERY", "5")?;
    let max_workers = parse_usize("MARKETPULSE_MAX_WORKERS", "5")?;
    let min_content_length = parse_usize("MARKETPULSE_MIN_CONTENT_LENGTH", "100")?;
    let max_text_length = parse_usize("MARKETPULSE_MAX_TEXT_LENGTH", "512")?;
    let analysis_timeout_secs = parse_u64("MARKETPULSE_ANALYSIS_TIMEOUT_SECS", "60")?;
    let cache_ttl_secs = parse_u64("MARKETPULSE_CACHE_TTL_SECS", "3600")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        classifier_url,
        user_agent,
        request_timeout_secs,
        resolve_timeout_secs,
        articles_per_query,
        max_workers,
        min_content_length,
        max_text_length,
        analysis_timeout_secs,
        cache_ttl_secs,
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

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("MARKETPULSE_CLASSIFIER_URL", "http://localhost:8085");
        m
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_fails_without_classifier_url() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "MARKETPULSE_CLASSIFIER_URL"),
            "expected MissingEnvVar(MARKETPULSE_CLASSIFIER_URL), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_applies_defaults() {
        let map = full_env();
        let config = build_app_config(lookup_from_map(&map)).expect("config should build");
        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.resolve_timeout_secs, 5);
        assert_eq!(config.articles_per_query, 5);
        assert_eq!(config.max_workers, 5);
        assert_eq!(config.min_content_length, 100);
        assert_eq!(config.max_text_length, 512);
        assert_eq!(config.analysis_timeout_secs, 60);
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = full_env();
        map.insert("MARKETPULSE_ENV", "production");
        map.insert("MARKETPULSE_MAX_WORKERS", "2");
        map.insert("MARKETPULSE_ANALYSIS_TIMEOUT_SECS", "30");
        let config = build_app_config(lookup_from_map(&map)).expect("config should build");
        assert_eq!(config.env, Environment::Production);
        assert_eq!(config.max_workers, 2);
        assert_eq!(config.analysis_timeout_secs, 30);
    }

    #[test]
    fn build_app_config_rejects_non_numeric_timeout() {
        let mut map = full_env();
        map.insert("MARKETPULSE_REQUEST_TIMEOUT_SECS", "fast");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MARKETPULSE_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_bad_bind_addr() {
        let mut map = full_env();
        map.insert("MARKETPULSE_BIND_ADDR", "not-an-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MARKETPULSE_BIND_ADDR"),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }
}
