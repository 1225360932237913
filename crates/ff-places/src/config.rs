//! Environment-driven configuration.

use std::{env::VarError, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::{
    constants::{API_KEY_ENV_VAR, DEFAULT_OUTPUT_PATH, DEFAULT_PAGE_DELAY, DEFAULT_REQUEST_TIMEOUT},
    ApiKey,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `None` when unset or blank. Callers decide whether that is fatal.
    pub api_key: Option<ApiKey>,
    pub output_path: PathBuf,
    pub request_timeout: Duration,
    pub page_delay: Duration,
    pub log_level: String,
}

/// Load configuration, reading a `.env` file first if one exists.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load configuration from the process environment only.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let api_key = lookup(API_KEY_ENV_VAR)
        .ok()
        .and_then(|key| ApiKey::from_raw(&key));
    let output_path = PathBuf::from(or_default("FOODFINDER_OUTPUT_PATH", DEFAULT_OUTPUT_PATH));
    let request_timeout_secs = parse_u64(
        "FOODFINDER_REQUEST_TIMEOUT_SECS",
        &DEFAULT_REQUEST_TIMEOUT.as_secs().to_string(),
    )?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOODFINDER_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    let page_delay_ms = parse_u64(
        "FOODFINDER_PAGE_DELAY_MS",
        &DEFAULT_PAGE_DELAY.as_millis().to_string(),
    )?;
    let log_level = or_default("FOODFINDER_LOG_LEVEL", "info");

    Ok(AppConfig {
        api_key,
        output_path,
        request_timeout: Duration::from_secs(request_timeout_secs),
        page_delay: Duration::from_millis(page_delay_ms),
        log_level,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

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

    #[test]
    fn defaults_when_unset() {
        let map = HashMap::new();

        let config = build_app_config(lookup_from_map(&map)).unwrap();

        assert!(config.api_key.is_none());
        assert_eq!(config.output_path, PathBuf::from("results.json"));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.page_delay, DEFAULT_PAGE_DELAY);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn reads_overrides() {
        let map = HashMap::from([
            ("GOOGLE_PLACES_API_KEY", "fake-api-key"),
            ("FOODFINDER_OUTPUT_PATH", "/tmp/out.json"),
            ("FOODFINDER_REQUEST_TIMEOUT_SECS", "3"),
            ("FOODFINDER_PAGE_DELAY_MS", "0"),
            ("FOODFINDER_LOG_LEVEL", "debug"),
        ]);

        let config = build_app_config(lookup_from_map(&map)).unwrap();

        assert_eq!(config.api_key.unwrap().get(), "fake-api-key");
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.json"));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.page_delay, Duration::ZERO);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn blank_api_key_is_unset() {
        let map = HashMap::from([("GOOGLE_PLACES_API_KEY", "  ")]);

        let config = build_app_config(lookup_from_map(&map)).unwrap();

        assert!(config.api_key.is_none());
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let map = HashMap::from([("FOODFINDER_REQUEST_TIMEOUT_SECS", "soon")]);

        let err = build_app_config(lookup_from_map(&map)).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar { ref var, .. } if var == "FOODFINDER_REQUEST_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let map = HashMap::from([("FOODFINDER_REQUEST_TIMEOUT_SECS", "0")]);

        assert!(build_app_config(lookup_from_map(&map)).is_err());
    }

    #[test]
    fn rejects_negative_page_delay() {
        let map = HashMap::from([("FOODFINDER_PAGE_DELAY_MS", "-5")]);

        assert!(build_app_config(lookup_from_map(&map)).is_err());
    }
}
