//! Process-wide configuration.
//!
//! Loaded once at startup from the environment (after `.env` has been read),
//! validated, and then handed by reference to every component that needs it.

use crate::error::{Result, StudioError};
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;
pub const DEFAULT_PROBE_PATTERNS: &[&str] = &["1.5", "flash", "pro"];

const API_KEY_VAR: &str = "GOOGLE_API_KEY";
const BASE_URL_VAR: &str = "GEMINI_API_ENDPOINT";
const MODEL_VAR: &str = "STUDIO_MODEL";
const BIND_ADDR_VAR: &str = "STUDIO_BIND_ADDR";
const TIMEOUT_VAR: &str = "STUDIO_REQUEST_TIMEOUT_SECS";
const MAX_UPLOAD_VAR: &str = "STUDIO_MAX_UPLOAD_MB";
const PROBE_PATTERNS_VAR: &str = "STUDIO_PROBE_PATTERNS";

/// Settings shared by the web front-end and the model discovery tool.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// `None` when the key is unset or blank; callers surface this as a warning.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub bind_addr: SocketAddr,
    /// No timeout unless explicitly configured.
    pub timeout: Option<Duration>,
    pub max_upload_bytes: usize,
    pub probe_patterns: Vec<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            timeout: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            probe_patterns: DEFAULT_PROBE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl StudioConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr: SocketAddr = match value(BIND_ADDR_VAR) {
            Some(raw) => parse_value(BIND_ADDR_VAR, &raw)?,
            None => parse_value(BIND_ADDR_VAR, DEFAULT_BIND_ADDR)?,
        };

        let timeout = value(TIMEOUT_VAR)
            .map(|raw| parse_value::<u64>(TIMEOUT_VAR, &raw))
            .transpose()?
            .map(Duration::from_secs);

        let max_upload_bytes = match value(MAX_UPLOAD_VAR) {
            Some(raw) => {
                let megabytes: usize = parse_value(MAX_UPLOAD_VAR, &raw)?;
                if megabytes == 0 {
                    return Err(StudioError::ConfigError(format!(
                        "{} must be greater than zero",
                        MAX_UPLOAD_VAR
                    )));
                }
                megabytes.checked_mul(1024 * 1024).ok_or_else(|| {
                    StudioError::ConfigError(format!("{} is too large: {}", MAX_UPLOAD_VAR, raw))
                })?
            }
            None => defaults.max_upload_bytes,
        };

        let probe_patterns = match value(PROBE_PATTERNS_VAR) {
            Some(raw) => {
                let patterns: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
                if patterns.is_empty() {
                    return Err(StudioError::ConfigError(format!(
                        "{} must list at least one pattern",
                        PROBE_PATTERNS_VAR
                    )));
                }
                patterns
            }
            None => defaults.probe_patterns,
        };

        Ok(Self {
            api_key: value(API_KEY_VAR),
            base_url: value(BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: value(MODEL_VAR).unwrap_or(defaults.model),
            bind_addr,
            timeout,
            max_upload_bytes,
            probe_patterns,
        })
    }

    pub fn is_api_key_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Name of the environment variable the API key is read from.
    pub fn api_key_var() -> &'static str {
        API_KEY_VAR
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>()
        .map_err(|e| StudioError::ConfigError(format!("{} has invalid value '{}': {}", key, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = StudioConfig::from_lookup(lookup_from(&[])).unwrap();

        assert!(config.api_key.is_none());
        assert!(!config.is_api_key_configured());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8501");
        assert!(config.timeout.is_none());
        assert_eq!(config.max_upload_bytes, 200 * 1024 * 1024);
        assert_eq!(config.probe_patterns, vec!["1.5", "flash", "pro"]);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = StudioConfig::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "   ")])).unwrap();
        assert!(!config.is_api_key_configured());
    }

    #[test]
    fn test_custom_values() {
        let config = StudioConfig::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "secret"),
            ("GEMINI_API_ENDPOINT", "http://localhost:9000/v1beta/"),
            ("STUDIO_MODEL", "models/gemini-1.5-pro"),
            ("STUDIO_BIND_ADDR", "0.0.0.0:3000"),
            ("STUDIO_REQUEST_TIMEOUT_SECS", "45"),
            ("STUDIO_MAX_UPLOAD_MB", "10"),
            ("STUDIO_PROBE_PATTERNS", "flash, lite ,"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url, "http://localhost:9000/v1beta");
        assert_eq!(config.model, "models/gemini-1.5-pro");
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.timeout, Some(Duration::from_secs(45)));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.probe_patterns, vec!["flash", "lite"]);
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result =
            StudioConfig::from_lookup(lookup_from(&[("STUDIO_REQUEST_TIMEOUT_SECS", "soon")]));

        match result {
            Err(StudioError::ConfigError(msg)) => assert!(msg.contains("STUDIO_REQUEST_TIMEOUT_SECS")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_upload_limit_is_rejected() {
        let result = StudioConfig::from_lookup(lookup_from(&[("STUDIO_MAX_UPLOAD_MB", "0")]));
        assert!(matches!(result, Err(StudioError::ConfigError(_))));
    }

    #[test]
    fn test_overflowing_upload_limit_is_rejected() {
        let limit = usize::MAX.to_string();
        let result = StudioConfig::from_lookup(lookup_from(&[("STUDIO_MAX_UPLOAD_MB", limit.as_str())]));

        match result {
            Err(StudioError::ConfigError(msg)) => assert!(msg.contains("too large")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_bind_addr_is_rejected() {
        let result = StudioConfig::from_lookup(lookup_from(&[("STUDIO_BIND_ADDR", "localhost")]));
        assert!(matches!(result, Err(StudioError::ConfigError(_))));
    }

    #[test]
    fn test_probe_patterns_must_not_be_empty() {
        let result = StudioConfig::from_lookup(lookup_from(&[("STUDIO_PROBE_PATTERNS", " , ,")]));
        assert!(matches!(result, Err(StudioError::ConfigError(_))));
    }
}
