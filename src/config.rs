//! Configuration Module
//!
//! Loads gateway and API client settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default upstream backend
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Gateway and client configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the tutor backend
    pub api_base_url: String,
    /// Gateway HTTP port
    pub server_port: u16,
    /// Maximum number of cached responses
    pub max_entries: usize,
    /// TTL in milliseconds for cached chat responses
    pub default_ttl_ms: u64,
    /// TTL in milliseconds for cached image analyses
    pub image_ttl_ms: u64,
    /// Background cleanup interval in seconds
    pub cleanup_interval: u64,
    /// Upstream request timeout in seconds
    pub request_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Tutor backend base URL (default: http://localhost:8000)
    /// - `SERVER_PORT` - Gateway port (default: 3000)
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL_MS` - Chat response TTL (default: 300000)
    /// - `IMAGE_TTL_MS` - Image analysis TTL (default: 1800000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `REQUEST_TIMEOUT` - Upstream timeout in seconds (default: 120)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl_ms: parse_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            image_ttl_ms: parse_var("IMAGE_TTL_MS").unwrap_or(defaults.image_ttl_ms),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            request_timeout: parse_var("REQUEST_TIMEOUT").unwrap_or(defaults.request_timeout),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn image_ttl(&self) -> Duration {
        Duration::from_millis(self.image_ttl_ms)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            server_port: 3000,
            max_entries: crate::cache::DEFAULT_MAX_ENTRIES,
            default_ttl_ms: crate::cache::DEFAULT_TTL.as_millis() as u64,
            image_ttl_ms: crate::cache::IMAGE_TTL.as_millis() as u64,
            cleanup_interval: 60,
            request_timeout: 120,
        }
    }
}
