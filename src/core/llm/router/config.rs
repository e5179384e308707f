//! Router Configuration

use std::time::Duration;

/// Configuration for the LLM router
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Request timeout per provider attempt
    pub request_timeout: Duration,
    /// Whether to move on to the next provider after a failure
    pub enable_fallback: bool,
    /// Pause before the next provider after a rate limit
    pub rate_limit_backoff: Duration,
    /// Sampling temperature for requests that do not set their own
    pub default_temperature: Option<f32>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            enable_fallback: true,
            rate_limit_backoff: Duration::from_secs(2),
            default_temperature: None,
        }
    }
}
