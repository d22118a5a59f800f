//! Gemini client and analysis flow configuration.

use std::time::Duration;

use crate::error::{GeminiError, GeminiResult};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Models tried in order until one answers.
pub const DEFAULT_MODELS: [&str; 3] = ["gemini-2.5-flash", "gemini-2.5-flash-lite", "gemini-2.5-pro"];

/// Gemini client configuration.
///
/// Built once at startup and handed to [`crate::GeminiClient::new`]; the
/// client never reads the environment itself.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent with every request
    pub api_key: String,
    /// API origin, overridable for tests and proxies
    pub base_url: String,
    /// Model fallback order
    pub models: Vec<String>,
    /// Per-request HTTP timeout (video uploads are slow)
    pub request_timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a config with default endpoint and models.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Create config from environment variables.
    ///
    /// `GEMINI_API_KEY` is required.
    pub fn from_env() -> GeminiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GeminiError::config("GEMINI_API_KEY not set"))?;

        let mut config = Self::new(api_key);

        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(models) = std::env::var("GEMINI_MODELS") {
            let models: Vec<String> = models
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            if !models.is_empty() {
                config.models = models;
            }
        }
        config.request_timeout = Duration::from_secs(
            std::env::var("GEMINI_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
        );

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }
}

/// Analysis flow configuration.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Upper bound on one analysis, so the progress state never runs forever
    pub timeout: Duration,
    /// Simulated progress tick
    pub progress_interval: Duration,
    /// Percent added per tick
    pub progress_step: u8,
    /// Simulated progress stops here until the analysis finishes
    pub progress_cap: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(180),
            progress_interval: Duration::from_millis(500),
            progress_step: 5,
            progress_cap: 95,
        }
    }
}

impl AnalysisConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: std::env::var("ANALYSIS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GeminiConfig::new("super-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("gemini-2.5-flash"));
    }

    #[test]
    fn test_builders() {
        let config = GeminiConfig::new("k")
            .with_base_url("http://127.0.0.1:9999")
            .with_models(["only-model"]);
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.models, vec!["only-model".to_string()]);
    }

    #[test]
    fn test_analysis_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.progress_step, 5);
        assert_eq!(config.progress_cap, 95);
        assert_eq!(config.progress_interval, Duration::from_millis(500));
    }
}
