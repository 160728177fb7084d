//! AI configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for both vision and text calls.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// AI client configuration.
#[derive(Clone)]
pub struct AiConfig {
    /// API key. `None` puts the client in offline mode.
    pub api_key: Option<String>,
    /// Model used to identify dishes from photos.
    pub vision_model: String,
    /// Model used for recipe generation and chat.
    pub text_model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Hard limit on a single model call.
    pub timeout: Duration,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("vision_model", &self.vision_model)
            .field("text_model", &self.text_model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            vision_model: DEFAULT_MODEL.to_string(),
            text_model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `GEMINI_API_KEY`: API key (blank counts as unset)
    /// - `GENIE_VISION_MODEL`: Vision model (default: "gemini-1.5-flash")
    /// - `GENIE_TEXT_MODEL`: Text model (default: "gemini-1.5-flash")
    /// - `GENIE_AI_BASE_URL`: API base URL
    /// - `GENIE_AI_TIMEOUT_SECS`: Request timeout (default: 60)
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let vision_model =
            env::var("GENIE_VISION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let text_model = env::var("GENIE_TEXT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            env::var("GENIE_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("GENIE_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_key,
            vision_model,
            text_model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// True when no API key is configured.
    pub fn is_offline(&self) -> bool {
        self.api_key.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_offline() {
        let config = AiConfig::default();
        assert!(config.is_offline());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AiConfig {
            api_key: Some("super-secret".to_string()),
            ..AiConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
