//! Request type shared by every text provider.

use std::time::Duration;

use tutor_core::config::GenerationConfig;

/// A request to a generative-text provider.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Full prompt text.
    pub prompt: String,
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_output_tokens: u32,
    /// Ask for a JSON response body where the provider supports it.
    pub json_mode: bool,
    /// Request timeout. `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

impl GenerationRequest {
    /// Create a request with the default low temperature and JSON mode on.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        let defaults = GenerationConfig::default();
        Self {
            prompt: prompt.into(),
            temperature: defaults.temperature,
            max_output_tokens: defaults.max_output_tokens,
            json_mode: true,
            timeout: None,
        }
    }

    /// Create a request using the sampling settings from configuration.
    #[must_use]
    pub fn from_config(prompt: impl Into<String>, config: &GenerationConfig) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            json_mode: config.json_mode,
            timeout: config.request_timeout(),
        }
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_favour_determinism() {
        let req = GenerationRequest::new("p");
        assert!(req.temperature <= 0.3 + f32::EPSILON);
        assert!(req.json_mode);
        assert!(req.timeout.is_none());
    }

    #[test]
    fn config_values_are_carried() {
        let config = GenerationConfig {
            temperature: 0.1,
            max_output_tokens: 800,
            json_mode: false,
            request_timeout_ms: Some(15_000),
            ..GenerationConfig::default()
        };
        let req = GenerationRequest::from_config("p", &config);
        assert_eq!(req.max_output_tokens, 800);
        assert!(!req.json_mode);
        assert_eq!(req.timeout, Some(Duration::from_secs(15)));
    }
}
