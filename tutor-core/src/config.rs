//! Configuration for Tutor.
//!
//! Maps directly to `tutor.toml`. Every field has a default, so an empty
//! file (or no file at all) is a valid configuration. API keys are never
//! read from the file; see [`Credentials`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Provider;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Content generation (LLM) settings.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Video lookup settings.
    #[serde(default)]
    pub video: VideoConfig,
    /// Result cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Topic history display settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

impl TutorConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` if the TOML is invalid, or
    /// `ConfigError::Invalid` if a value is out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check value ranges serde cannot express.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::Invalid {
                field: "generation.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.generation.temperature),
            });
        }
        if self.generation.max_output_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "generation.max_output_tokens",
                reason: "must be positive".into(),
            });
        }
        if self.cache.ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "cache.ttl_secs",
                reason: "must be positive".into(),
            });
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "cache.max_entries",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error. `RUST_LOG` overrides it.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Content generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Default provider: "gemini" or "openai".
    #[serde(default)]
    pub provider: Provider,
    /// Gemini model name.
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Gemini API base URL.
    #[serde(default = "default_gemini_url")]
    pub gemini_base_url: String,
    /// OpenAI-compatible model name.
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// OpenAI-compatible API base URL.
    #[serde(default = "default_openai_url")]
    pub openai_base_url: String,
    /// Sampling temperature. Low, favouring reproducible packs.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Upper bound on generated tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Ask the provider for a JSON response body where supported.
    #[serde(default = "default_true")]
    pub json_mode: bool,
    /// Request timeout in milliseconds. Unset uses the HTTP client default.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl GenerationConfig {
    /// The configured timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            gemini_model: default_gemini_model(),
            gemini_base_url: default_gemini_url(),
            openai_model: default_openai_model(),
            openai_base_url: default_openai_url(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            json_mode: true,
            request_timeout_ms: None,
        }
    }
}

/// Video lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Whether to look up a video at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// YouTube Data API base URL.
    #[serde(default = "default_youtube_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_video_timeout")]
    pub timeout_ms: u64,
    /// Add an "educational" qualifier and strict safe-search.
    #[serde(default)]
    pub strict: bool,
}

impl VideoConfig {
    /// The request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_youtube_url(),
            timeout_ms: default_video_timeout(),
            strict: false,
        }
    }
}

/// Result cache settings, shared by both clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a result stays valid, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum cached keys per client.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl CacheConfig {
    /// The TTL as a duration.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

/// Topic history display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// How many recent topics to show.
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            display_limit: default_display_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Gemini key variable.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Accepted fallback for the Gemini key.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// OpenAI key variable.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// YouTube Data API key variable.
pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";

/// Provider API keys. Blank values count as absent.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Gemini key.
    pub gemini: Option<String>,
    /// OpenAI key.
    pub openai: Option<String>,
    /// YouTube Data API key.
    pub youtube: Option<String>,
}

impl Credentials {
    /// Read keys from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read keys through an arbitrary lookup (secrets store, tests).
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            gemini: get(GEMINI_API_KEY).or_else(|| get(GOOGLE_API_KEY)),
            openai: get(OPENAI_API_KEY),
            youtube: get(YOUTUBE_API_KEY),
        }
    }
}

// Keys must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = |v: &Option<String>| if v.is_some() { "available" } else { "missing" };
        f.debug_struct("Credentials")
            .field("gemini", &state(&self.gemini))
            .field("openai", &state(&self.openai))
            .field("youtube", &state(&self.youtube))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_gemini_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_openai_model() -> String {
    "gpt-4.1-mini".to_string()
}
fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_max_output_tokens() -> u32 {
    1200
}
fn default_youtube_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}
fn default_video_timeout() -> u64 {
    20_000
}
fn default_ttl_secs() -> u64 {
    3600
}
fn default_max_entries() -> usize {
    128
}
fn default_display_limit() -> usize {
    10
}
