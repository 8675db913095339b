//! Error types for Tutor.
//!
//! Every remote call (content generation, video lookup) reports failures
//! through [`ServiceError`]. Provider-specific error shapes are translated
//! into it at the adapter boundary with the `classify_*` helpers below, so
//! nothing provider-specific escapes the client crates.

use std::fmt;

use thiserror::Error;

/// Coarse failure category, used for logging and user-facing guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Missing credential or an uninitialisable provider.
    Config,
    /// Rate limit or quota exhaustion.
    QuotaExceeded,
    /// Invalid credential or permission denied.
    Auth,
    /// Transport-level failure (timeout, connection refused).
    Network,
    /// Response text could not be parsed into a learning pack.
    MalformedResponse,
    /// A provider-reported error with a known reason.
    Provider,
    /// Anything else a provider threw at us.
    UnknownProvider,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Config => "config_error",
            Self::QuotaExceeded => "quota_exceeded",
            Self::Auth => "auth_error",
            Self::Network => "network_error",
            Self::MalformedResponse => "malformed_response",
            Self::Provider => "provider_error",
            Self::UnknownProvider => "unknown_provider_error",
        };
        f.write_str(name)
    }
}

/// Failure of a remote call, carrying a diagnostic detail string.
///
/// The detail is meant for logs. Show [`ServiceError::user_message`] to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Required credential absent, or provider could not be initialised.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider signalled rate limiting or quota exhaustion.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Provider rejected the credential.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Timeout or connection failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The response could not be parsed into a learning pack.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Provider returned an error with an identifiable reason.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Any other provider failure, wrapped with the original message.
    #[error("Unknown provider error: {0}")]
    UnknownProvider(String),
}

impl ServiceError {
    /// The failure category.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Config(_) => FailureKind::Config,
            Self::QuotaExceeded(_) => FailureKind::QuotaExceeded,
            Self::Auth(_) => FailureKind::Auth,
            Self::Network(_) => FailureKind::Network,
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
            Self::Provider(_) => FailureKind::Provider,
            Self::UnknownProvider(_) => FailureKind::UnknownProvider,
        }
    }

    /// Diagnostic detail (provider message, reason code, missing variable).
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Config(d)
            | Self::QuotaExceeded(d)
            | Self::Auth(d)
            | Self::Network(d)
            | Self::MalformedResponse(d)
            | Self::Provider(d)
            | Self::UnknownProvider(d) => d,
        }
    }

    /// Actionable text for the user. Never includes raw provider output.
    #[must_use]
    pub fn user_message(&self, service: &str) -> String {
        match self {
            Self::Config(detail) => format!("{service} is not configured: {detail}"),
            Self::QuotaExceeded(_) => format!(
                "{service} quota or rate limit exceeded. Wait a minute and retry, or switch to another API key or provider."
            ),
            Self::Auth(_) => format!(
                "{service} rejected the API key. Check that the key is valid and has access to this API."
            ),
            Self::Network(_) => format!(
                "Could not reach {service}. Check your network connection and retry."
            ),
            Self::MalformedResponse(_) => format!(
                "{service} returned a response that could not be read. Please retry."
            ),
            Self::Provider(reason) => format!("{service} returned an error ({reason})."),
            Self::UnknownProvider(_) => format!("{service} request failed unexpectedly. Please retry."),
        }
    }
}

/// Classify a generative-text provider failure from its status and error text.
///
/// Substring matching on the lower-cased text, because providers disagree on
/// error shapes. `status` is the HTTP status when one was received.
#[must_use]
pub fn classify_generation_failure(status: Option<u16>, message: &str) -> ServiceError {
    let lowered = message.to_lowercase();
    let detail = if message.trim().is_empty() {
        status.map_or_else(|| "empty error message".to_string(), |s| format!("HTTP {s}"))
    } else {
        message.trim().to_string()
    };

    if status == Some(429) || is_quota_text(&lowered) {
        return ServiceError::QuotaExceeded(detail);
    }
    if matches!(status, Some(401 | 403)) || is_auth_text(&lowered) {
        return ServiceError::Auth(detail);
    }
    if ["network", "connection", "timeout", "timed out"]
        .iter()
        .any(|needle| lowered.contains(needle))
    {
        return ServiceError::Network(detail);
    }
    ServiceError::UnknownProvider(detail)
}

/// Classify a video-search failure from the extracted reason code or message.
#[must_use]
pub fn classify_video_failure(reason_or_message: &str) -> ServiceError {
    let lowered = reason_or_message.to_lowercase();
    let reason = reason_or_message.trim().to_string();

    if lowered.contains("quota") {
        ServiceError::QuotaExceeded(reason)
    } else if ["keyinvalid", "invalid key", "api key"]
        .iter()
        .any(|needle| lowered.contains(needle))
    {
        ServiceError::Auth(reason)
    } else {
        ServiceError::Provider(reason)
    }
}

// "rate" alone would match "generate", so only the compound spellings count.
fn is_quota_text(lowered: &str) -> bool {
    [
        "quota",
        "rate limit",
        "ratelimit",
        "rate_limit",
        "rate-limit",
        "resource_exhausted",
        "too many requests",
        "429",
    ]
    .iter()
    .any(|needle| lowered.contains(needle))
}

fn is_auth_text(lowered: &str) -> bool {
    [
        "api key",
        "api_key",
        "invalid key",
        "permission",
        "unauthorized",
        "unauthenticated",
    ]
    .iter()
    .any(|needle| lowered.contains(needle))
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML was invalid or had wrongly-typed values.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("Invalid configuration value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_detected_from_status_or_text() {
        assert_eq!(
            classify_generation_failure(Some(429), "slow down").kind(),
            FailureKind::QuotaExceeded
        );
        assert_eq!(
            classify_generation_failure(Some(400), "Resource has been exhausted (e.g. check quota).").kind(),
            FailureKind::QuotaExceeded
        );
        assert_eq!(
            classify_generation_failure(None, "Rate limit reached for gpt-4.1-mini").kind(),
            FailureKind::QuotaExceeded
        );
    }

    #[test]
    fn generate_in_message_is_not_a_rate_limit() {
        let err = classify_generation_failure(Some(500), "failed to generate content");
        assert_eq!(err.kind(), FailureKind::UnknownProvider);
        assert_eq!(err.detail(), "failed to generate content");
    }

    #[test]
    fn auth_detected() {
        assert_eq!(
            classify_generation_failure(Some(400), "API key not valid. Please pass a valid API key.").kind(),
            FailureKind::Auth
        );
        assert_eq!(
            classify_generation_failure(Some(403), "").kind(),
            FailureKind::Auth
        );
        assert_eq!(
            classify_generation_failure(None, "Permission denied on resource").kind(),
            FailureKind::Auth
        );
    }

    #[test]
    fn network_detected_from_text() {
        assert_eq!(
            classify_generation_failure(None, "connection reset by peer").kind(),
            FailureKind::Network
        );
        assert_eq!(
            classify_generation_failure(None, "operation timed out").kind(),
            FailureKind::Network
        );
    }

    #[test]
    fn empty_message_falls_back_to_status() {
        let err = classify_generation_failure(Some(502), "  ");
        assert_eq!(err, ServiceError::UnknownProvider("HTTP 502".into()));
    }

    #[test]
    fn video_reasons() {
        assert_eq!(classify_video_failure("quotaExceeded").kind(), FailureKind::QuotaExceeded);
        assert_eq!(classify_video_failure("keyInvalid").kind(), FailureKind::Auth);
        assert_eq!(
            classify_video_failure("API key not valid. Please pass a valid API key.").kind(),
            FailureKind::Auth
        );
        let other = classify_video_failure("backendError");
        assert_eq!(other, ServiceError::Provider("backendError".into()));
    }

    #[test]
    fn user_messages_are_actionable_and_hide_details() {
        let quota = ServiceError::QuotaExceeded("raw provider blob".into());
        let msg = quota.user_message("Gemini");
        assert!(msg.contains("retry"));
        assert!(!msg.contains("raw provider blob"));

        let auth = ServiceError::Auth("x".into()).user_message("YouTube");
        assert!(auth.contains("API key"));

        let config = ServiceError::Config("set GEMINI_API_KEY".into()).user_message("Gemini");
        assert!(config.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(FailureKind::UnknownProvider.to_string(), "unknown_provider_error");
        assert_eq!(FailureKind::Auth.to_string(), "auth_error");
    }
}
