//! HTTP-level failure translation.
//!
//! Adapters call these helpers so that `reqwest` errors and provider error
//! bodies become [`ServiceError`]s before leaving the crate.

use serde_json::Value;
use tutor_core::error::{ServiceError, classify_generation_failure};

/// Longest provider message kept for diagnostics.
const MAX_DETAIL_CHARS: usize = 300;

/// Classify a transport failure (no HTTP response was received).
#[must_use]
pub fn transport_failure(err: &reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::Network(format!("request timed out: {err}"))
    } else if err.is_connect() {
        ServiceError::Network(format!("connection failed: {err}"))
    } else if err.is_builder() {
        ServiceError::Config(format!("could not build request: {err}"))
    } else {
        ServiceError::UnknownProvider(err.to_string())
    }
}

/// Classify a failure while reading a response body.
///
/// The client timeout also covers the body, so a stalled or dropped transfer
/// is a transport failure; anything else is handed to `otherwise`.
#[must_use]
pub fn body_failure(
    err: &reqwest::Error,
    otherwise: impl FnOnce(String) -> ServiceError,
) -> ServiceError {
    if err.is_timeout() || err.is_connect() {
        transport_failure(err)
    } else {
        otherwise(err.to_string())
    }
}

/// Classify a non-success response from a generative-text provider.
#[must_use]
pub fn http_failure(status: u16, body: &str) -> ServiceError {
    classify_generation_failure(Some(status), &provider_error_message(body))
}

/// Pull a readable message out of a provider error body.
///
/// Gemini and OpenAI both nest it under `error`; Gemini adds a `status`
/// (`RESOURCE_EXHAUSTED`, `PERMISSION_DENIED`), OpenAI a `code`
/// (`insufficient_quota`, `invalid_api_key`). Both are kept as a prefix
/// because they classify more reliably than the prose.
#[must_use]
pub fn provider_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let structured = parsed.as_ref().and_then(|json| {
        let error = json.get("error")?;
        if let Some(text) = error.as_str() {
            return Some(text.to_string());
        }
        let message = error.get("message").and_then(Value::as_str).unwrap_or("");
        let code = error
            .get("status")
            .or_else(|| error.get("code"))
            .and_then(Value::as_str);
        match code {
            Some(code) if !message.is_empty() => Some(format!("{code}: {message}")),
            Some(code) => Some(code.to_string()),
            None if !message.is_empty() => Some(message.to_string()),
            None => None,
        }
    });

    let text = structured.unwrap_or_else(|| body.trim().to_string());
    truncate(&text)
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_DETAIL_CHARS).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::FailureKind;

    #[test]
    fn gemini_quota_body() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            provider_error_message(body),
            "RESOURCE_EXHAUSTED: Resource has been exhausted"
        );
        assert_eq!(http_failure(429, body).kind(), FailureKind::QuotaExceeded);
    }

    #[test]
    fn gemini_bad_key_body() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(http_failure(400, body).kind(), FailureKind::Auth);
    }

    #[test]
    fn openai_quota_code_classifies_even_on_other_status() {
        let body = r#"{"error": {"message": "You exceeded your current plan.", "type": "insufficient_quota", "code": "insufficient_quota"}}"#;
        assert_eq!(http_failure(400, body).kind(), FailureKind::QuotaExceeded);
    }

    #[test]
    fn openai_invalid_key() {
        let body = r#"{"error": {"message": "Incorrect API key provided: sk-****.", "code": "invalid_api_key"}}"#;
        assert_eq!(http_failure(401, body).kind(), FailureKind::Auth);
    }

    #[test]
    fn plain_text_body_is_kept() {
        assert_eq!(provider_error_message("  upstream exploded \n"), "upstream exploded");
        let err = http_failure(500, "upstream exploded");
        assert_eq!(err, ServiceError::UnknownProvider("upstream exploded".into()));
    }

    #[test]
    fn string_error_field() {
        assert_eq!(provider_error_message(r#"{"error": "model overloaded"}"#), "model overloaded");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let msg = provider_error_message(&body);
        assert_eq!(msg.chars().count(), MAX_DETAIL_CHARS + 1);
        assert!(msg.ends_with('…'));
    }
}
