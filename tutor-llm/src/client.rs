//! Text provider adapters: Gemini and OpenAI-compatible backends.
//!
//! Each adapter performs exactly one HTTP call per request and translates
//! every failure into a [`ServiceError`] before returning.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};
use tutor_core::config::GenerationConfig;
use tutor_core::{Provider, ServiceError};

use crate::error::{body_failure, http_failure, transport_failure};
use crate::types::GenerationRequest;

/// A generative-text backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Which provider this adapter talks to.
    fn kind(&self) -> Provider;

    /// Send one request and return the raw generated text.
    ///
    /// # Errors
    /// Returns a classified [`ServiceError`]; never retries.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ServiceError>;
}

fn build_http_client() -> Result<Client, ServiceError> {
    Client::builder()
        .build()
        .map_err(|e| ServiceError::Config(format!("could not build HTTP client: {e}")))
}

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Send a prepared request and return the JSON body of a 2xx response.
async fn send_json(
    provider: Provider,
    builder: reqwest::RequestBuilder,
    request: &GenerationRequest,
) -> Result<Value, ServiceError> {
    let builder = match request.timeout {
        Some(timeout) => builder.timeout(timeout),
        None => builder,
    };

    let start = Instant::now();
    let response = builder.send().await.map_err(|e| {
        warn!(provider = %provider, error = %e, "Request failed before a response arrived");
        transport_failure(&e)
    })?;
    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let err = http_failure(status.as_u16(), &body);
        warn!(
            provider = %provider,
            status = status.as_u16(),
            kind = %err.kind(),
            latency_ms,
            "Provider returned an error"
        );
        return Err(err);
    }

    debug!(provider = %provider, latency_ms, "Provider responded");
    let bytes = response.bytes().await.map_err(|e| {
        warn!(provider = %provider, error = %e, "Response body could not be read");
        body_failure(&e, |e| {
            ServiceError::MalformedResponse(format!("unreadable {provider} body: {e}"))
        })
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::MalformedResponse(format!("unreadable {provider} body: {e}")))
}

/// Google Gemini `generateContent` adapter.
pub struct GeminiProvider {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    /// Create an adapter.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: build_http_client()?,
            base_url: trim_base(base_url),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Create an adapter from the generation settings.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be built.
    pub fn from_config(config: &GenerationConfig, api_key: &str) -> Result<Self, ServiceError> {
        Self::new(&config.gemini_base_url, config.gemini_model.clone(), api_key)
    }

    fn body(request: &GenerationRequest) -> Value {
        let mut generation_config = json!({
            "temperature": request.temperature,
            "maxOutputTokens": request.max_output_tokens,
        });
        if request.json_mode {
            generation_config["responseMimeType"] = json!("application/json");
        }
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
            "generationConfig": generation_config,
        })
    }
}

/// Concatenated text parts of the first candidate.
#[must_use]
pub fn gemini_text(body: &Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    (!text.is_empty()).then_some(text)
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn kind(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ServiceError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, prompt_chars = request.prompt.len(), "Calling Gemini");

        let builder = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::body(request));
        let body = send_json(Provider::Gemini, builder, request).await?;

        gemini_text(&body).ok_or_else(|| {
            let reason = body["promptFeedback"]["blockReason"]
                .as_str()
                .map_or_else(|| "no candidate text".to_string(), |r| format!("blocked: {r}"));
            ServiceError::MalformedResponse(format!("Gemini response has {reason}"))
        })
    }
}

/// OpenAI-compatible chat completions adapter.
pub struct OpenAiProvider {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiProvider {
    /// Create an adapter.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ServiceError> {
        Ok(Self {
            http: build_http_client()?,
            base_url: trim_base(base_url),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Create an adapter from the generation settings.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be built.
    pub fn from_config(config: &GenerationConfig, api_key: &str) -> Result<Self, ServiceError> {
        Self::new(&config.openai_base_url, config.openai_model.clone(), api_key)
    }

    fn body(&self, request: &GenerationRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "max_tokens": request.max_output_tokens,
            "temperature": request.temperature,
        });
        if request.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }
}

/// Content of the first choice's message.
#[must_use]
pub fn openai_text(body: &Value) -> Option<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(ToString::to_string)
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn kind(&self) -> Provider {
        Provider::OpenAi
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ServiceError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(model = %self.model, prompt_chars = request.prompt.len(), "Calling OpenAI");

        let builder = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.body(request));
        let body = send_json(Provider::OpenAi, builder, request).await?;

        openai_text(&body).ok_or_else(|| {
            ServiceError::MalformedResponse("OpenAI response has no message content".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_parts_are_concatenated() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        });
        assert_eq!(gemini_text(&body).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn gemini_without_candidates_has_no_text() {
        assert!(gemini_text(&json!({ "promptFeedback": { "blockReason": "SAFETY" } })).is_none());
        assert!(gemini_text(&json!({ "candidates": [] })).is_none());
    }

    #[test]
    fn gemini_body_requests_json() {
        let req = GenerationRequest::new("hello");
        let body = GeminiProvider::body(&req);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");

        let mut plain = GenerationRequest::new("hello");
        plain.json_mode = false;
        assert!(GeminiProvider::body(&plain)["generationConfig"]["responseMimeType"].is_null());
    }

    #[test]
    fn openai_body_and_text() {
        let provider = OpenAiProvider::new("https://api.example.com/", "m", "k")
            .expect("client builds");
        assert_eq!(provider.base_url, "https://api.example.com");
        let body = provider.body(&GenerationRequest::new("hi"));
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["model"], "m");

        let reply = json!({ "choices": [{ "message": { "content": "{}" } }] });
        assert_eq!(openai_text(&reply).as_deref(), Some("{}"));
        assert!(openai_text(&json!({ "choices": [] })).is_none());
    }
}
