//! Content Generation Client.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};
use tutor_core::config::{Credentials, GenerationConfig};
use tutor_core::normalize::normalize;
use tutor_core::session::ContentKey;
use tutor_core::{LearningContent, Mode, Provider, ServiceError, SessionContext};

use crate::client::{GeminiProvider, OpenAiProvider, TextProvider};
use crate::prompt::build_prompt;
use crate::types::GenerationRequest;

/// Generates learning packs through whichever providers are registered.
///
/// A provider is registered only when its credential is present; asking for
/// an unregistered one is a `Config` failure naming the missing variable.
pub struct ContentGenerator {
    providers: HashMap<Provider, Arc<dyn TextProvider>>,
    config: GenerationConfig,
}

impl ContentGenerator {
    /// Generator with no providers registered.
    #[must_use]
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            providers: HashMap::new(),
            config,
        }
    }

    /// Register an adapter for every provider that has a credential.
    ///
    /// # Errors
    /// Returns `Config` if an HTTP client cannot be built.
    pub fn from_config(
        config: &GenerationConfig,
        credentials: &Credentials,
    ) -> Result<Self, ServiceError> {
        let mut generator = Self::new(config.clone());
        if let Some(key) = credentials.gemini.as_deref() {
            generator = generator.with_provider(Arc::new(GeminiProvider::from_config(config, key)?));
        }
        if let Some(key) = credentials.openai.as_deref() {
            generator = generator.with_provider(Arc::new(OpenAiProvider::from_config(config, key)?));
        }
        debug!(providers = generator.providers.len(), "Content generator ready");
        Ok(generator)
    }

    /// Register (or replace) the adapter for its provider.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    /// Whether `provider` can be used.
    #[must_use]
    pub fn has_provider(&self, provider: Provider) -> bool {
        self.providers.contains_key(&provider)
    }

    /// Registered providers, in display order.
    #[must_use]
    pub fn available(&self) -> Vec<Provider> {
        Provider::all()
            .iter()
            .copied()
            .filter(|p| self.has_provider(*p))
            .collect()
    }

    /// Produce the learning pack for `topic`.
    ///
    /// Served from the session's content cache when a live entry exists for
    /// `(topic, mode, provider)`; otherwise the provider is called once and
    /// its reply normalized. Concurrent identical calls share one request.
    ///
    /// # Errors
    /// `Config` when the provider has no credential, otherwise whatever the
    /// adapter or the normalizer reports. Failures are never cached.
    pub async fn generate(
        &self,
        ctx: &SessionContext,
        topic: &str,
        mode: Mode,
        provider: Provider,
    ) -> Result<Arc<LearningContent>, ServiceError> {
        debug_assert!(!topic.trim().is_empty(), "topic must be validated by the caller");

        let adapter = self.providers.get(&provider).cloned().ok_or_else(|| {
            ServiceError::Config(format!("{} is not set", provider.credential_var()))
        })?;

        let key = ContentKey::new(topic, mode, provider);
        let topic = key.topic.clone();
        let request_config = &self.config;

        ctx.content_cache()
            .get_or_try_init(key, move || async move {
                let prompt = build_prompt(&topic, mode);
                let request = GenerationRequest::from_config(prompt, request_config);
                debug!(topic = %topic, mode = %mode, provider = %provider, "Generating learning pack");

                let raw = adapter.generate(&request).await?;
                let content = normalize(&raw)?;
                info!(
                    topic = %topic,
                    provider = %provider,
                    concepts = content.key_concepts().len(),
                    "Learning pack generated"
                );
                Ok(Arc::new(content))
            })
            .await
    }
}
