//! Per-session state: result caches, topic history, last results.
//!
//! A [`SessionContext`] is created when a user session starts and dropped
//! when it ends. Both remote clients take it by reference and use only its
//! caches; the topic history belongs to the presentation layer.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::debug;

use crate::cache::TtlCache;
use crate::config::CacheConfig;
use crate::error::ServiceError;
use crate::types::{LearningContent, Mode, Provider, VideoReference};

/// Cache key for a generated pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey {
    /// Topic as entered (trimmed).
    pub topic: String,
    /// Audience mode.
    pub mode: Mode,
    /// Provider that generated it.
    pub provider: Provider,
}

impl ContentKey {
    /// Build a key; the topic is trimmed.
    #[must_use]
    pub fn new(topic: &str, mode: Mode, provider: Provider) -> Self {
        Self {
            topic: topic.trim().to_string(),
            mode,
            provider,
        }
    }
}

/// Cache key for a video lookup. The credential is stored only as a hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoKey {
    /// Topic as entered (trimmed).
    pub topic: String,
    credential: u64,
}

impl VideoKey {
    /// Build a key from the topic and the credential used for the lookup.
    #[must_use]
    pub fn new(topic: &str, credential: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        credential.hash(&mut hasher);
        Self {
            topic: topic.trim().to_string(),
            credential: hasher.finish(),
        }
    }
}

/// Cache of generated packs.
pub type ContentCache = TtlCache<ContentKey, Arc<LearningContent>, ServiceError>;

/// Cache of video lookups. `None` ("nothing found") is cached like a hit.
pub type VideoCache = TtlCache<VideoKey, Option<Arc<VideoReference>>, ServiceError>;

/// Ordered, duplicate-free list of topics requested in this session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionHistory {
    topics: Vec<String>,
}

impl SessionHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a topic unless already present. Returns whether it was added.
    pub fn push(&mut self, topic: &str) -> bool {
        let topic = topic.trim();
        if topic.is_empty() || self.topics.iter().any(|t| t == topic) {
            return false;
        }
        self.topics.push(topic.to_string());
        true
    }

    /// Up to `limit` topics, newest first.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<&str> {
        self.topics.iter().rev().take(limit).map(String::as_str).collect()
    }

    /// All topics in insertion order.
    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Whether the topic has been requested before.
    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic.trim())
    }

    /// Number of topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Forget every topic.
    pub fn clear(&mut self) {
        self.topics.clear();
    }
}

/// Everything one user session owns.
pub struct SessionContext {
    content_cache: ContentCache,
    video_cache: VideoCache,
    history: SessionHistory,
    last_result: Option<Arc<LearningContent>>,
    last_video: Option<Arc<VideoReference>>,
}

impl SessionContext {
    /// Start a session with empty caches and history.
    #[must_use]
    pub fn new(cache: &CacheConfig) -> Self {
        debug!(
            ttl_secs = cache.ttl_secs,
            max_entries = cache.max_entries,
            "Session started"
        );
        Self {
            content_cache: TtlCache::new(cache.max_entries, cache.ttl()),
            video_cache: TtlCache::new(cache.max_entries, cache.ttl()),
            history: SessionHistory::new(),
            last_result: None,
            last_video: None,
        }
    }

    /// Generated-pack cache.
    #[must_use]
    pub fn content_cache(&self) -> &ContentCache {
        &self.content_cache
    }

    /// Video lookup cache.
    #[must_use]
    pub fn video_cache(&self) -> &VideoCache {
        &self.video_cache
    }

    /// Topic history.
    #[must_use]
    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    /// Clear the displayed history. Cached results are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Store a successful generation as the current result.
    pub fn record(
        &mut self,
        topic: &str,
        content: Arc<LearningContent>,
        video: Option<Arc<VideoReference>>,
    ) {
        self.last_result = Some(content);
        self.last_video = video;
        self.history.push(topic);
    }

    /// Most recent pack, if any.
    #[must_use]
    pub fn last_result(&self) -> Option<&Arc<LearningContent>> {
        self.last_result.as_ref()
    }

    /// Video attached to the most recent pack, if any.
    #[must_use]
    pub fn last_video(&self) -> Option<&Arc<VideoReference>> {
        self.last_video.as_ref()
    }
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        debug!(
            topics = self.history.len(),
            cached_packs = self.content_cache.len(),
            "Session ended"
        );
    }
}
