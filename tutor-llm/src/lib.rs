//! # tutor-llm: remote clients for Tutor
//!
//! Two clients, both consulting the caches held in a
//! [`tutor_core::SessionContext`]:
//!
//!   - [`ContentGenerator`] builds the learning-pack prompt, sends it to a
//!     generative-text provider (**Gemini** or any **OpenAI-compatible** API)
//!     and normalizes the reply into a [`tutor_core::LearningContent`].
//!   - [`VideoLookup`] finds one instructional video for a topic via the
//!     YouTube Data API. Best effort: callers never block on it.
//!
//! Provider errors are classified into [`tutor_core::ServiceError`] inside
//! the adapters; no `reqwest` or provider-specific error escapes this crate.
//!
//! # Architecture
//!
//! ```text
//! topic, mode, provider
//!   → prompt::build_prompt          (fixed template + canonical schema)
//!   → TextProvider::generate        (Gemini | OpenAI adapter, one HTTP call)
//!   → tutor_core::normalize         (de-fence, parse, coerce)
//!   → SessionContext content cache  (TTL, single flight)
//! ```

pub mod client;
pub mod error;
pub mod generator;
pub mod prompt;
pub mod types;
pub mod video;

pub use client::{GeminiProvider, OpenAiProvider, TextProvider};
pub use generator::ContentGenerator;
pub use types::GenerationRequest;
pub use video::VideoLookup;
