//! # Tutor Core Library
//!
//! Provider-agnostic building blocks for turning a topic into a structured
//! learning pack:
//!
//! - **Types**: [`LearningContent`], [`Roadmap`], [`VideoReference`], [`Mode`]
//! - **Normalization**: tolerant JSON extraction and schema coercion of raw
//!   model output ([`normalize::normalize`])
//! - **Errors**: one failure taxonomy shared by every remote call
//!   ([`ServiceError`])
//! - **Caching**: time-bounded, single-flight result cache ([`TtlCache`])
//! - **Sessions**: explicit per-user state: caches, topic history, last
//!   results ([`SessionContext`])
//! - **Diagrams**: concept graph derived from a pack, emitted as DOT or
//!   Mermaid ([`diagram::ConceptGraph`])
//!
//! Nothing in this crate performs network I/O; the HTTP clients live in
//! `tutor-llm`.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod config;
pub mod diagram;
pub mod error;
pub mod normalize;
pub mod session;
pub mod types;

pub use cache::TtlCache;
pub use config::{Credentials, TutorConfig};
pub use error::{ConfigError, FailureKind, ServiceError};
pub use session::{SessionContext, SessionHistory};
pub use types::*;
