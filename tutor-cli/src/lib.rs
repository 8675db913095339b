//! # tutor-cli: terminal front-end for Tutor
//!
//! Thin presentation layer over `tutor-core` and `tutor-llm`: resolves
//! flags and config, drives one [`app::App`] session, renders packs as
//! Markdown.
//!
//! ## Modules
//!
//! - `config`: command-line flags layered over `tutor.toml`
//! - `app`: session orchestration and interactive commands
//! - `render`: Markdown output

pub mod app;
pub mod config;
pub mod render;
