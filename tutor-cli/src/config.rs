//! Command-line arguments layered over the file configuration.
//!
//! Precedence: flags, then the config file, then built-in defaults.

use std::path::{Path, PathBuf};

use clap::Parser;
use tutor_core::config::{Credentials, TutorConfig};
use tutor_core::{ConfigError, Mode, Provider};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tutor.toml";

/// Turn a topic into a structured learning pack.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "tutor")]
#[command(about = "Structured learning packs: explanation, roadmap, projects, interview prep")]
#[command(version)]
pub struct Cli {
    /// Topic to learn. Omit to start an interactive session.
    pub topic: Option<String>,

    /// Audience mode: beginner or advanced.
    #[arg(short, long, env = "TUTOR_MODE")]
    pub mode: Option<Mode>,

    /// Generative-text provider: gemini or openai.
    #[arg(short, long, env = "TUTOR_PROVIDER")]
    pub provider: Option<Provider>,

    /// Path to a TOML config file.
    #[arg(short, long, env = "TUTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Qualify video searches as educational and enable strict safe-search.
    #[arg(long)]
    pub strict_video: bool,

    /// Skip the video lookup entirely.
    #[arg(long)]
    pub no_video: bool,

    /// Print the concept graph as Graphviz DOT instead of Mermaid.
    #[arg(long)]
    pub dot: bool,
}

/// Diagram output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramFormat {
    /// Mermaid `flowchart TD`.
    #[default]
    Mermaid,
    /// Graphviz DOT.
    Dot,
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: TutorConfig,
    pub mode: Mode,
    pub provider: Provider,
    pub diagram: DiagramFormat,
    pub topic: Option<String>,
}

impl Settings {
    /// Resolve flags against the config file.
    ///
    /// # Errors
    /// Fails if an explicitly named config file cannot be read or parsed, or
    /// if the resulting configuration is invalid.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = load_config(cli.config.as_deref(), Path::new(DEFAULT_CONFIG_FILE))?;
        if cli.strict_video {
            config.video.strict = true;
        }
        if cli.no_video {
            config.video.enabled = false;
        }
        config.validate()?;

        let provider = cli.provider.unwrap_or(config.generation.provider);
        Ok(Self {
            mode: cli.mode.unwrap_or_default(),
            provider,
            diagram: if cli.dot { DiagramFormat::Dot } else { DiagramFormat::Mermaid },
            topic: cli
                .topic
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string),
            config,
        })
    }
}

/// Load `explicit` if given, else `fallback` if it exists, else defaults.
///
/// # Errors
/// An explicit path must exist and parse; a fallback that exists must parse.
pub fn load_config(explicit: Option<&Path>, fallback: &Path) -> Result<TutorConfig, ConfigError> {
    match explicit {
        Some(path) => TutorConfig::from_file(path),
        None if fallback.is_file() => TutorConfig::from_file(fallback),
        None => Ok(TutorConfig::default()),
    }
}

/// One-line credential summary, values never shown.
#[must_use]
pub fn key_status(credentials: &Credentials) -> String {
    let state = |v: &Option<String>| if v.is_some() { "available" } else { "missing" };
    format!(
        "GEMINI_API_KEY={}, OPENAI_API_KEY={}, YOUTUBE_API_KEY={}",
        state(&credentials.gemini),
        state(&credentials.openai),
        state(&credentials.youtube)
    )
}
