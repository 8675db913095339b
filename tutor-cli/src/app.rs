//! Session orchestration: one generation, then a best-effort video lookup.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use tutor_core::config::Credentials;
use tutor_core::{LearningContent, Mode, Provider, ServiceError, SessionContext, VideoReference};
use tutor_llm::{ContentGenerator, VideoLookup};

use crate::config::Settings;
use crate::render;

/// A line typed in the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate a pack for this topic.
    Learn(String),
    /// Show recent topics.
    History,
    /// Forget the topic history.
    Clear,
    /// Switch audience mode.
    SetMode(Mode),
    /// Switch provider.
    SetProvider(Provider),
    /// Show which credentials are available.
    Status,
    /// Show the command list.
    Help,
    /// Leave the session.
    Quit,
    /// Blank line; answered with the empty-topic message.
    Empty,
}

/// Commands available in the interactive session.
pub const HELP: &str = "\
Type a topic to generate a learning pack, or one of:
  :history            recent topics
  :clear              clear topic history
  :mode <beginner|advanced>
  :provider <gemini|openai>
  :status             credential status
  :help               this list
  :quit               leave";

impl Command {
    /// Parse one input line.
    ///
    /// # Errors
    /// Unknown commands and bad arguments, as a message for the user.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Ok(Self::Learn(line.to_string()));
        };

        let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let arg = arg.trim();
        match name.to_ascii_lowercase().as_str() {
            "history" | "h" => Ok(Self::History),
            "clear" => Ok(Self::Clear),
            "mode" => arg.parse().map(Self::SetMode),
            "provider" => arg.parse().map(Self::SetProvider),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command ':{other}' (try :help)")),
        }
    }
}

/// Why a pack could not be produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LearnError {
    /// Blank topic; rejected before any client is called.
    #[error("Please enter a topic before generating content.")]
    EmptyTopic,
    /// The generation client failed.
    #[error("{message}")]
    Generation {
        /// Actionable text for the user.
        message: String,
        /// The classified failure.
        source: ServiceError,
    },
}

/// A generated pack plus whatever the video lookup produced.
#[derive(Debug, Clone)]
pub struct Lesson {
    pub topic: String,
    pub content: Arc<LearningContent>,
    pub video: Option<Arc<VideoReference>>,
    /// Set when the video lookup failed; the pack is still valid.
    pub video_warning: Option<String>,
}

/// The running session.
pub struct App {
    settings: Settings,
    credentials: Credentials,
    generator: ContentGenerator,
    video: Option<VideoLookup>,
    ctx: SessionContext,
}

impl App {
    /// Build the clients for these settings.
    ///
    /// # Errors
    /// Returns `Config` if an HTTP client cannot be built.
    pub fn new(settings: Settings, credentials: Credentials) -> Result<Self, ServiceError> {
        let generator = ContentGenerator::from_config(&settings.config.generation, &credentials)?;
        let video = if settings.config.video.enabled {
            Some(VideoLookup::new(&settings.config.video)?)
        } else {
            None
        };
        Ok(Self::with_clients(settings, credentials, generator, video))
    }

    /// Assemble from prebuilt clients.
    #[must_use]
    pub fn with_clients(
        settings: Settings,
        credentials: Credentials,
        generator: ContentGenerator,
        video: Option<VideoLookup>,
    ) -> Self {
        let ctx = SessionContext::new(&settings.config.cache);
        Self {
            settings,
            credentials,
            generator,
            video,
            ctx,
        }
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The session context.
    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.ctx
    }

    /// Generate a pack for `topic`, then look for a video.
    ///
    /// # Errors
    /// `EmptyTopic` for a blank topic; `Generation` when the provider call
    /// fails. Video failures only set [`Lesson::video_warning`].
    pub async fn learn(&mut self, topic: &str) -> Result<Lesson, LearnError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(LearnError::EmptyTopic);
        }
        let (mode, provider) = (self.settings.mode, self.settings.provider);

        let content = self
            .generator
            .generate(&self.ctx, topic, mode, provider)
            .await
            .map_err(|source| {
                warn!(topic, provider = %provider, kind = %source.kind(), detail = source.detail(), "Generation failed");
                LearnError::Generation {
                    message: source.user_message(provider.as_str()),
                    source,
                }
            })?;

        let (video, video_warning) = match &self.video {
            Some(lookup) => {
                match lookup
                    .find(&self.ctx, topic, self.credentials.youtube.as_deref())
                    .await
                {
                    Ok(found) => (found, None),
                    Err(err) => {
                        warn!(topic, kind = %err.kind(), detail = err.detail(), "Video lookup failed");
                        (None, Some(err.user_message("YouTube")))
                    }
                }
            }
            None => (None, None),
        };

        self.ctx.record(topic, Arc::clone(&content), video.clone());
        info!(topic, mode = %mode, provider = %provider, video = video.is_some(), "Lesson ready");

        Ok(Lesson {
            topic: topic.to_string(),
            content,
            video,
            video_warning,
        })
    }

    /// Render a lesson with the configured diagram format.
    #[must_use]
    pub fn render(&self, lesson: &Lesson) -> String {
        render::render_pack(
            &lesson.topic,
            self.settings.mode,
            &lesson.content,
            lesson.video.as_deref(),
            self.settings.diagram,
        )
    }

    /// Apply a non-`Learn` command. Returns text to print.
    pub fn apply(&mut self, command: &Command) -> Option<String> {
        match command {
            Command::History => Some(render::render_history(
                self.ctx.history(),
                self.settings.config.history.display_limit,
            )),
            Command::Clear => {
                self.ctx.clear_history();
                Some("History cleared.".to_string())
            }
            Command::SetMode(mode) => {
                self.settings.mode = *mode;
                Some(format!("Mode: {mode}"))
            }
            Command::SetProvider(provider) => {
                self.settings.provider = *provider;
                let note = if self.generator.has_provider(*provider) {
                    String::new()
                } else {
                    format!(" ({} is not set)", provider.credential_var())
                };
                Some(format!("Provider: {provider}{note}"))
            }
            Command::Status => Some(crate::config::key_status(&self.credentials)),
            Command::Help => Some(HELP.to_string()),
            Command::Empty => Some(LearnError::EmptyTopic.to_string()),
            Command::Learn(_) | Command::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tutor_core::config::TutorConfig;
    use tutor_llm::{GenerationRequest, TextProvider};

    use super::*;
    use crate::config::DiagramFormat;

    struct Canned(Result<String, ServiceError>);

    #[async_trait]
    impl TextProvider for Canned {
        fn kind(&self) -> Provider {
            Provider::Gemini
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<String, ServiceError> {
            self.0.clone()
        }
    }

    fn settings() -> Settings {
        Settings {
            config: TutorConfig::default(),
            mode: Mode::Beginner,
            provider: Provider::Gemini,
            diagram: DiagramFormat::Mermaid,
            topic: None,
        }
    }

    fn app(reply: Result<String, ServiceError>) -> App {
        let generator = ContentGenerator::new(settings().config.generation)
            .with_provider(Arc::new(Canned(reply)));
        App::with_clients(settings(), Credentials::default(), generator, None)
    }

    #[test]
    fn commands_parse() {
        assert_eq!(Command::parse("  Rust ownership "), Ok(Command::Learn("Rust ownership".into())));
        assert_eq!(Command::parse(":history"), Ok(Command::History));
        assert_eq!(Command::parse(":MODE advanced"), Ok(Command::SetMode(Mode::Advanced)));
        assert_eq!(Command::parse(":provider openai"), Ok(Command::SetProvider(Provider::OpenAi)));
        assert_eq!(Command::parse(":q"), Ok(Command::Quit));
        assert_eq!(Command::parse("   "), Ok(Command::Empty));
        assert!(Command::parse(":mode").is_err());
        assert!(Command::parse(":frobnicate").is_err());
    }

    #[tokio::test]
    async fn blank_topic_is_rejected_before_generation() {
        let mut app = app(Ok("{}".into()));
        assert_eq!(app.learn("   ").await.expect_err("blank"), LearnError::EmptyTopic);
        assert!(app.session().content_cache().is_empty());
    }

    #[test]
    fn blank_line_asks_for_a_topic() {
        let mut app = app(Ok("{}".into()));
        let command = Command::parse("  \t ").expect("parses");
        assert_eq!(
            app.apply(&command).as_deref(),
            Some("Please enter a topic before generating content.")
        );
        assert!(app.session().history().is_empty());
    }

    #[tokio::test]
    async fn success_records_history() {
        let mut app = app(Ok(r#"{"simple_explanation": "Ownership tracks who frees memory."}"#.into()));
        let lesson = app.learn("Rust ownership").await.expect("lesson");
        assert!(lesson.video.is_none());
        assert!(lesson.video_warning.is_none());
        assert_eq!(app.session().history().topics(), ["Rust ownership"]);
        assert!(app.render(&lesson).contains("Ownership tracks who frees memory."));

        app.learn("Rust ownership").await.expect("lesson");
        assert_eq!(app.session().history().len(), 1);
    }

    #[tokio::test]
    async fn failure_gives_actionable_message_and_no_history() {
        let mut app = app(Err(ServiceError::Auth("API key not valid".into())));
        let err = app.learn("Rust").await.expect_err("auth");
        let LearnError::Generation { message, source } = err else {
            panic!("expected generation failure");
        };
        assert_eq!(source, ServiceError::Auth("API key not valid".into()));
        assert!(message.contains("Gemini rejected the API key"));
        assert!(!message.contains("API key not valid"));
        assert!(app.session().history().is_empty());
    }

    #[tokio::test]
    async fn missing_provider_names_the_variable() {
        let mut app = app(Ok("{}".into()));
        let note = app.apply(&Command::SetProvider(Provider::OpenAi)).expect("text");
        assert_eq!(note, "Provider: OpenAI (OPENAI_API_KEY is not set)");

        let err = app.learn("Rust").await.expect_err("no key");
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn clear_keeps_cached_packs() {
        let mut app = app(Ok(r#"{"simple_explanation": "x"}"#.into()));
        app.learn("Rust").await.expect("lesson");
        assert_eq!(app.apply(&Command::Clear).as_deref(), Some("History cleared."));
        assert_eq!(app.apply(&Command::History).as_deref(), Some("No topics generated yet.\n"));
        assert_eq!(app.session().content_cache().len(), 1);
    }
}
