//! Core data types: modes, learning packs, roadmaps, video references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Difficulty / audience selector. Affects prompt content only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Newcomers: plain language, analogies, no assumed background.
    #[default]
    Beginner,
    /// Practitioners: precise terminology, trade-offs, internals.
    Advanced,
}

impl Mode {
    /// All modes, in display order.
    #[must_use]
    pub fn all() -> &'static [Mode] {
        &[Self::Beginner, Self::Advanced]
    }

    /// Canonical display name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("unknown mode '{other}' (expected beginner or advanced)")),
        }
    }
}

/// Generative-text provider selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Gemini (`generateContent`).
    #[default]
    Gemini,
    /// OpenAI or any OpenAI-compatible chat completions endpoint.
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    /// All providers, in display order.
    #[must_use]
    pub fn all() -> &'static [Provider] {
        &[Self::Gemini, Self::OpenAi]
    }

    /// Display name, used in user-facing messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
        }
    }

    /// Environment variable that holds this provider's key.
    #[must_use]
    pub fn credential_var(self) -> &'static str {
        match self {
            Self::Gemini => crate::config::GEMINI_API_KEY,
            Self::OpenAi => crate::config::OPENAI_API_KEY,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!("unknown provider '{other}' (expected gemini or openai)")),
        }
    }
}

/// One of the three canonical roadmap levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadmapLevel {
    /// First steps.
    Beginner,
    /// Building fluency.
    Intermediate,
    /// Mastery.
    Advanced,
}

impl RoadmapLevel {
    /// The three levels in canonical order.
    pub const ALL: [RoadmapLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Canonical name, also the JSON key in model output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for RoadmapLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-level learning roadmap. Always holds all three levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(rename = "Beginner", default)]
    beginner: Vec<String>,
    #[serde(rename = "Intermediate", default)]
    intermediate: Vec<String>,
    #[serde(rename = "Advanced", default)]
    advanced: Vec<String>,
}

impl Roadmap {
    /// Build a roadmap from the three level lists.
    #[must_use]
    pub fn new(beginner: Vec<String>, intermediate: Vec<String>, advanced: Vec<String>) -> Self {
        Self {
            beginner,
            intermediate,
            advanced,
        }
    }

    /// Steps for one level (possibly empty).
    #[must_use]
    pub fn level(&self, level: RoadmapLevel) -> &[String] {
        match level {
            RoadmapLevel::Beginner => &self.beginner,
            RoadmapLevel::Intermediate => &self.intermediate,
            RoadmapLevel::Advanced => &self.advanced,
        }
    }

    /// Iterate levels in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (RoadmapLevel, &[String])> {
        RoadmapLevel::ALL.into_iter().map(|l| (l, self.level(l)))
    }

    /// Whether every level is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, steps)| steps.is_empty())
    }
}

/// The generated learning pack for one (topic, mode) request.
///
/// Immutable once built; every list field is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningContent {
    simple_explanation: String,
    key_concepts: Vec<String>,
    real_world_applications: Vec<String>,
    prerequisites: Vec<String>,
    what_to_learn_next: Vec<String>,
    roadmap: Roadmap,
    suggested_projects: Vec<String>,
    interview_questions: Vec<String>,
    recommended_skills: Vec<String>,
    next_logical_topic: String,
    diagram_source: Option<String>,
}

impl LearningContent {
    /// Start building a pack. Unset lists default to empty.
    #[must_use]
    pub fn builder(simple_explanation: impl Into<String>) -> LearningContentBuilder {
        LearningContentBuilder {
            inner: LearningContent {
                simple_explanation: simple_explanation.into(),
                key_concepts: Vec::new(),
                real_world_applications: Vec::new(),
                prerequisites: Vec::new(),
                what_to_learn_next: Vec::new(),
                roadmap: Roadmap::default(),
                suggested_projects: Vec::new(),
                interview_questions: Vec::new(),
                recommended_skills: Vec::new(),
                next_logical_topic: crate::normalize::NEXT_TOPIC_FALLBACK.to_string(),
                diagram_source: None,
            },
        }
    }

    /// Short plain-language explanation.
    #[must_use]
    pub fn simple_explanation(&self) -> &str {
        &self.simple_explanation
    }

    /// Core ideas, in the model's order.
    #[must_use]
    pub fn key_concepts(&self) -> &[String] {
        &self.key_concepts
    }

    /// Where the topic shows up in practice.
    #[must_use]
    pub fn real_world_applications(&self) -> &[String] {
        &self.real_world_applications
    }

    /// What to know beforehand.
    #[must_use]
    pub fn prerequisites(&self) -> &[String] {
        &self.prerequisites
    }

    /// Follow-up topics.
    #[must_use]
    pub fn what_to_learn_next(&self) -> &[String] {
        &self.what_to_learn_next
    }

    /// Beginner → Intermediate → Advanced steps.
    #[must_use]
    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    /// Hands-on project ideas.
    #[must_use]
    pub fn suggested_projects(&self) -> &[String] {
        &self.suggested_projects
    }

    /// Interview preparation questions.
    #[must_use]
    pub fn interview_questions(&self) -> &[String] {
        &self.interview_questions
    }

    /// Skills worth building alongside the topic.
    #[must_use]
    pub fn recommended_skills(&self) -> &[String] {
        &self.recommended_skills
    }

    /// The single best next topic, or the fallback text.
    #[must_use]
    pub fn next_logical_topic(&self) -> &str {
        &self.next_logical_topic
    }

    /// Model-supplied flowchart text, if any.
    #[must_use]
    pub fn diagram_source(&self) -> Option<&str> {
        self.diagram_source.as_deref()
    }
}

/// Builder for [`LearningContent`].
#[derive(Debug, Clone)]
#[must_use]
pub struct LearningContentBuilder {
    inner: LearningContent,
}

impl LearningContentBuilder {
    /// Set key concepts.
    pub fn key_concepts(mut self, v: Vec<String>) -> Self {
        self.inner.key_concepts = v;
        self
    }

    /// Set real-world applications.
    pub fn real_world_applications(mut self, v: Vec<String>) -> Self {
        self.inner.real_world_applications = v;
        self
    }

    /// Set prerequisites.
    pub fn prerequisites(mut self, v: Vec<String>) -> Self {
        self.inner.prerequisites = v;
        self
    }

    /// Set follow-up topics.
    pub fn what_to_learn_next(mut self, v: Vec<String>) -> Self {
        self.inner.what_to_learn_next = v;
        self
    }

    /// Set the roadmap.
    pub fn roadmap(mut self, v: Roadmap) -> Self {
        self.inner.roadmap = v;
        self
    }

    /// Set project ideas.
    pub fn suggested_projects(mut self, v: Vec<String>) -> Self {
        self.inner.suggested_projects = v;
        self
    }

    /// Set interview questions.
    pub fn interview_questions(mut self, v: Vec<String>) -> Self {
        self.inner.interview_questions = v;
        self
    }

    /// Set recommended skills.
    pub fn recommended_skills(mut self, v: Vec<String>) -> Self {
        self.inner.recommended_skills = v;
        self
    }

    /// Set the next logical topic.
    pub fn next_logical_topic(mut self, v: impl Into<String>) -> Self {
        self.inner.next_logical_topic = v.into();
        self
    }

    /// Set the model-supplied diagram text.
    pub fn diagram_source(mut self, v: Option<String>) -> Self {
        self.inner.diagram_source = v;
        self
    }

    /// Finish.
    #[must_use]
    pub fn build(self) -> LearningContent {
        self.inner
    }
}

/// A single instructional video found for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    /// Provider video identifier.
    pub video_id: String,
    /// Video title (empty when the provider omitted it).
    pub title: String,
    /// Link to the watch page.
    pub watch_url: String,
    /// Link suitable for embedding in a player frame.
    pub embed_url: String,
}

impl VideoReference {
    /// Build a reference, deriving both URLs from the identifier.
    #[must_use]
    pub fn youtube(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        let video_id = video_id.into();
        Self {
            watch_url: format!("https://www.youtube.com/watch?v={video_id}"),
            embed_url: format!("https://www.youtube.com/embed/{video_id}"),
            title: title.into(),
            video_id,
        }
    }
}
