//! Response normalization: raw model text → fully-populated [`LearningContent`].
//!
//! Models wrap JSON in code fences, prepend chatty prose, return a string
//! where a list was asked for, or drop fields entirely. This module is the
//! single place that absorbs all of that:
//!
//! 1. **De-fence**: strip ```` ``` ```` / ```` ```json ```` markers, trim.
//! 2. **Parse**: strict JSON first; otherwise the span from the first `{` to
//!    the last `}`. Only this step can fail.
//! 3. **Coerce**: each field independently, with fixed fallbacks.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ServiceError;
use crate::types::{LearningContent, Roadmap, RoadmapLevel};

/// Fallback for a missing or blank explanation.
pub const EXPLANATION_FALLBACK: &str = "Explanation unavailable.";

/// Fallback for a missing or blank next topic.
pub const NEXT_TOPIC_FALLBACK: &str = "Not available.";

/// Schema keys. Aliases come from older prompt variants and are accepted on input.
pub mod keys {
    /// Plain-language explanation.
    pub const SIMPLE_EXPLANATION: &str = "simple_explanation";
    /// Key concepts list.
    pub const KEY_CONCEPTS: &str = "key_concepts";
    /// Applications list.
    pub const REAL_WORLD_APPLICATIONS: &str = "real_world_applications";
    /// Prerequisites list.
    pub const PREREQUISITES: &str = "prerequisites";
    /// Follow-up topics list.
    pub const WHAT_TO_LEARN_NEXT: &str = "what_to_learn_next";
    /// Roadmap mapping, then its accepted aliases.
    pub const ROADMAP: [&str; 3] = ["roadmap", "mini_roadmap", "mini_learning_roadmap"];
    /// Projects list.
    pub const SUGGESTED_PROJECTS: &str = "suggested_projects";
    /// Interview questions list.
    pub const INTERVIEW_QUESTIONS: &str = "interview_questions";
    /// Skills list.
    pub const RECOMMENDED_SKILLS: &str = "recommended_skills";
    /// Next topic string.
    pub const NEXT_LOGICAL_TOPIC: &str = "next_logical_topic";
    /// Flowchart text, then its accepted alias.
    pub const DIAGRAM: [&str; 2] = ["diagram_mermaid", "mermaid_diagram"];
}

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^```(?:json)?|```$").expect("fence pattern is valid"));

/// Normalize raw model output into a [`LearningContent`].
///
/// # Errors
/// Returns [`ServiceError::MalformedResponse`] when no JSON object can be
/// recovered from `raw`. Field-level problems never fail.
pub fn normalize(raw: &str) -> Result<LearningContent, ServiceError> {
    let payload = parse_payload(raw)?;
    Ok(coerce(&payload))
}

/// Strip code-fence markers and surrounding whitespace.
#[must_use]
pub fn strip_fences(raw: &str) -> String {
    FENCE.replace_all(raw.trim(), "").trim().to_string()
}

/// Steps 1 and 2: recover the top-level JSON object.
///
/// # Errors
/// Returns [`ServiceError::MalformedResponse`] if neither the cleaned text
/// nor its outermost brace span is a JSON object.
pub fn parse_payload(raw: &str) -> Result<Map<String, Value>, ServiceError> {
    let cleaned = strip_fences(raw);
    if cleaned.is_empty() {
        return Err(ServiceError::MalformedResponse("empty response".into()));
    }

    let strict_err = match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(other) => format!("expected a JSON object, got {}", json_type(&other)),
        Err(e) => e.to_string(),
    };

    let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) else {
        return Err(ServiceError::MalformedResponse(format!(
            "no JSON object found ({strict_err})"
        )));
    };
    if end <= start {
        return Err(ServiceError::MalformedResponse(format!(
            "no JSON object found ({strict_err})"
        )));
    }

    debug!(
        start,
        end,
        len = cleaned.len(),
        "Strict parse failed, retrying on outermost brace span"
    );
    match serde_json::from_str::<Value>(&cleaned[start..=end]) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ServiceError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_type(&other)
        ))),
        Err(e) => Err(ServiceError::MalformedResponse(format!(
            "invalid JSON: {e}"
        ))),
    }
}

/// Step 3: coerce a parsed payload. Total; never fails.
#[must_use]
pub fn coerce(payload: &Map<String, Value>) -> LearningContent {
    LearningContent::builder(coerce_string(
        payload.get(keys::SIMPLE_EXPLANATION),
        EXPLANATION_FALLBACK,
    ))
    .key_concepts(coerce_list(payload.get(keys::KEY_CONCEPTS)))
    .real_world_applications(coerce_list(payload.get(keys::REAL_WORLD_APPLICATIONS)))
    .prerequisites(coerce_list(payload.get(keys::PREREQUISITES)))
    .what_to_learn_next(coerce_list(payload.get(keys::WHAT_TO_LEARN_NEXT)))
    .roadmap(coerce_roadmap(first_present(payload, &keys::ROADMAP)))
    .suggested_projects(coerce_list(payload.get(keys::SUGGESTED_PROJECTS)))
    .interview_questions(coerce_list(payload.get(keys::INTERVIEW_QUESTIONS)))
    .recommended_skills(coerce_list(payload.get(keys::RECOMMENDED_SKILLS)))
    .next_logical_topic(coerce_string(
        payload.get(keys::NEXT_LOGICAL_TOPIC),
        NEXT_TOPIC_FALLBACK,
    ))
    .diagram_source(coerce_optional_string(first_present(payload, &keys::DIAGRAM)))
    .build()
}

/// Non-empty trimmed string, else `fallback`.
#[must_use]
pub fn coerce_string(value: Option<&Value>, fallback: &str) -> String {
    coerce_optional_string(value).unwrap_or_else(|| fallback.to_string())
}

fn coerce_optional_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// List coercion: sequence → stringified non-empty elements; non-empty
/// string → one-element list; anything else → empty.
#[must_use]
pub fn coerce_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(stringify).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Roadmap coercion: only the three canonical keys are read.
#[must_use]
pub fn coerce_roadmap(value: Option<&Value>) -> Roadmap {
    let Some(Value::Object(map)) = value else {
        return Roadmap::default();
    };
    let [beginner, intermediate, advanced] =
        RoadmapLevel::ALL.map(|level| coerce_list(map.get(level.as_str())));
    Roadmap::new(beginner, intermediate, advanced)
}

fn stringify(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn first_present<'a>(payload: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|key| payload.get(*key))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
