//! Prompt template and canonical response schema.
//!
//! The prompt is deterministic for a given (topic, mode): same text in, same
//! cache key, same provider request. The schema is the superset of every
//! field the normalizer understands.

use serde_json::{Value, json};
use tutor_core::normalize::keys;
use tutor_core::types::Mode;

/// Every diagram must open with this header.
pub const FLOWCHART_HEADER: &str = "flowchart TD";

/// Learning-pack prompt. Placeholders: `{topic}`, `{mode}`,
/// `{mode_guidance}`, `{schema}`, `{flowchart_header}`.
pub const LEARNING_PACK_PROMPT: &str = r"You are AI Professor, a structured technical educator.
User topic: {topic}
Audience mode: {mode}
{mode_guidance}

Return JSON only, matching this schema exactly:
{schema}

Rules:
- Keep simple_explanation clear and compact.
- Make every list specific to the topic; provide 4-6 items where meaningful.
- Keep key concepts and prerequisites practical and non-generic.
- roadmap must contain exactly the keys Beginner, Intermediate and Advanced.
- diagram_mermaid must be valid Mermaid and start with: {flowchart_header}
- No markdown fences. No extra keys. No text before or after the JSON.";

/// Audience line for beginners.
pub const BEGINNER_GUIDANCE: &str =
    "Audience: newcomers. Use plain language and everyday analogies; define every term you introduce.";

/// Audience line for advanced learners.
pub const ADVANCED_GUIDANCE: &str =
    "Audience: practitioners. Use precise terminology; cover internals, trade-offs and failure modes.";

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// The canonical response schema, with example values showing each type.
#[must_use]
pub fn canonical_schema() -> Value {
    let mut roadmap = serde_json::Map::new();
    for level in tutor_core::types::RoadmapLevel::ALL {
        roadmap.insert(level.as_str().to_string(), json!(["string"]));
    }

    let mut schema = serde_json::Map::new();
    schema.insert(keys::SIMPLE_EXPLANATION.into(), json!("string"));
    schema.insert(keys::KEY_CONCEPTS.into(), json!(["string"]));
    schema.insert(keys::REAL_WORLD_APPLICATIONS.into(), json!(["string"]));
    schema.insert(keys::DIAGRAM[0].into(), json!(format!("{FLOWCHART_HEADER}\nA-->B")));
    schema.insert(keys::PREREQUISITES.into(), json!(["string"]));
    schema.insert(keys::WHAT_TO_LEARN_NEXT.into(), json!(["string"]));
    schema.insert(keys::ROADMAP[0].into(), Value::Object(roadmap));
    schema.insert(keys::SUGGESTED_PROJECTS.into(), json!(["string"]));
    schema.insert(keys::INTERVIEW_QUESTIONS.into(), json!(["string"]));
    schema.insert(keys::RECOMMENDED_SKILLS.into(), json!(["string"]));
    schema.insert(keys::NEXT_LOGICAL_TOPIC.into(), json!("string"));
    Value::Object(schema)
}

/// Audience guidance for a mode.
#[must_use]
pub fn mode_guidance(mode: Mode) -> &'static str {
    match mode {
        Mode::Beginner => BEGINNER_GUIDANCE,
        Mode::Advanced => ADVANCED_GUIDANCE,
    }
}

/// Build the full learning-pack prompt.
#[must_use]
pub fn build_prompt(topic: &str, mode: Mode) -> String {
    let schema = canonical_schema().to_string();
    render_template(
        LEARNING_PACK_PROMPT,
        &[
            ("mode", mode.as_str()),
            ("mode_guidance", mode_guidance(mode)),
            ("schema", &schema),
            ("flowchart_header", FLOWCHART_HEADER),
            // Last, so braces in user text are never treated as placeholders.
            ("topic", topic.trim()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_replaces_all_occurrences() {
        let out = render_template("{a} and {a} but not {b}", &[("a", "x")]);
        assert_eq!(out, "x and x but not {b}");
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(
            build_prompt("Kubernetes", Mode::Beginner),
            build_prompt("Kubernetes", Mode::Beginner)
        );
        assert_ne!(
            build_prompt("Kubernetes", Mode::Beginner),
            build_prompt("Kubernetes", Mode::Advanced)
        );
    }

    #[test]
    fn schema_round_trips_through_normalizer() {
        let pack = tutor_core::normalize::normalize(&canonical_schema().to_string())
            .expect("schema is a valid object");
        assert_eq!(pack.key_concepts(), ["string"]);
        assert_eq!(pack.next_logical_topic(), "string");
        assert!(pack.diagram_source().is_some_and(|d| d.starts_with(FLOWCHART_HEADER)));
        assert!(!pack.roadmap().is_empty());
    }
}
