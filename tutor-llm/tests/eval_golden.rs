//! Prompt golden set.
//!
//! Curated topic/mode pairs with the fragments the rendered prompt must and
//! must not contain. Runs offline; no provider is called.

use tutor_core::Mode;
use tutor_core::normalize::keys;
use tutor_llm::prompt;

/// A golden prompt case.
struct GoldenCase {
    name: &'static str,
    topic: &'static str,
    mode: Mode,
    /// Strings that MUST appear in the rendered prompt.
    prompt_must_contain: Vec<&'static str>,
    /// Strings that MUST NOT appear in the rendered prompt.
    prompt_must_not_contain: Vec<&'static str>,
}

fn golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            name: "beginner_kubernetes",
            topic: "Kubernetes",
            mode: Mode::Beginner,
            prompt_must_contain: vec!["User topic: Kubernetes", "Audience mode: Beginner", "analogies"],
            prompt_must_not_contain: vec!["Audience: practitioners"],
        },
        GoldenCase {
            name: "advanced_kubernetes",
            topic: "Kubernetes",
            mode: Mode::Advanced,
            prompt_must_contain: vec!["Audience mode: Advanced", "trade-offs"],
            prompt_must_not_contain: vec!["Audience: newcomers"],
        },
        GoldenCase {
            name: "padded_topic_is_trimmed",
            topic: "   Gradient Descent  ",
            mode: Mode::Beginner,
            prompt_must_contain: vec!["User topic: Gradient Descent\n"],
            prompt_must_not_contain: vec!["User topic:    "],
        },
        GoldenCase {
            name: "topic_with_braces_is_verbatim",
            topic: "Rust {generics}",
            mode: Mode::Advanced,
            prompt_must_contain: vec!["Rust {generics}"],
            prompt_must_not_contain: vec![],
        },
        GoldenCase {
            name: "placeholder_lookalike_topic",
            topic: "{mode} switching",
            mode: Mode::Beginner,
            prompt_must_contain: vec!["User topic: {mode} switching"],
            prompt_must_not_contain: vec!["User topic: Beginner switching"],
        },
        GoldenCase {
            name: "unicode_topic",
            topic: "Théorie des graphes",
            mode: Mode::Beginner,
            prompt_must_contain: vec!["Théorie des graphes"],
            prompt_must_not_contain: vec![],
        },
        GoldenCase {
            name: "long_topic",
            topic: "Distributed consensus with Raft and Paxos in geo-replicated databases",
            mode: Mode::Advanced,
            prompt_must_contain: vec!["geo-replicated databases"],
            prompt_must_not_contain: vec![],
        },
    ]
}

#[test]
fn golden_prompts_render_without_unresolved_vars() {
    for case in golden_cases() {
        let rendered = prompt::build_prompt(case.topic, case.mode);

        for needle in &case.prompt_must_contain {
            assert!(
                rendered.contains(needle),
                "Golden case '{}': rendered prompt must contain '{}'.\nRendered:\n{}",
                case.name,
                needle,
                &rendered[..rendered.len().min(500)]
            );
        }
        for needle in &case.prompt_must_not_contain {
            assert!(
                !rendered.contains(needle),
                "Golden case '{}': rendered prompt must NOT contain '{}'.",
                case.name,
                needle
            );
        }
        for placeholder in ["{mode_guidance}", "{schema}", "{flowchart_header}"] {
            assert!(
                !rendered.contains(placeholder),
                "Golden case '{}': unresolved {placeholder}",
                case.name
            );
        }
    }
}

#[test]
fn prompt_demands_bare_json() {
    let rendered = prompt::build_prompt("Docker", Mode::Beginner);
    assert!(rendered.contains("Return JSON only"));
    assert!(rendered.contains("No markdown fences"));
    assert!(rendered.contains("No extra keys"));
    assert!(rendered.contains("start with: flowchart TD"));
}

#[test]
fn prompt_embeds_every_canonical_key() {
    let rendered = prompt::build_prompt("Docker", Mode::Advanced);
    let canonical = [
        keys::SIMPLE_EXPLANATION,
        keys::KEY_CONCEPTS,
        keys::REAL_WORLD_APPLICATIONS,
        keys::PREREQUISITES,
        keys::WHAT_TO_LEARN_NEXT,
        keys::ROADMAP[0],
        keys::SUGGESTED_PROJECTS,
        keys::INTERVIEW_QUESTIONS,
        keys::RECOMMENDED_SKILLS,
        keys::NEXT_LOGICAL_TOPIC,
        keys::DIAGRAM[0],
    ];
    for key in canonical {
        assert!(rendered.contains(&format!("\"{key}\"")), "schema is missing {key}");
    }
    for level in ["Beginner", "Intermediate", "Advanced"] {
        assert!(rendered.contains(&format!("\"{level}\"")));
    }
}

#[test]
fn prompt_identifies_the_assistant() {
    assert!(prompt::LEARNING_PACK_PROMPT.starts_with("You are"));
}
