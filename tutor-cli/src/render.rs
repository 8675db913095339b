//! Markdown rendering of a learning pack.

use tutor_core::diagram::{self, ConceptGraph};
use tutor_core::{LearningContent, Mode, RoadmapLevel, SessionHistory, VideoReference};

use crate::config::DiagramFormat;

/// Shown in place of an empty list.
pub const NO_DATA: &str = "No data available.";

/// Shown when no video is attached.
pub const NO_VIDEO: &str = "No suitable video found for this topic.";

/// Shown when the history is empty.
pub const NO_HISTORY: &str = "No topics generated yet.";

fn heading(out: &mut String, title: &str) {
    out.push_str(&format!("\n## {title}\n\n"));
}

fn bullets(out: &mut String, items: &[String]) {
    if items.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
        return;
    }
    for item in items {
        out.push_str(&format!("- {item}\n"));
    }
}

fn fenced(out: &mut String, lang: &str, body: &str) {
    out.push_str(&format!("```{lang}\n{}\n```\n", body.trim_end()));
}

/// Render the full pack as Markdown.
#[must_use]
pub fn render_pack(
    topic: &str,
    mode: Mode,
    content: &LearningContent,
    video: Option<&VideoReference>,
    format: DiagramFormat,
) -> String {
    let mut out = format!("# {} ({mode})\n", topic.trim());

    heading(&mut out, "Simple Explanation");
    out.push_str(content.simple_explanation());
    out.push('\n');

    heading(&mut out, "Key Concepts");
    bullets(&mut out, content.key_concepts());

    heading(&mut out, "Real World Applications");
    bullets(&mut out, content.real_world_applications());

    heading(&mut out, "Video");
    render_video(&mut out, video);

    heading(&mut out, "Diagram");
    render_diagram(&mut out, topic, content, format);

    heading(&mut out, "Prerequisites");
    bullets(&mut out, content.prerequisites());

    heading(&mut out, "What To Learn Next");
    bullets(&mut out, content.what_to_learn_next());

    heading(&mut out, "Mini Roadmap (Beginner -> Advanced)");
    for level in RoadmapLevel::ALL {
        out.push_str(&format!("\n### {level}\n\n"));
        bullets(&mut out, content.roadmap().level(level));
    }

    heading(&mut out, "Suggested Projects");
    bullets(&mut out, content.suggested_projects());

    heading(&mut out, "Interview Questions");
    bullets(&mut out, content.interview_questions());

    heading(&mut out, "Recommended Skills");
    bullets(&mut out, content.recommended_skills());

    heading(&mut out, "Next Logical Topic");
    out.push_str(content.next_logical_topic());
    out.push('\n');

    out
}

fn render_video(out: &mut String, video: Option<&VideoReference>) {
    match video {
        Some(video) if video.title.is_empty() => out.push_str(&format!("<{}>\n", video.watch_url)),
        Some(video) => out.push_str(&format!("[{}]({})\n", video.title, video.watch_url)),
        None => {
            out.push_str(NO_VIDEO);
            out.push('\n');
        }
    }
}

fn render_diagram(out: &mut String, topic: &str, content: &LearningContent, format: DiagramFormat) {
    let graph = ConceptGraph::from_content(topic.trim(), content);
    if graph.is_trivial() {
        out.push_str(NO_DATA);
        out.push('\n');
    } else {
        match format {
            DiagramFormat::Mermaid => fenced(out, "mermaid", &graph.to_mermaid()),
            DiagramFormat::Dot => fenced(out, "dot", &graph.to_dot()),
        }
    }

    if let Some(sketch) = diagram::model_flowchart(content) {
        out.push_str("\nModel sketch:\n\n");
        fenced(out, "mermaid", sketch);
    }
}

/// Recent topics, newest first.
#[must_use]
pub fn render_history(history: &SessionHistory, limit: usize) -> String {
    let recent = history.recent(limit);
    if recent.is_empty() {
        return format!("{NO_HISTORY}\n");
    }
    recent.iter().map(|t| format!("- {t}\n")).collect()
}
