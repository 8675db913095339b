//! Concept diagram derived from a learning pack.
//!
//! The graph is built from `key_concepts` and `real_world_applications`
//! alone: topic → concepts → applications. Layout is left to whichever
//! renderer consumes the DOT or Mermaid text. A model-supplied flowchart is
//! kept only as an optional extra ([`model_flowchart`]).

use std::fmt::Write as _;

use crate::types::LearningContent;

/// Most concept nodes drawn.
pub const MAX_CONCEPTS: usize = 8;

/// Most application nodes drawn.
pub const MAX_APPLICATIONS: usize = 6;

/// Kind of node in the concept graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The root topic.
    Topic,
    /// A key concept.
    Concept,
    /// A real-world application.
    Application,
}

/// A labelled node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Stable identifier (`topic`, `concept_0`, `app_0`, ...).
    pub id: String,
    /// Display label.
    pub label: String,
    /// What the node represents.
    pub kind: NodeKind,
}

/// Directed graph: topic → concepts → applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptGraph {
    /// Nodes, topic first.
    pub nodes: Vec<Node>,
    /// Edges as (from id, to id).
    pub edges: Vec<(String, String)>,
}

impl ConceptGraph {
    /// Build the graph for `topic` from a pack.
    #[must_use]
    pub fn from_content(topic: &str, content: &LearningContent) -> Self {
        Self::build(topic, content.key_concepts(), content.real_world_applications())
    }

    /// Build from raw lists. Applications attach round-robin to concepts,
    /// or to the topic when there are none.
    #[must_use]
    pub fn build(topic: &str, concepts: &[String], applications: &[String]) -> Self {
        let mut nodes = vec![Node {
            id: "topic".into(),
            label: topic.to_string(),
            kind: NodeKind::Topic,
        }];
        let mut edges = Vec::new();

        let concept_ids: Vec<String> = concepts
            .iter()
            .take(MAX_CONCEPTS)
            .enumerate()
            .map(|(i, concept)| {
                let id = format!("concept_{i}");
                nodes.push(Node {
                    id: id.clone(),
                    label: concept.clone(),
                    kind: NodeKind::Concept,
                });
                edges.push(("topic".to_string(), id.clone()));
                id
            })
            .collect();

        for (i, app) in applications.iter().take(MAX_APPLICATIONS).enumerate() {
            let id = format!("app_{i}");
            nodes.push(Node {
                id: id.clone(),
                label: app.clone(),
                kind: NodeKind::Application,
            });
            let parent = if concept_ids.is_empty() {
                "topic".to_string()
            } else {
                concept_ids[i % concept_ids.len()].clone()
            };
            edges.push((parent, id));
        }

        Self { nodes, edges }
    }

    /// Whether there is anything beyond the topic node.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Graphviz DOT, left to right.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph concepts {\n    rankdir=LR;\n");
        for node in &self.nodes {
            let shape = match node.kind {
                NodeKind::Topic => "doubleoctagon",
                NodeKind::Concept => "box",
                NodeKind::Application => "ellipse",
            };
            let _ = writeln!(
                out,
                "    {} [label=\"{}\", shape={shape}];",
                node.id,
                escape_dot(&node.label)
            );
        }
        for (from, to) in &self.edges {
            let _ = writeln!(out, "    {from} -> {to};");
        }
        out.push('}');
        out
    }

    /// Mermaid flowchart, top-down.
    #[must_use]
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("flowchart TD\n");
        for node in &self.nodes {
            let _ = writeln!(out, "    {}[\"{}\"]", node.id, escape_mermaid(&node.label));
        }
        for (from, to) in &self.edges {
            let _ = writeln!(out, "    {from} --> {to}");
        }
        out
    }
}

/// The model-supplied diagram, if it looks like a Mermaid flowchart.
#[must_use]
pub fn model_flowchart(content: &LearningContent) -> Option<&str> {
    content
        .diagram_source()
        .map(str::trim)
        .filter(|src| src.to_ascii_lowercase().starts_with("flowchart"))
}

fn escape_dot(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn escape_mermaid(label: &str) -> String {
    label.replace('"', "#quot;").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn applications_attach_round_robin() {
        let graph = ConceptGraph::build(
            "Rust",
            &strings(&["Ownership", "Traits"]),
            &strings(&["CLI", "Web", "Embedded"]),
        );
        assert_eq!(graph.nodes.len(), 6);
        assert!(graph.edges.contains(&("concept_0".into(), "app_0".into())));
        assert!(graph.edges.contains(&("concept_1".into(), "app_1".into())));
        assert!(graph.edges.contains(&("concept_0".into(), "app_2".into())));
    }

    #[test]
    fn applications_attach_to_topic_without_concepts() {
        let graph = ConceptGraph::build("Rust", &[], &strings(&["CLI"]));
        assert_eq!(graph.edges, vec![("topic".to_string(), "app_0".to_string())]);
    }

    #[test]
    fn node_counts_are_capped() {
        let concepts: Vec<String> = (0..20).map(|i| format!("c{i}")).collect();
        let apps: Vec<String> = (0..20).map(|i| format!("a{i}")).collect();
        let graph = ConceptGraph::build("T", &concepts, &apps);
        assert_eq!(graph.nodes.len(), 1 + MAX_CONCEPTS + MAX_APPLICATIONS);
    }

    #[test]
    fn empty_graph_is_trivial() {
        assert!(ConceptGraph::build("T", &[], &[]).is_trivial());
    }

    #[test]
    fn dot_output_escapes_labels() {
        let graph = ConceptGraph::build("Say \"hi\"", &strings(&["a\\b"]), &[]);
        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph concepts {"));
        assert!(dot.contains("rankdir=LR;"));
        assert!(dot.contains(r#"label="Say \"hi\"""#));
        assert!(dot.contains(r#"label="a\\b""#));
        assert!(dot.contains("topic -> concept_0;"));
    }

    #[test]
    fn mermaid_output_is_a_flowchart() {
        let graph = ConceptGraph::build("Rust", &strings(&["Ownership"]), &[]);
        let mermaid = graph.to_mermaid();
        assert!(mermaid.starts_with("flowchart TD"));
        assert!(mermaid.contains("topic --> concept_0"));
    }

    #[test]
    fn model_flowchart_requires_header() {
        let good = LearningContent::builder("x")
            .diagram_source(Some("Flowchart TD\nA-->B".into()))
            .build();
        assert!(model_flowchart(&good).is_some());

        let bad = LearningContent::builder("x")
            .diagram_source(Some("graph LR\nA-->B".into()))
            .build();
        assert!(model_flowchart(&bad).is_none());

        let none = LearningContent::builder("x").build();
        assert!(model_flowchart(&none).is_none());
    }
}
