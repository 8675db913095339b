//! Tutor benchmark suite.
//!
//! Everything measured here runs once per user action, on top of a remote
//! call that takes seconds; the targets only guard against regressions:
//!   normalize_clean_pack ............ < 50μs
//!   normalize_fenced_chatty_pack .... < 100μs
//!   build_prompt .................... < 20μs
//!   content_cache_hit ............... < 1μs

use std::sync::Arc;
use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tutor_core::diagram::ConceptGraph;
use tutor_core::normalize::normalize;
use tutor_core::session::{ContentCache, ContentKey};
use tutor_core::{Mode, Provider, ServiceError};
use tutor_llm::prompt::build_prompt;

const CLEAN_PACK: &str = r#"{
  "simple_explanation": "A transformer maps a sequence to a sequence using attention instead of recurrence.",
  "key_concepts": ["Self-attention", "Positional encoding", "Multi-head attention", "Layer normalization", "Feed-forward blocks"],
  "real_world_applications": ["Machine translation", "Code completion", "Protein structure prediction", "Speech recognition"],
  "diagram_mermaid": "flowchart TD\nA[Tokens]-->B[Embeddings]\nB-->C[Attention]\nC-->D[Output]",
  "prerequisites": ["Linear algebra", "Backpropagation", "Softmax"],
  "what_to_learn_next": ["Vision transformers", "Mixture of experts"],
  "roadmap": {
    "Beginner": ["Dot-product attention by hand", "Tokenization"],
    "Intermediate": ["Implement a decoder block", "Train a tiny GPT"],
    "Advanced": ["FlashAttention", "KV-cache optimization"]
  },
  "suggested_projects": ["Character-level language model", "Attention heatmap visualizer"],
  "interview_questions": ["Why scale dot products by sqrt(d_k)?", "What does masking prevent in a decoder?"],
  "recommended_skills": ["PyTorch", "Profiling GPU kernels"],
  "next_logical_topic": "Large language model fine-tuning"
}"#;

fn chatty_pack() -> String {
    format!("Sure! Here is the learning pack you asked for:\n```json\n{CLEAN_PACK}\n```\nLet me know if you need more.")
}

/// Benchmark: normalize a schema-conforming reply (target: < 50μs).
fn bench_normalize_clean(c: &mut Criterion) {
    c.bench_function("normalize_clean_pack", |b| {
        b.iter(|| normalize(black_box(CLEAN_PACK)));
    });
}

/// Benchmark: normalize a fenced reply wrapped in prose (target: < 100μs).
fn bench_normalize_chatty(c: &mut Criterion) {
    let raw = chatty_pack();
    c.bench_function("normalize_fenced_chatty_pack", |b| {
        b.iter(|| normalize(black_box(&raw)));
    });
}

/// Benchmark: render the learning-pack prompt (target: < 20μs).
fn bench_build_prompt(c: &mut Criterion) {
    c.bench_function("build_prompt", |b| {
        b.iter(|| build_prompt(black_box("Transformer architecture in NLP"), black_box(Mode::Advanced)));
    });
}

/// Benchmark: derive the concept graph and emit both formats.
fn bench_concept_graph(c: &mut Criterion) {
    let pack = normalize(CLEAN_PACK).expect("bench fixture is valid");
    c.bench_function("concept_graph_dot_and_mermaid", |b| {
        b.iter(|| {
            let graph = ConceptGraph::from_content(black_box("Transformers"), &pack);
            black_box((graph.to_dot(), graph.to_mermaid()))
        });
    });
}

/// Benchmark: cache lookup of a completed entry (target: < 1μs).
fn bench_cache_hit(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let cache: ContentCache = ContentCache::new(128, Duration::from_secs(3600));
    let pack = Arc::new(normalize(CLEAN_PACK).expect("bench fixture is valid"));

    for i in 0..100 {
        let key = ContentKey::new(&format!("topic {i}"), Mode::Beginner, Provider::Gemini);
        let value = Arc::clone(&pack);
        runtime
            .block_on(cache.get_or_try_init(key, move || async move { Ok::<_, ServiceError>(value) }))
            .expect("seeded");
    }
    let key = ContentKey::new("topic 42", Mode::Beginner, Provider::Gemini);

    c.bench_function("content_cache_hit", |b| {
        b.iter(|| black_box(cache.get(black_box(&key))));
    });
}

criterion_group!(
    benches,
    bench_normalize_clean,
    bench_normalize_chatty,
    bench_build_prompt,
    bench_concept_graph,
    bench_cache_hit,
);
criterion_main!(benches);
