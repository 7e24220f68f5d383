//! Composite reranking of retrieved chunks.
//!
//! Every candidate is scored on three factors: vector similarity, keyword
//! overlap with the question, and a position-based recency proxy over the
//! pre-rerank ordering. The weighted sum decides the final top-K. Scoring is
//! pure and deterministic; identical inputs always produce identical output
//! ordering.

use std::cmp::Ordering;

use crate::chunk::PatientChunk;
use crate::config::RerankWeights;

/// Question tokens dropped before keyword scoring.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "what", "when", "where", "which", "that", "this", "was", "were",
    "are", "has", "have", "had", "how", "many", "much", "does", "did", "show", "give", "list",
    "all", "any", "from", "over", "about", "can", "could", "would", "please", "you", "recent",
    "latest", "last",
];

/// Select the `top_k` most relevant chunks.
///
/// With reranking disabled, or when the candidate count does not exceed
/// `top_k`, the input comes back truncated to `top_k` with its order intact
/// and no scoring performed. Otherwise chunks are scored and stably sorted
/// by descending composite score, so equal scores keep their input order.
pub fn rerank(
    chunks: Vec<PatientChunk>,
    question: &str,
    top_k: usize,
    weights: &RerankWeights,
    enabled: bool,
) -> Vec<PatientChunk> {
    if !enabled || chunks.len() <= top_k {
        let mut chunks = chunks;
        chunks.truncate(top_k);
        return chunks;
    }

    let tokens = question_tokens(question);
    let len = chunks.len();

    let mut scored: Vec<(f32, PatientChunk)> = chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let score = composite_score(&chunk, &tokens, index, len, weights);
            (score, chunk)
        })
        .collect();

    // Vec::sort_by is stable, so ties stay in arrival order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.truncate(top_k);

    scored.into_iter().map(|(_, chunk)| chunk).collect()
}

fn composite_score(
    chunk: &PatientChunk,
    question_tokens: &[String],
    index: usize,
    len: usize,
    weights: &RerankWeights,
) -> f32 {
    let text = chunk.text.as_deref().unwrap_or("");
    let keyword = keyword_score(question_tokens, text);
    let recency = recency_score(index, len);

    // Keyword- and recency-sourced chunks carry no vector score; a damped
    // keyword score stands in so they are not zeroed on the similarity term.
    let similarity_term = match chunk.similarity {
        Some(similarity) => similarity.clamp(0.0, 1.0),
        None => keyword * 0.8,
    };

    weights.similarity * similarity_term + weights.keyword * keyword + weights.recency * recency
}

/// Keyword overlap between the question and a chunk text, in [0, 1].
///
/// The base is the fraction of question tokens found in the chunk; repeated
/// occurrences add a bonus capped at 0.3.
pub fn keyword_score(question_tokens: &[String], text: &str) -> f32 {
    if question_tokens.is_empty() {
        return 0.0;
    }

    let haystack = text.to_lowercase();
    let mut matched = 0usize;
    let mut occurrences = 0usize;
    for token in question_tokens {
        let count = haystack.matches(token.as_str()).count();
        if count > 0 {
            matched += 1;
            occurrences += count;
        }
    }

    let base = matched as f32 / question_tokens.len() as f32;
    let bonus = (((occurrences - matched) as f32) * 0.1).min(0.3);
    (base + bonus).clamp(0.0, 1.0)
}

/// Position-decay recency score over the pre-rerank ordering, in [0.1, 1].
///
/// The first element scores 1.0 and the decay reaches the 0.1 floor exactly
/// at the last position, so stale chunks stay eligible but disadvantaged.
/// Strictly decreasing in `index` for lists longer than one.
pub fn recency_score(index: usize, len: usize) -> f32 {
    let denominator = len.saturating_sub(1).max(1) as f64;
    let decay = (-(index as f64) / denominator * std::f64::consts::LN_10).exp();
    decay.max(0.1) as f32
}

/// Lowercase word tokens of the question, with stop words and tokens of
/// length two or less removed.
pub fn question_tokens(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 2 && !STOP_WORDS.contains(token))
        .map(String::from)
        .collect()
}
