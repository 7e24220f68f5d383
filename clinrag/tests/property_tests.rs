//! Property tests for the pure engine components and the in-memory store.

use proptest::prelude::*;

use clinrag::rerank::{question_tokens, recency_score};
use clinrag::{
    classify_intent, format_context, parse_structured, rerank, PatientChunk, RerankWeights,
    NO_CONTEXT_SENTINEL,
};

fn chunk(id: String, text: Option<String>, similarity: Option<f32>) -> PatientChunk {
    PatientChunk {
        chunk_id: id,
        document_id: "doc-1".to_string(),
        patient_id: "maria".to_string(),
        file_name: None,
        page_number: None,
        chunk_index: None,
        text,
        similarity,
    }
}

/// Generate chunk lists with unique ids, mixed text presence, and mixed
/// similarity presence.
fn arb_chunks() -> impl Strategy<Value = Vec<PatientChunk>> {
    proptest::collection::vec(
        (proptest::option::of(0.0f32..1.0f32), proptest::option::of("[a-z ]{0,30}")),
        0..12,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (similarity, text))| chunk(format!("chunk-{i}"), text, similarity))
            .collect()
    })
}

/// Generate printable multi-line text resembling model output.
fn arb_model_output() -> impl Strategy<Value = String> {
    proptest::collection::vec("[ -~]{0,40}", 0..8).prop_map(|lines| lines.join("\n"))
}

/// Generate arbitrary unicode text, including junk no model would emit.
fn arb_any_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<char>(), 0..120).prop_map(String::from_iter)
}

/// The parser accepts any model output and always produces a headline with
/// the status prefix and at least one bullet.
mod prop_parser_totality {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn any_output_parses_to_headline_and_bullets(raw in arb_model_output()) {
            let parsed = parse_structured(&raw);
            prop_assert!(!parsed.bullets.is_empty());
            prop_assert!(parsed.headline.starts_with("Overall Status:"));
        }
    }
}

/// Reranking selects from its input: the output is always a subset of the
/// input ids, bounded by `top_k`, and identical runs agree.
mod prop_rerank_invariants {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn output_is_bounded_subset(
            chunks in arb_chunks(),
            top_k in 0usize..15,
            enabled in any::<bool>(),
        ) {
            let out =
                rerank(chunks.clone(), "glucose trend", top_k, &RerankWeights::default(), enabled);
            prop_assert_eq!(out.len(), top_k.min(chunks.len()));
            for selected in &out {
                prop_assert!(chunks.iter().any(|c| c.chunk_id == selected.chunk_id));
            }
        }

        #[test]
        fn rerank_is_deterministic(chunks in arb_chunks(), top_k in 0usize..15) {
            let question = "all cholesterol results";
            let a = rerank(chunks.clone(), question, top_k, &RerankWeights::default(), true);
            let b = rerank(chunks, question, top_k, &RerankWeights::default(), true);
            prop_assert_eq!(a, b);
        }
    }
}

/// Recency scores start at 1.0, strictly decrease along the list, and never
/// leave the [0.1, 1.0] band.
mod prop_recency_decay {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn scores_decrease_within_band(len in 1usize..64) {
            let scores: Vec<f32> = (0..len).map(|i| recency_score(i, len)).collect();
            prop_assert_eq!(scores[0], 1.0);
            for pair in scores.windows(2) {
                prop_assert!(pair[1] < pair[0]);
            }
            for score in &scores {
                prop_assert!((0.1..=1.0).contains(score));
            }
        }
    }
}

/// Classification and tokenization are total over arbitrary input and keep
/// their structural guarantees.
mod prop_classification_totality {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn classifier_handles_any_text(question in arb_any_text()) {
            let intent = classify_intent(&question);
            if intent.primary_keyword().is_some() {
                prop_assert!(!intent.lab_keywords.is_empty());
            }
        }

        #[test]
        fn tokens_are_lowercase_alphanumeric_and_long(question in arb_any_text()) {
            for token in question_tokens(&question) {
                prop_assert!(token.len() > 2);
                prop_assert!(token.chars().all(|c| c.is_alphanumeric()));
                prop_assert_eq!(token.to_lowercase(), token);
            }
        }
    }
}

/// Context rendering produces the sentinel exactly when no chunk carries
/// usable text.
mod prop_context_sentinel {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn sentinel_iff_no_usable_text(chunks in arb_chunks()) {
            let rendered = format_context(&chunks);
            let has_usable = chunks.iter().any(|c| c.usable_text().is_some());
            prop_assert_eq!(rendered == NO_CONTEXT_SENTINEL, !has_usable);
        }
    }
}

/// For any stored embeddings, vector search returns results ordered by
/// descending similarity, bounded by the limit.
mod prop_memory_store_search {
    use super::*;
    use clinrag::{ChunkStore, MemoryChunkStore};

    const DIM: usize = 8;

    /// Generate a non-zero L2-normalized embedding of the given dimension.
    fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
        proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
            "non-zero embedding",
            |mut v| {
                let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm < 1e-8 {
                    return None;
                }
                for val in &mut v {
                    *val /= norm;
                }
                Some(v)
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_descending_and_bounded(
            embeddings in proptest::collection::vec(arb_normalized_embedding(DIM), 1..16),
            query in arb_normalized_embedding(DIM),
            limit in 1usize..20,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let results = rt.block_on(async {
                let store = MemoryChunkStore::new();
                for (i, embedding) in embeddings.iter().enumerate() {
                    let c = chunk(format!("chunk-{i}"), Some(format!("note {i}")), None);
                    store.insert_with_embedding(c, embedding.clone()).await;
                }
                store.search_by_vector("maria", &query, limit, -1.0, 1).await.unwrap()
            });

            prop_assert!(results.len() <= limit);
            for pair in results.windows(2) {
                let (a, b) = (pair[0].similarity.unwrap(), pair[1].similarity.unwrap());
                prop_assert!(a >= b);
            }
        }
    }
}
