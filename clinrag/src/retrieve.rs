//! Hybrid retrieval: semantic search, keyword search, and document-locality
//! expansion merged into one deduplicated candidate list.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::chunk::PatientChunk;
use crate::config::RetrievalLimits;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::intent::QueryIntent;
use crate::store::ChunkStore;

/// Chunks pulled per distinct document touched by a keyword hit.
const EXPANSION_PER_DOCUMENT: usize = 5;

/// Run hybrid retrieval for one question.
///
/// The semantic channel always runs and its results come first. When the
/// intent flags hybrid search and carries a primary keyword, keyword hits
/// and then document-locality expansions are appended, each channel keeping
/// only chunks not already seen. The merged list is capped at twice the
/// retrieval limit in arrival order. A patient with no hits at all falls
/// back to their most recent chunks.
pub(crate) async fn run(
    store: &dyn ChunkStore,
    embeddings: &dyn EmbeddingProvider,
    patient_id: &str,
    question: &str,
    intent: &QueryIntent,
    limits: &RetrievalLimits,
    probe_hint: u32,
) -> Result<Vec<PatientChunk>> {
    let embedding = embeddings.embed(question).await?;

    let semantic = store
        .search_by_vector(
            patient_id,
            &embedding,
            limits.retrieval_limit,
            limits.min_similarity,
            probe_hint,
        )
        .await?;
    let semantic_count = semantic.len();

    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<PatientChunk> = Vec::new();
    merge_unseen(&mut merged, &mut seen, semantic);

    let mut keyword_count = 0usize;
    let mut expansion_count = 0usize;
    if intent.wants_hybrid_search {
        if let Some(term) = intent.primary_keyword() {
            let keyword_hits = store
                .search_by_keyword(patient_id, term, limits.chunk_limit * 2)
                .await?;
            keyword_count = keyword_hits.len();

            let document_ids = distinct_document_ids(&keyword_hits);
            merge_unseen(&mut merged, &mut seen, keyword_hits);

            if !document_ids.is_empty() {
                let expansions = store
                    .fetch_by_documents(patient_id, &document_ids, EXPANSION_PER_DOCUMENT)
                    .await?;
                expansion_count = expansions.len();
                merge_unseen(&mut merged, &mut seen, expansions);
            }

            merged.truncate(limits.retrieval_limit * 2);
        }
    }

    if merged.is_empty() {
        debug!(patient = patient_id, "no search hits, falling back to recent chunks");
        merged = store.fetch_recent(patient_id, limits.chunk_limit).await?;
    }

    info!(
        patient = patient_id,
        semantic = semantic_count,
        keyword = keyword_count,
        expansion = expansion_count,
        merged = merged.len(),
        "hybrid retrieval complete"
    );

    Ok(merged)
}

/// Append incoming chunks whose ids have not been seen yet. The first
/// occurrence of a chunk id wins, so earlier channels keep their metadata
/// (in particular the similarity score from the semantic channel).
fn merge_unseen(
    merged: &mut Vec<PatientChunk>,
    seen: &mut HashSet<String>,
    incoming: Vec<PatientChunk>,
) {
    for chunk in incoming {
        if seen.insert(chunk.chunk_id.clone()) {
            merged.push(chunk);
        }
    }
}

/// Document ids in order of first appearance.
fn distinct_document_ids(chunks: &[PatientChunk]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut ids = Vec::new();
    for chunk in chunks {
        if seen.insert(chunk.document_id.as_str()) {
            ids.push(chunk.document_id.clone());
        }
    }
    ids
}
