//! In-memory chunk store and audit log.
//!
//! This module provides [`MemoryChunkStore`] and [`MemoryAuditLog`], backed
//! by `tokio::sync::RwLock`-protected vectors. They are suitable for
//! development, testing, and small-scale use; the Postgres backends cover
//! production deployments.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::audit::{AuditLog, AuditRecord};
use crate::chunk::PatientChunk;
use crate::error::Result;
use crate::store::ChunkStore;

#[derive(Debug)]
struct StoredChunk {
    chunk: PatientChunk,
    embedding: Option<Vec<f32>>,
}

/// An in-memory chunk store with cosine-similarity vector search.
///
/// Insertion order doubles as ingestion order, so "most recent" means
/// last-inserted. Chunks inserted without an embedding are invisible to
/// vector search but still reachable through the keyword, document, and
/// recency paths.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag::MemoryChunkStore;
///
/// let store = MemoryChunkStore::new();
/// store.insert_with_embedding(chunk, vec![0.1, 0.4, 0.2]).await;
/// ```
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    chunks: RwLock<Vec<StoredChunk>>,
}

impl MemoryChunkStore {
    /// Create a new empty in-memory chunk store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a chunk without an embedding.
    pub async fn insert(&self, chunk: PatientChunk) {
        let mut chunks = self.chunks.write().await;
        chunks.push(StoredChunk { chunk, embedding: None });
    }

    /// Insert a chunk together with its embedding.
    pub async fn insert_with_embedding(&self, chunk: PatientChunk, embedding: Vec<f32>) {
        let mut chunks = self.chunks.write().await;
        chunks.push(StoredChunk { chunk, embedding: Some(embedding) });
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Clone a stored chunk for a non-vector channel, which carries no
/// similarity score.
fn without_similarity(chunk: &PatientChunk) -> PatientChunk {
    let mut chunk = chunk.clone();
    chunk.similarity = None;
    chunk
}

#[async_trait]
impl ChunkStore for MemoryChunkStore {
    async fn fetch_recent(&self, patient_id: &str, limit: usize) -> Result<Vec<PatientChunk>> {
        let chunks = self.chunks.read().await;
        Ok(chunks
            .iter()
            .rev()
            .filter(|stored| stored.chunk.patient_id == patient_id)
            .take(limit)
            .map(|stored| without_similarity(&stored.chunk))
            .collect())
    }

    async fn search_by_vector(
        &self,
        patient_id: &str,
        embedding: &[f32],
        limit: usize,
        min_similarity: f32,
        _probe_hint: u32,
    ) -> Result<Vec<PatientChunk>> {
        let chunks = self.chunks.read().await;
        let mut hits: Vec<PatientChunk> = chunks
            .iter()
            .filter(|stored| stored.chunk.patient_id == patient_id)
            .filter(|stored| stored.chunk.usable_text().is_some())
            .filter_map(|stored| {
                let stored_embedding = stored.embedding.as_ref()?;
                let similarity = cosine_similarity(embedding, stored_embedding);
                (similarity >= min_similarity).then(|| {
                    let mut chunk = stored.chunk.clone();
                    chunk.similarity = Some(similarity);
                    chunk
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);
        Ok(hits)
    }

    async fn search_by_keyword(
        &self,
        patient_id: &str,
        term: &str,
        limit: usize,
    ) -> Result<Vec<PatientChunk>> {
        let term = term.to_lowercase();
        let chunks = self.chunks.read().await;
        Ok(chunks
            .iter()
            .rev()
            .filter(|stored| stored.chunk.patient_id == patient_id)
            .filter(|stored| {
                stored
                    .chunk
                    .text
                    .as_deref()
                    .is_some_and(|text| text.to_lowercase().contains(&term))
            })
            .take(limit)
            .map(|stored| without_similarity(&stored.chunk))
            .collect())
    }

    async fn fetch_by_documents(
        &self,
        patient_id: &str,
        document_ids: &[String],
        limit_per_document: usize,
    ) -> Result<Vec<PatientChunk>> {
        let chunks = self.chunks.read().await;
        let mut result = Vec::new();
        for document_id in document_ids {
            let mut in_document: Vec<&PatientChunk> = chunks
                .iter()
                .filter(|stored| {
                    stored.chunk.patient_id == patient_id
                        && stored.chunk.document_id == *document_id
                })
                .map(|stored| &stored.chunk)
                .collect();
            // Missing page/index sorts last, matching the Postgres backend.
            in_document.sort_by_key(|chunk| {
                (
                    chunk.page_number.unwrap_or(i32::MAX),
                    chunk.chunk_index.unwrap_or(i32::MAX),
                )
            });
            result.extend(
                in_document
                    .into_iter()
                    .take(limit_per_document)
                    .map(without_similarity),
            );
        }
        Ok(result)
    }
}

/// An in-memory audit log that appends records to a vector.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditLog {
    /// Create a new empty in-memory audit log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records written so far, in write order.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn record(&self, record: &AuditRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(())
    }
}
