//! Chunk store trait for patient-scoped chunk retrieval.

use async_trait::async_trait;

use crate::chunk::PatientChunk;
use crate::error::Result;

/// A storage backend holding patient-document chunks.
///
/// All operations are scoped to a single patient. Implementations decide how
/// patient identifiers map onto their storage (see the Postgres backend's
/// id normalization); callers pass identifiers through unchanged.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag::{ChunkStore, MemoryChunkStore};
///
/// let store = MemoryChunkStore::new();
/// let recent = store.fetch_recent("P1-Sanjeev-Malhotra", 8).await?;
/// ```
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Fetch the most recently ingested chunks for a patient.
    async fn fetch_recent(&self, patient_id: &str, limit: usize) -> Result<Vec<PatientChunk>>;

    /// Search chunks by vector similarity to a query embedding.
    ///
    /// Returns at most `limit` chunks with `similarity >= min_similarity`,
    /// ordered by descending similarity. `probe_hint` trades accuracy for
    /// speed where the backend supports it (higher = more accurate, slower);
    /// backends without such a knob ignore it.
    async fn search_by_vector(
        &self,
        patient_id: &str,
        embedding: &[f32],
        limit: usize,
        min_similarity: f32,
        probe_hint: u32,
    ) -> Result<Vec<PatientChunk>>;

    /// Search chunks whose text contains `term`, case-insensitively.
    async fn search_by_keyword(
        &self,
        patient_id: &str,
        term: &str,
        limit: usize,
    ) -> Result<Vec<PatientChunk>>;

    /// Fetch up to `limit_per_document` chunks from each of the given
    /// documents, in document order (page, then chunk index).
    async fn fetch_by_documents(
        &self,
        patient_id: &str,
        document_ids: &[String],
        limit_per_document: usize,
    ) -> Result<Vec<PatientChunk>>;
}
