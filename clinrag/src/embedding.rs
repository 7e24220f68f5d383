//! Embedding provider trait for generating query vectors from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// The engine embeds exactly one question per call, so the interface is a
/// single-text operation; there is no batch variant here.
///
/// # Example
///
/// ```rust,ignore
/// use clinrag::EmbeddingProvider;
///
/// let embedding = provider.embed("last 3 HbA1c readings").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
