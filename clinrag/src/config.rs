//! Configuration for the retrieval engine.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::intent::QueryIntent;

/// Weights for the composite rerank score.
///
/// All weights must be non-negative; they are not required to sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RerankWeights {
    /// Weight of the vector-similarity term.
    pub similarity: f32,
    /// Weight of the keyword-overlap term.
    pub keyword: f32,
    /// Weight of the recency term.
    pub recency: f32,
}

impl Default for RerankWeights {
    fn default() -> Self {
        Self { similarity: 0.5, keyword: 0.3, recency: 0.2 }
    }
}

/// Configuration parameters for the retrieval engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Chunks handed to the model for a chat answer.
    pub chunk_limit: usize,
    /// Chunks handed to the model for a patient summary.
    pub summary_chunk_limit: usize,
    /// Hard ceiling on chunks fetched for any single question.
    pub max_retrieval_chunks: usize,
    /// Similarity floor for the default (precision-favoring) limits.
    pub min_similarity: f32,
    /// Lowered similarity floor for wide (recall-favoring) limits.
    pub wide_min_similarity: f32,
    /// IVFFLAT probe hint passed to the chunk store.
    pub ivfflat_probes: u32,
    /// Whether the composite reranker runs at all.
    pub rerank_enabled: bool,
    /// Composite score weights.
    pub rerank_weights: RerankWeights,
    /// Sampling temperature for completions.
    pub temperature: f32,
    /// Token budget for chat answers.
    pub answer_max_tokens: u32,
    /// Token budget for summaries.
    pub summary_max_tokens: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_limit: 6,
            summary_chunk_limit: 8,
            max_retrieval_chunks: 25,
            min_similarity: 0.3,
            wide_min_similarity: 0.15,
            ivfflat_probes: 1,
            rerank_enabled: true,
            rerank_weights: RerankWeights::default(),
            temperature: 0.2,
            answer_max_tokens: 800,
            summary_max_tokens: 400,
        }
    }
}

impl EngineConfig {
    /// Create a new builder for constructing an [`EngineConfig`].
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the number of chunks handed to the model for a chat answer.
    pub fn chunk_limit(mut self, limit: usize) -> Self {
        self.config.chunk_limit = limit;
        self
    }

    /// Set the number of chunks handed to the model for a summary.
    pub fn summary_chunk_limit(mut self, limit: usize) -> Self {
        self.config.summary_chunk_limit = limit;
        self
    }

    /// Set the hard ceiling on chunks fetched per question.
    pub fn max_retrieval_chunks(mut self, max: usize) -> Self {
        self.config.max_retrieval_chunks = max;
        self
    }

    /// Set the similarity floor for default limits.
    pub fn min_similarity(mut self, floor: f32) -> Self {
        self.config.min_similarity = floor;
        self
    }

    /// Set the lowered similarity floor for wide limits.
    pub fn wide_min_similarity(mut self, floor: f32) -> Self {
        self.config.wide_min_similarity = floor;
        self
    }

    /// Set the IVFFLAT probe hint.
    pub fn ivfflat_probes(mut self, probes: u32) -> Self {
        self.config.ivfflat_probes = probes;
        self
    }

    /// Enable or disable the composite reranker.
    pub fn rerank_enabled(mut self, enabled: bool) -> Self {
        self.config.rerank_enabled = enabled;
        self
    }

    /// Set the composite score weights.
    pub fn rerank_weights(mut self, weights: RerankWeights) -> Self {
        self.config.rerank_weights = weights;
        self
    }

    /// Set the sampling temperature for completions.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the token budget for chat answers.
    pub fn answer_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.answer_max_tokens = max_tokens;
        self
    }

    /// Set the token budget for summaries.
    pub fn summary_max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.summary_max_tokens = max_tokens;
        self
    }

    /// Build the [`EngineConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if:
    /// - `chunk_limit`, `summary_chunk_limit`, or `max_retrieval_chunks` is zero
    /// - a similarity floor is outside [0, 1]
    /// - any rerank weight is negative
    pub fn build(self) -> Result<EngineConfig> {
        let c = &self.config;
        if c.chunk_limit == 0 {
            return Err(EngineError::Config("chunk_limit must be greater than zero".to_string()));
        }
        if c.summary_chunk_limit == 0 {
            return Err(EngineError::Config(
                "summary_chunk_limit must be greater than zero".to_string(),
            ));
        }
        if c.max_retrieval_chunks == 0 {
            return Err(EngineError::Config(
                "max_retrieval_chunks must be greater than zero".to_string(),
            ));
        }
        for (name, floor) in
            [("min_similarity", c.min_similarity), ("wide_min_similarity", c.wide_min_similarity)]
        {
            if !(0.0..=1.0).contains(&floor) {
                return Err(EngineError::Config(format!(
                    "{name} ({floor}) must be within [0, 1]"
                )));
            }
        }
        let w = c.rerank_weights;
        if w.similarity < 0.0 || w.keyword < 0.0 || w.recency < 0.0 {
            return Err(EngineError::Config("rerank weights must be non-negative".to_string()));
        }
        Ok(self.config)
    }
}

/// Per-question retrieval limits derived from [`QueryIntent`].
///
/// Exhaustive and counted questions get the wide, recall-favoring limits;
/// everything else gets the narrower precision-favoring defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalLimits {
    /// Chunks that survive reranking and reach the model.
    pub chunk_limit: usize,
    /// Chunks fetched from the semantic channel before reranking.
    pub retrieval_limit: usize,
    /// Acceptance threshold for vector search.
    pub min_similarity: f32,
}

impl RetrievalLimits {
    /// Derive limits for one question.
    pub fn for_intent(intent: &QueryIntent, config: &EngineConfig) -> Self {
        if intent.wants_exhaustive || intent.requested_count.is_some() {
            let chunk_limit = config.max_retrieval_chunks;
            let retrieval_limit =
                if config.rerank_enabled { chunk_limit * 2 } else { chunk_limit };
            Self { chunk_limit, retrieval_limit, min_similarity: config.wide_min_similarity }
        } else {
            let chunk_limit = config.chunk_limit;
            let retrieval_limit =
                if config.rerank_enabled { chunk_limit * 3 } else { chunk_limit };
            Self { chunk_limit, retrieval_limit, min_similarity: config.min_similarity }
        }
    }
}
