//! The adaptive retrieval-and-answer engine.
//!
//! [`RagEngine`] coordinates the full question-answering workflow by
//! composing a [`ChunkStore`], an [`EmbeddingProvider`], a
//! [`CompletionGateway`], and an optional [`AuditLog`]: classify the
//! question, run hybrid retrieval, rerank, build the prompt, and hand the
//! exchange to the audit trail.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use clinrag::{RagEngine, EngineConfig, MemoryChunkStore};
//!
//! let engine = RagEngine::builder()
//!     .config(EngineConfig::default())
//!     .chunk_store(Arc::new(store))
//!     .embedding_provider(Arc::new(embedder))
//!     .completion_gateway(Arc::new(gateway))
//!     .audit_log(Arc::new(audit))  // optional
//!     .build()?;
//!
//! let answer = engine
//!     .answer("maria", "What was the latest HbA1c?", &[], "2026-02-11T09:00:00Z", None)
//!     .await?;
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::audit::{AuditLog, AuditRecord};
use crate::chunk::PatientChunk;
use crate::completion::{CompletionGateway, TokenStream};
use crate::config::{EngineConfig, RetrievalLimits};
use crate::context::{format_context, format_for_log};
use crate::embedding::EmbeddingProvider;
use crate::error::{EngineError, Result};
use crate::intent::{classify_intent, FormatHint};
use crate::message::{ChatMessage, CompletionRequest};
use crate::parse::{parse_structured, StructuredAnswer};
use crate::prompt;
use crate::rerank::rerank;
use crate::retrieve;
use crate::store::ChunkStore;

/// Query label recorded in the audit trail for summary requests, which have
/// no user-provided question.
const SUMMARY_QUERY_LABEL: &str = "patient summary";

/// The retrieval-and-answer orchestrator.
///
/// Construct one via [`RagEngine::builder()`]. All collaborators sit behind
/// trait objects, so stores and gateways can be swapped without touching the
/// orchestration logic.
pub struct RagEngine {
    config: EngineConfig,
    chunk_store: Arc<dyn ChunkStore>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    completion_gateway: Arc<dyn CompletionGateway>,
    audit_log: Option<Arc<dyn AuditLog>>,
}

impl RagEngine {
    /// Create a new [`RagEngineBuilder`].
    pub fn builder() -> RagEngineBuilder {
        RagEngineBuilder::default()
    }

    /// Return a reference to the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Greeting for a fresh conversation. Static, no model call involved.
    pub fn intro_message(&self) -> &'static str {
        prompt::INTRO_MESSAGE
    }

    /// Answer a question about one patient.
    ///
    /// Classifies the question, retrieves and reranks patient chunks, builds
    /// the prompt with the supplied `history` and `reference_time`, and
    /// returns the model's complete answer. The exchange is written to the
    /// audit trail when an [`AuditLog`] is configured; audit failures are
    /// logged and never fail the answer.
    ///
    /// A missing `session_id` gets a freshly minted one.
    ///
    /// # Errors
    ///
    /// Returns the first [`EngineError`] from embedding, retrieval, or
    /// completion unchanged.
    pub async fn answer(
        &self,
        patient_id: &str,
        question: &str,
        history: &[ChatMessage],
        reference_time: &str,
        session_id: Option<Uuid>,
    ) -> Result<String> {
        let started = Instant::now();
        let session_id = session_id.unwrap_or_else(Uuid::new_v4);

        let (chunks, hint) = self.retrieve_for_question(patient_id, question).await?;
        let context = format_context(&chunks);
        let chunks_text = format_for_log(&chunks);

        let messages =
            prompt::build_chat_messages(&context, question, history, reference_time, hint);
        let request = CompletionRequest {
            messages,
            max_tokens: self.config.answer_max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .completion_gateway
            .complete(request)
            .await
            .inspect_err(|e| error!(session = %session_id, error = %e, "completion failed"))?;

        info!(
            session = %session_id,
            patient = patient_id,
            chunk_count = chunks.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "question answered"
        );

        self.audit(AuditRecord {
            session_id,
            patient_id: patient_id.to_string(),
            query: question.to_string(),
            response: response.clone(),
            chunks_text,
            latency: started.elapsed(),
        })
        .await;

        Ok(response)
    }

    /// Answer a question about one patient, streaming the response.
    ///
    /// Retrieval and prompt assembly match [`answer`](RagEngine::answer); the
    /// returned stream yields response fragments as the model produces them.
    /// The audit record is written once the stream ends. If the caller drops
    /// the stream early, the fragments received so far are audited on a
    /// best-effort background task instead.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if embedding, retrieval, or opening the
    /// completion stream fails. Mid-stream failures are yielded as `Err`
    /// items without ending the stream.
    pub async fn answer_stream(
        &self,
        patient_id: &str,
        question: &str,
        history: &[ChatMessage],
        reference_time: &str,
        session_id: Option<Uuid>,
    ) -> Result<TokenStream> {
        let started = Instant::now();
        let session_id = session_id.unwrap_or_else(Uuid::new_v4);

        let (chunks, hint) = self.retrieve_for_question(patient_id, question).await?;
        let context = format_context(&chunks);
        let chunks_text = format_for_log(&chunks);

        let messages =
            prompt::build_chat_messages(&context, question, history, reference_time, hint);
        let request = CompletionRequest {
            messages,
            max_tokens: self.config.answer_max_tokens,
            temperature: self.config.temperature,
        };

        let inner = self
            .completion_gateway
            .complete_stream(request)
            .await
            .inspect_err(|e| error!(session = %session_id, error = %e, "completion stream failed"))?;

        let record = AuditRecord {
            session_id,
            patient_id: patient_id.to_string(),
            query: question.to_string(),
            response: String::new(),
            chunks_text,
            latency: Duration::ZERO,
        };
        let audit = StreamAudit::new(self.audit_log.clone(), record, started);

        let stream = async_stream::stream! {
            let mut inner = inner;
            let mut audit = audit;
            while let Some(item) = inner.next().await {
                match item {
                    Ok(fragment) => {
                        audit.push(&fragment);
                        yield Ok(fragment);
                    }
                    Err(e) => yield Err(e),
                }
            }
            audit.finish().await;
        };

        Ok(Box::pin(stream))
    }

    /// Produce a structured status summary for one patient.
    ///
    /// Pulls the patient's most recent chunks (no question, so no semantic
    /// search), asks the model for a headline-and-bullets summary, and
    /// parses the reply. Parsing is total; malformed model output degrades
    /// to a default headline with the raw text as bullets rather than an
    /// error. The raw model text is what lands in the audit trail.
    ///
    /// # Errors
    ///
    /// Returns the first [`EngineError`] from retrieval or completion
    /// unchanged.
    pub async fn summarize(
        &self,
        patient_id: &str,
        reference_time: &str,
        session_id: Option<Uuid>,
    ) -> Result<StructuredAnswer> {
        let started = Instant::now();
        let session_id = session_id.unwrap_or_else(Uuid::new_v4);

        let limit = self.config.summary_chunk_limit.min(self.config.max_retrieval_chunks);
        let chunks = self
            .chunk_store
            .fetch_recent(patient_id, limit)
            .await
            .inspect_err(|e| error!(patient = patient_id, error = %e, "recent-chunk fetch failed"))?;
        debug!(patient = patient_id, chunk_count = chunks.len(), "summary chunks fetched");

        let context = format_context(&chunks);
        let chunks_text = format_for_log(&chunks);

        let messages = prompt::build_summary_messages(&context, reference_time);
        let request = CompletionRequest {
            messages,
            max_tokens: self.config.summary_max_tokens,
            temperature: self.config.temperature,
        };

        let raw = self
            .completion_gateway
            .complete(request)
            .await
            .inspect_err(|e| error!(session = %session_id, error = %e, "completion failed"))?;
        let summary = parse_structured(&raw);

        info!(
            session = %session_id,
            patient = patient_id,
            bullet_count = summary.bullets.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "summary produced"
        );

        self.audit(AuditRecord {
            session_id,
            patient_id: patient_id.to_string(),
            query: SUMMARY_QUERY_LABEL.to_string(),
            response: raw,
            chunks_text,
            latency: started.elapsed(),
        })
        .await;

        Ok(summary)
    }

    /// Classify the question, then retrieve and rerank its chunks. Returns
    /// the final chunk set together with the format hint for the prompt.
    async fn retrieve_for_question(
        &self,
        patient_id: &str,
        question: &str,
    ) -> Result<(Vec<PatientChunk>, FormatHint)> {
        let intent = classify_intent(question);
        let limits = RetrievalLimits::for_intent(&intent, &self.config);
        debug!(
            patient = patient_id,
            wide = intent.wants_exhaustive || intent.requested_count.is_some(),
            chunk_limit = limits.chunk_limit,
            retrieval_limit = limits.retrieval_limit,
            "question classified"
        );

        let candidates = retrieve::run(
            self.chunk_store.as_ref(),
            self.embedding_provider.as_ref(),
            patient_id,
            question,
            &intent,
            &limits,
            self.config.ivfflat_probes,
        )
        .await
        .inspect_err(|e| error!(patient = patient_id, error = %e, "retrieval failed"))?;

        let chunks = rerank(
            candidates,
            question,
            limits.chunk_limit,
            &self.config.rerank_weights,
            self.config.rerank_enabled,
        );

        Ok((chunks, intent.format_hint))
    }

    /// Best-effort audit write. Failures are logged, never propagated.
    async fn audit(&self, record: AuditRecord) {
        if let Some(log) = &self.audit_log {
            if let Err(e) = log.record(&record).await {
                warn!(session = %record.session_id, error = %e, "audit write failed");
            }
        }
    }
}

/// Accumulates streamed fragments and guarantees exactly one audit write,
/// whether the stream runs to completion or is dropped mid-flight.
struct StreamAudit {
    log: Option<Arc<dyn AuditLog>>,
    record: Option<AuditRecord>,
    started: Instant,
}

impl StreamAudit {
    fn new(log: Option<Arc<dyn AuditLog>>, record: AuditRecord, started: Instant) -> Self {
        // Without a log there is nothing to accumulate for.
        let record = log.is_some().then_some(record);
        Self { log, record, started }
    }

    fn push(&mut self, fragment: &str) {
        if let Some(record) = self.record.as_mut() {
            record.response.push_str(fragment);
        }
    }

    async fn finish(&mut self) {
        let (Some(log), Some(mut record)) = (self.log.take(), self.record.take()) else {
            return;
        };
        record.latency = self.started.elapsed();
        if let Err(e) = log.record(&record).await {
            warn!(session = %record.session_id, error = %e, "audit write failed");
        }
    }
}

impl Drop for StreamAudit {
    fn drop(&mut self) {
        let (Some(log), Some(mut record)) = (self.log.take(), self.record.take()) else {
            return;
        };
        record.latency = self.started.elapsed();
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = log.record(&record).await {
                        warn!(
                            session = %record.session_id,
                            error = %e,
                            "audit write failed after cancelled stream"
                        );
                    }
                });
            }
            Err(_) => {
                warn!(
                    session = %record.session_id,
                    "stream dropped outside an async runtime; partial response not audited"
                );
            }
        }
    }
}

/// Builder for constructing a [`RagEngine`].
///
/// The chunk store, embedding provider, and completion gateway are required;
/// the audit log is optional and the configuration defaults to
/// [`EngineConfig::default()`]. Call [`build()`](RagEngineBuilder::build) to
/// validate and produce the engine.
///
/// # Example
///
/// ```rust,ignore
/// let engine = RagEngine::builder()
///     .chunk_store(Arc::new(store))
///     .embedding_provider(Arc::new(embedder))
///     .completion_gateway(Arc::new(gateway))
///     .build()?;
/// ```
#[derive(Default)]
pub struct RagEngineBuilder {
    config: Option<EngineConfig>,
    chunk_store: Option<Arc<dyn ChunkStore>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    completion_gateway: Option<Arc<dyn CompletionGateway>>,
    audit_log: Option<Arc<dyn AuditLog>>,
}

impl RagEngineBuilder {
    /// Set the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the chunk store backend.
    pub fn chunk_store(mut self, store: Arc<dyn ChunkStore>) -> Self {
        self.chunk_store = Some(store);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the completion gateway.
    pub fn completion_gateway(mut self, gateway: Arc<dyn CompletionGateway>) -> Self {
        self.completion_gateway = Some(gateway);
        self
    }

    /// Set an optional audit log for recording exchanges.
    pub fn audit_log(mut self, log: Arc<dyn AuditLog>) -> Self {
        self.audit_log = Some(log);
        self
    }

    /// Validate and build the [`RagEngine`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if a required collaborator is missing.
    pub fn build(self) -> Result<RagEngine> {
        let chunk_store = self
            .chunk_store
            .ok_or_else(|| EngineError::Config("chunk store is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| EngineError::Config("embedding provider is required".to_string()))?;
        let completion_gateway = self
            .completion_gateway
            .ok_or_else(|| EngineError::Config("completion gateway is required".to_string()))?;

        Ok(RagEngine {
            config: self.config.unwrap_or_default(),
            chunk_store,
            embedding_provider,
            completion_gateway,
            audit_log: self.audit_log,
        })
    }
}
