//! # clinrag
//!
//! Adaptive hybrid retrieval and reranking engine for clinical question
//! answering over per-patient document chunks.
//!
//! ## Overview
//!
//! [`RagEngine`] answers physician questions about a single patient by
//! retrieving stored document chunks, reranking them, and prompting a chat
//! model with the result. The moving parts:
//!
//! - [`classify_intent`] - reads retrieval scope, lab vocabulary, and
//!   presentation format out of the question text
//! - hybrid retrieval - semantic search plus keyword search plus
//!   document-locality expansion, merged with first-seen dedup
//! - [`rerank`] - composite scoring on similarity, keyword overlap, and a
//!   recency proxy
//! - [`parse_structured`] - total parser turning summary output into a
//!   headline and bullets, whatever shape the model produced
//!
//! Collaborators sit behind narrow async traits ([`ChunkStore`],
//! [`EmbeddingProvider`], [`CompletionGateway`], [`AuditLog`]), with
//! in-memory implementations for development and Postgres/OpenAI backends
//! behind feature flags.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use clinrag::{EngineConfig, MemoryAuditLog, MemoryChunkStore, RagEngine};
//!
//! let engine = RagEngine::builder()
//!     .config(EngineConfig::default())
//!     .chunk_store(Arc::new(store))
//!     .embedding_provider(Arc::new(embedder))
//!     .completion_gateway(Arc::new(gateway))
//!     .audit_log(Arc::new(MemoryAuditLog::new()))
//!     .build()?;
//!
//! let answer = engine
//!     .answer("maria", "Show me all cholesterol results", &[], "2026-02-11T09:00:00Z", None)
//!     .await?;
//! let summary = engine.summarize("maria", "2026-02-11T09:00:00Z", None).await?;
//! ```
//!
//! ## Features
//!
//! | Feature | Provides |
//! |---------|----------|
//! | `postgres` | `PgChunkStore` and `PgAuditLog` on sqlx/pgvector |
//! | `openai` | `OpenAiEmbeddings` on the OpenAI embeddings API |
//! | `full` | Everything above |

pub mod audit;
pub mod chunk;
pub mod completion;
pub mod config;
pub mod context;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod intent;
pub mod memory;
pub mod message;
#[cfg(feature = "openai")]
pub mod openai;
pub mod parse;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod rerank;
pub mod store;

mod prompt;
mod retrieve;

pub use audit::{AuditLog, AuditRecord};
pub use chunk::PatientChunk;
pub use completion::{CompletionGateway, TokenStream};
pub use config::{EngineConfig, EngineConfigBuilder, RerankWeights, RetrievalLimits};
pub use context::{format_context, format_for_log, NO_CHUNKS_SENTINEL, NO_CONTEXT_SENTINEL};
pub use embedding::EmbeddingProvider;
pub use engine::{RagEngine, RagEngineBuilder};
pub use error::{EngineError, Result};
pub use intent::{classify_intent, FormatHint, QueryIntent};
pub use memory::{MemoryAuditLog, MemoryChunkStore};
pub use message::{ChatMessage, CompletionRequest, MessageRole};
#[cfg(feature = "openai")]
pub use openai::OpenAiEmbeddings;
pub use parse::{parse_structured, StructuredAnswer, DEFAULT_HEADLINE};
#[cfg(feature = "postgres")]
pub use postgres::{PgAuditLog, PgChunkStore};
pub use rerank::rerank;
pub use store::ChunkStore;
