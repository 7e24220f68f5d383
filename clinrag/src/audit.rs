//! Audit log trait for best-effort persistence of question/answer exchanges.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// One question/answer exchange as recorded for audit.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// Correlation id for the exchange. The engine mints one when the
    /// caller does not supply a session id.
    pub session_id: Uuid,
    /// The patient the question was about.
    pub patient_id: String,
    /// The question as asked.
    pub query: String,
    /// The model's response text. For streamed answers this may be partial
    /// if the consumer dropped the stream early.
    pub response: String,
    /// The retrieved context in its audit-log rendering.
    pub chunks_text: String,
    /// Wall-clock time from question receipt to response completion.
    pub latency: Duration,
}

/// Best-effort persistence of [`AuditRecord`]s.
///
/// The engine never fails a call because an audit write failed: errors from
/// [`record`](AuditLog::record) are caught at the engine boundary and
/// reported via `tracing::warn!` only.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Persist one exchange.
    async fn record(&self, record: &AuditRecord) -> Result<()>;
}
