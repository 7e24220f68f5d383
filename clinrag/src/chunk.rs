//! Data types for patient-document chunks.

use serde::{Deserialize, Serialize};

/// One retrievable span of patient-document text.
///
/// Chunks are immutable value objects owned by the retrieval call that
/// fetched them. `similarity` is set only when the chunk came out of vector
/// search; keyword and recency results carry `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientChunk {
    /// Unique identifier for the chunk within a patient scope.
    pub chunk_id: String,
    /// The ID of the source document.
    pub document_id: String,
    /// The patient this chunk belongs to.
    pub patient_id: String,
    /// Original file name of the source document, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Page number within the source document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i32>,
    /// Ordinal of this chunk within its document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<i32>,
    /// The chunk text. Chunks with empty or absent text are never surfaced
    /// to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Similarity score in [0, 1] from vector search, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
}

impl PatientChunk {
    /// Return the chunk text if it is non-empty after trimming.
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Human-readable source label: the file name with a trailing extension
    /// stripped, falling back to `Document {document_id}`.
    pub fn source_label(&self) -> String {
        match self.file_name.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            Some(name) => match name.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() && !ext.contains(' ') => stem.to_string(),
                _ => name.to_string(),
            },
            None => format!("Document {}", self.document_id),
        }
    }
}
