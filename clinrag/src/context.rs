//! Rendering retrieved chunks into prompt context and audit text.

use crate::chunk::PatientChunk;

/// Sentinel produced when no chunk carries usable text. Prompt assembly
/// checks for this value and skips the patient-context message entirely.
pub const NO_CONTEXT_SENTINEL: &str = "No patient context available.";

/// Sentinel recorded in the audit trail when retrieval came back empty.
pub const NO_CHUNKS_SENTINEL: &str = "No chunks retrieved.";

/// Render chunks into the context block handed to the language model.
///
/// Each chunk with usable text becomes a labeled section: the source label
/// (file stem or `Document <id>`), the page number when known, then the text
/// on the following lines. Sections are joined by blank lines. Chunks with
/// no usable text are dropped; if nothing remains the sentinel is returned.
pub fn format_context(chunks: &[PatientChunk]) -> String {
    let sections: Vec<String> = chunks
        .iter()
        .filter_map(|chunk| {
            let text = chunk.usable_text()?;
            let mut label = chunk.source_label();
            if let Some(page) = chunk.page_number {
                label.push_str(&format!(" page {page}"));
            }
            Some(format!("{label}:\n{text}"))
        })
        .collect();

    if sections.is_empty() {
        NO_CONTEXT_SENTINEL.to_string()
    } else {
        sections.join("\n\n")
    }
}

/// Render chunks for the audit trail, keeping provenance a reviewer needs.
///
/// Each chunk gets a bracketed metadata line (source, document id, page and
/// chunk index when present, similarity at four decimals when present)
/// followed by its text. Entries are joined by a four-dash separator line.
pub fn format_for_log(chunks: &[PatientChunk]) -> String {
    let entries: Vec<String> = chunks
        .iter()
        .filter_map(|chunk| {
            let text = chunk.usable_text()?;
            let mut fields = vec![
                format!("source: {}", chunk.source_label()),
                format!("document: {}", chunk.document_id),
            ];
            if let Some(page) = chunk.page_number {
                fields.push(format!("page: {page}"));
            }
            if let Some(index) = chunk.chunk_index {
                fields.push(format!("chunk: {index}"));
            }
            if let Some(similarity) = chunk.similarity {
                fields.push(format!("similarity: {similarity:.4}"));
            }
            Some(format!("[{}]\n{text}", fields.join(" | ")))
        })
        .collect();

    if entries.is_empty() {
        NO_CHUNKS_SENTINEL.to_string()
    } else {
        entries.join("\n----\n")
    }
}
