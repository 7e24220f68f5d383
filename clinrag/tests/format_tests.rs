//! Tests for context and audit-log rendering.

use clinrag::{format_context, format_for_log, PatientChunk, NO_CHUNKS_SENTINEL, NO_CONTEXT_SENTINEL};

fn chunk(id: &str, text: Option<&str>) -> PatientChunk {
    PatientChunk {
        chunk_id: id.to_string(),
        document_id: format!("doc-{id}"),
        patient_id: "maria".to_string(),
        file_name: None,
        page_number: None,
        chunk_index: None,
        text: text.map(String::from),
        similarity: None,
    }
}

#[test]
fn test_empty_input_renders_sentinels() {
    assert_eq!(format_context(&[]), NO_CONTEXT_SENTINEL);
    assert_eq!(format_for_log(&[]), NO_CHUNKS_SENTINEL);
}

#[test]
fn test_blank_chunks_render_sentinels() {
    let chunks = vec![chunk("a", None), chunk("b", Some("   ")), chunk("c", Some(""))];
    assert_eq!(format_context(&chunks), NO_CONTEXT_SENTINEL);
    assert_eq!(format_for_log(&chunks), NO_CHUNKS_SENTINEL);
}

#[test]
fn test_context_labels_with_file_stem_and_page() {
    let mut c = chunk("a", Some("Discharged in stable condition."));
    c.file_name = Some("discharge_summary.pdf".to_string());
    c.page_number = Some(2);

    assert_eq!(format_context(&[c]), "discharge_summary page 2:\nDischarged in stable condition.");
}

#[test]
fn test_context_falls_back_to_document_label() {
    let c = chunk("a", Some("Creatinine 1.1 mg/dL."));
    assert_eq!(format_context(&[c]), "Document doc-a:\nCreatinine 1.1 mg/dL.");
}

#[test]
fn test_context_sections_joined_by_blank_line() {
    let chunks = vec![chunk("a", Some("First.")), chunk("b", Some("Second."))];
    assert_eq!(
        format_context(&chunks),
        "Document doc-a:\nFirst.\n\nDocument doc-b:\nSecond."
    );
}

#[test]
fn test_blank_chunks_are_skipped_not_rendered() {
    let chunks = vec![chunk("a", Some("Kept one.")), chunk("b", Some("  ")), chunk("c", Some("Kept two."))];
    let rendered = format_context(&chunks);
    assert_eq!(rendered.matches("Kept").count(), 2);
    assert!(!rendered.contains("doc-b"));
}

#[test]
fn test_log_entries_carry_metadata_and_separator() {
    let mut first = chunk("a", Some("Cholesterol 180."));
    first.file_name = Some("labs.pdf".to_string());
    first.page_number = Some(3);
    first.chunk_index = Some(1);
    first.similarity = Some(0.812_34);
    let second = chunk("b", Some("Follow-up planned."));

    let rendered = format_for_log(&[first, second]);
    let entries: Vec<&str> = rendered.split("\n----\n").collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0],
        "[source: labs | document: doc-a | page: 3 | chunk: 1 | similarity: 0.8123]\nCholesterol 180."
    );
    assert_eq!(entries[1], "[source: Document doc-b | document: doc-b]\nFollow-up planned.");
}

#[test]
fn test_log_omits_absent_fields() {
    let rendered = format_for_log(&[chunk("a", Some("Text."))]);
    assert!(!rendered.contains("page:"));
    assert!(!rendered.contains("chunk:"));
    assert!(!rendered.contains("similarity:"));
}

#[test]
fn test_log_similarity_rounds_to_four_decimals() {
    let mut c = chunk("a", Some("Text."));
    c.similarity = Some(0.666_666_7);
    assert!(format_for_log(&[c]).contains("similarity: 0.6667"));
}
