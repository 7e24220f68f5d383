//! Tests for query intent classification.

use clinrag::{classify_intent, FormatHint};

#[test]
fn test_exhaustive_question_is_wide_and_hybrid() {
    let intent = classify_intent("Show me all cholesterol results");
    assert!(intent.wants_exhaustive);
    assert!(intent.wants_hybrid_search);
    assert_eq!(intent.requested_count, None);
    assert!(intent.lab_keywords.contains("cholesterol"));
}

#[test]
fn test_narrow_question_stays_semantic_only() {
    let intent = classify_intent("What was the latest creatinine?");
    assert!(!intent.wants_exhaustive);
    assert!(!intent.wants_hybrid_search);
    assert_eq!(intent.requested_count, None);
    assert_eq!(intent.format_hint, FormatHint::Unspecified);
    assert!(intent.lab_keywords.contains("creatinine"));
}

#[test]
fn test_last_n_sets_requested_count() {
    let intent = classify_intent("show me the last 3 HbA1c readings");
    assert_eq!(intent.requested_count, Some(3));
    assert!(intent.wants_hybrid_search);
    assert!(intent.lab_keywords.contains("hba1c"));
}

#[test]
fn test_absurd_count_is_treated_as_absent() {
    let intent = classify_intent("show the last 99999999999999999999999 glucose values");
    assert_eq!(intent.requested_count, None);
}

#[test]
fn test_how_many_triggers_hybrid() {
    let intent = classify_intent("How many troponin draws has she had?");
    assert!(intent.wants_hybrid_search);
    assert!(intent.lab_keywords.contains("troponin"));
}

#[test]
fn test_totality_words_respect_word_boundaries() {
    let intent = classify_intent("Any known allergies?");
    assert!(!intent.wants_exhaustive);
    assert!(!intent.wants_hybrid_search);

    let intent = classify_intent("Was the ball-park estimate recorded?");
    assert!(!intent.wants_exhaustive);
}

#[test]
fn test_format_words_respect_word_boundaries() {
    let intent = classify_intent("Did the tablet dosage change?");
    assert_eq!(intent.format_hint, FormatHint::Unspecified);
}

#[test]
fn test_table_hint_wins_over_other_hints() {
    let intent = classify_intent("Give me a table, not a bullet list");
    assert_eq!(intent.format_hint, FormatHint::Table);
}

#[test]
fn test_list_requests_bullets_and_hybrid() {
    let intent = classify_intent("list her current medications");
    assert_eq!(intent.format_hint, FormatHint::Bullets);
    assert!(intent.wants_hybrid_search);
}

#[test]
fn test_brief_requests_sentence_format() {
    let intent = classify_intent("briefly, how is he doing?");
    assert_eq!(intent.format_hint, FormatHint::Sentence);

    let intent = classify_intent("give me a quick summary of the visit");
    assert_eq!(intent.format_hint, FormatHint::Sentence);
}

#[test]
fn test_primary_keyword_prefers_longest() {
    let intent = classify_intent("How does the LDL compare to total cholesterol?");
    assert!(intent.lab_keywords.contains("ldl"));
    assert!(intent.lab_keywords.contains("cholesterol"));
    assert_eq!(intent.primary_keyword(), Some("cholesterol"));
}

#[test]
fn test_primary_keyword_tie_breaks_alphabetically() {
    let intent = classify_intent("ALT and AST since admission");
    assert!(intent.lab_keywords.contains("alt"));
    assert!(intent.lab_keywords.contains("ast"));
    assert_eq!(intent.primary_keyword(), Some("alt"));
}

#[test]
fn test_no_keywords_yields_no_primary() {
    let intent = classify_intent("How did the consultation go?");
    assert!(intent.lab_keywords.is_empty());
    assert_eq!(intent.primary_keyword(), None);
}

#[test]
fn test_spelling_variants_map_to_canonical_terms() {
    let intent = classify_intent("trend of glycated haemoglobin");
    assert!(intent.lab_keywords.contains("hba1c"));

    let intent = classify_intent("blood sugar overnight");
    assert!(intent.lab_keywords.contains("glucose"));

    let intent = classify_intent("any change in m-protein?");
    assert!(intent.lab_keywords.contains("m-protein"));
}

#[test]
fn test_plural_term_contributes_both_forms() {
    let intent = classify_intent("all triglycerides this year");
    assert!(intent.lab_keywords.contains("triglyceride"));
    assert!(intent.lab_keywords.contains("triglycerides"));
    // The longer plural wins the primary pick, matching how the values
    // usually appear in lab report text.
    assert_eq!(intent.primary_keyword(), Some("triglycerides"));
}
