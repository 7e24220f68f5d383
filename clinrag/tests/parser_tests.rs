//! Tests for the layered structured-answer parser.

use clinrag::{parse_structured, DEFAULT_HEADLINE};

#[test]
fn test_scaffold_output_parses_cleanly() {
    let parsed = parse_structured("HEADLINE: Overall Status: Stable\nBULLETS:\n- A1c improving\n- Kidney function steady");
    assert_eq!(parsed.headline, "Overall Status: Stable");
    assert_eq!(parsed.bullets, vec!["A1c improving", "Kidney function steady"]);
}

#[test]
fn test_headline_gets_prefix_when_missing() {
    let parsed = parse_structured("HEADLINE: Improving steadily\nBULLETS:\n- On track");
    assert_eq!(parsed.headline, "Overall Status: Improving steadily");
}

#[test]
fn test_later_headline_overwrites_earlier() {
    let parsed = parse_structured("HEADLINE: First\nHEADLINE: Second\nBULLETS:\n- A");
    assert_eq!(parsed.headline, "Overall Status: Second");
}

#[test]
fn test_empty_headline_text_keeps_bare_prefix() {
    let parsed = parse_structured("HEADLINE:\nBULLETS:\n- A");
    assert_eq!(parsed.headline, "Overall Status: ");
}

#[test]
fn test_prefixes_match_case_insensitively() {
    let parsed = parse_structured("headline: Fine\nbullets:\n- a point");
    assert_eq!(parsed.headline, "Overall Status: Fine");
    assert_eq!(parsed.bullets, vec!["a point"]);
}

#[test]
fn test_unmarked_lines_inside_bullets_section_are_kept() {
    let parsed = parse_structured("BULLETS:\nplain line\n- marked line");
    assert_eq!(parsed.headline, DEFAULT_HEADLINE);
    assert_eq!(parsed.bullets, vec!["plain line", "marked line"]);
}

#[test]
fn test_marker_scan_recovers_bullets_without_scaffold() {
    let parsed = parse_structured(
        "Here is the summary you asked for:\n- first finding\n• second finding\n* third finding\n1. fourth finding",
    );
    assert_eq!(parsed.headline, DEFAULT_HEADLINE);
    assert_eq!(
        parsed.bullets,
        vec!["first finding", "second finding", "third finding", "fourth finding"]
    );
}

#[test]
fn test_numbered_marker_needs_period_in_first_three_chars() {
    // "12. x" qualifies as a numbered bullet, "1234. x" does not, so the
    // parser falls through to the line scan and keeps both lines whole.
    let parsed = parse_structured("12. twelve");
    assert_eq!(parsed.bullets, vec!["twelve"]);

    let parsed = parse_structured("1234. not a marker");
    assert_eq!(parsed.bullets, vec!["1234. not a marker"]);
}

#[test]
fn test_line_scan_excludes_headline_lines() {
    let parsed = parse_structured("HEADLINE: Stable\nPatient doing well.\nNo new labs.");
    assert_eq!(parsed.headline, "Overall Status: Stable");
    assert_eq!(parsed.bullets, vec!["Patient doing well.", "No new labs."]);
}

#[test]
fn test_plain_prose_becomes_line_bullets() {
    let parsed = parse_structured("The patient is stable.\nNo new findings.");
    assert_eq!(parsed.headline, DEFAULT_HEADLINE);
    assert_eq!(parsed.bullets, vec!["The patient is stable.", "No new findings."]);
}

#[test]
fn test_single_line_prose_is_one_bullet() {
    let parsed = parse_structured("  Patient stable, no new labs.  ");
    assert_eq!(parsed.headline, DEFAULT_HEADLINE);
    assert_eq!(parsed.bullets, vec!["Patient stable, no new labs."]);
}

#[test]
fn test_empty_input_degrades_to_empty_bullet() {
    let parsed = parse_structured("");
    assert_eq!(parsed.headline, DEFAULT_HEADLINE);
    assert_eq!(parsed.bullets, vec![""]);

    let parsed = parse_structured("   \n  \t ");
    assert_eq!(parsed.bullets, vec![""]);
}

#[test]
fn test_compound_markers_are_fully_stripped() {
    let parsed = parse_structured("BULLETS:\n- 1. • mixed markers");
    assert_eq!(parsed.bullets, vec!["mixed markers"]);
}

#[test]
fn test_marker_only_lines_are_dropped() {
    let parsed = parse_structured("BULLETS:\n- \n- real content\n-");
    assert_eq!(parsed.bullets, vec!["real content"]);
}
