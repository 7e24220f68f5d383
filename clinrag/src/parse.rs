//! Parsing model output into a structured headline-and-bullets answer.
//!
//! Summary prompts ask the model for a `HEADLINE:` line followed by a
//! `BULLETS:` section, but model output drifts. The parser is total: it
//! works through progressively looser layers and always produces a
//! [`StructuredAnswer`] with at least one bullet, never an error.

use serde::{Deserialize, Serialize};

/// Headline used when the model output carries no `HEADLINE:` line.
pub const DEFAULT_HEADLINE: &str = "Overall Status: Clinical Update";

const HEADLINE_PREFIX: &str = "HEADLINE:";
const BULLETS_PREFIX: &str = "BULLETS:";
const HEADLINE_LEAD: &str = "Overall Status:";

/// A clinical answer reduced to a one-line headline and bullet points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    /// One-line status, always starting with `Overall Status:`.
    pub headline: String,
    /// Bullet texts with list markers stripped; never empty.
    pub bullets: Vec<String>,
}

/// Parse raw model output into a structured answer.
///
/// Four layers run in order until one yields bullets:
///
/// 1. Scaffold: a case-insensitive `HEADLINE:` line sets the headline
///    (prefixed with `Overall Status:` when missing; later lines overwrite
///    earlier ones) and every non-empty line after a `BULLETS:` line becomes
///    a bullet once markers are stripped.
/// 2. Marker scan: lines opening with `-`, `•`, `*`, or a leading digit with
///    a period in the first three characters.
/// 3. Line scan: every non-empty line that is not a `HEADLINE:` line.
/// 4. Whole text: the trimmed input as a single bullet, even when empty.
pub fn parse_structured(raw: &str) -> StructuredAnswer {
    let mut headline: Option<String> = None;
    let mut bullets: Vec<String> = Vec::new();
    let mut in_bullets = false;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if has_prefix_ignore_case(line, HEADLINE_PREFIX) {
            let text = line.splitn(2, ':').nth(1).unwrap_or("").trim();
            headline = Some(if text.starts_with(HEADLINE_LEAD) {
                text.to_string()
            } else {
                format!("{HEADLINE_LEAD} {text}")
            });
        } else if has_prefix_ignore_case(line, BULLETS_PREFIX) {
            in_bullets = true;
        } else if in_bullets {
            let bullet = strip_marker(line);
            if !bullet.is_empty() {
                bullets.push(bullet.to_string());
            }
        }
    }

    if bullets.is_empty() {
        for line in raw.lines() {
            let line = line.trim();
            if starts_with_marker(line) {
                let bullet = strip_marker(line);
                if !bullet.is_empty() {
                    bullets.push(bullet.to_string());
                }
            }
        }
    }

    if bullets.is_empty() {
        bullets = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !has_prefix_ignore_case(line, HEADLINE_PREFIX))
            .map(String::from)
            .collect();
    }

    if bullets.is_empty() {
        bullets.push(raw.trim().to_string());
    }

    StructuredAnswer {
        headline: headline.unwrap_or_else(|| DEFAULT_HEADLINE.to_string()),
        bullets,
    }
}

fn has_prefix_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn starts_with_marker(line: &str) -> bool {
    let Some(first) = line.chars().next() else {
        return false;
    };
    matches!(first, '-' | '•' | '*')
        || (first.is_ascii_digit() && line.chars().take(3).any(|c| c == '.'))
}

fn strip_marker(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '-' | '•' | '*' | '.' | ' ') || c.is_ascii_digit())
        .trim()
}
