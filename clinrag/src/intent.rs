//! Query intent classification.
//!
//! [`classify_intent`] inspects raw question text and extracts the structured
//! signals that drive retrieval sizing and prompt selection: a requested
//! result count ("last 3 ..."), totality language ("all", "every"),
//! format preference, and recognized lab/vital terms. It is a pure function
//! with no I/O and never fails.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// How the physician asked for the answer to be shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatHint {
    /// Tabular output was requested.
    Table,
    /// A bulleted list was requested.
    Bullets,
    /// A brief prose answer was requested.
    Sentence,
    /// No recognizable preference.
    #[default]
    Unspecified,
}

/// Structured intent signals derived from one question.
///
/// Computed once per question, read-only afterward, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryIntent {
    /// Count parsed from "last N" phrasing, if present.
    pub requested_count: Option<usize>,
    /// Whether the question contains totality language.
    pub wants_exhaustive: bool,
    /// Whether semantic top-K alone is unlikely to suffice.
    pub wants_hybrid_search: bool,
    /// Requested answer shape.
    pub format_hint: FormatHint,
    /// Canonical lab/vital terms recognized in the question.
    pub lab_keywords: BTreeSet<String>,
}

impl QueryIntent {
    /// The single keyword used for the lexical channel: the longest string
    /// in `lab_keywords`, ties resolved to the first in set order.
    pub fn primary_keyword(&self) -> Option<&str> {
        self.lab_keywords
            .iter()
            .fold(None::<&str>, |best, candidate| match best {
                Some(current) if candidate.len() <= current.len() => best,
                _ => Some(candidate.as_str()),
            })
    }
}

static LAST_N: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\blast\s+(\d+)\b").expect("valid last-N pattern")
});
static TOTALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:all|every|complete|full)\b").expect("valid totality pattern")
});
static LIST_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\blists?\b").expect("valid list pattern")
});
static TABLE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:table|tables|tabular)\b").expect("valid table pattern")
});
static BULLET_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:bullet|bullets|list|lists)\b").expect("valid bullet pattern")
});
static SENTENCE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:brief|briefly|sentence|sentences|summary)\b")
        .expect("valid sentence pattern")
});

/// One dictionary entry: a word-boundary pattern and the canonical forms it
/// contributes when matched. Plural and singular forms are separate
/// candidates so the longest-keyword pick can choose between them.
struct LabTerm {
    pattern: &'static str,
    canonical: &'static [&'static str],
}

const LAB_TERMS: &[LabTerm] = &[
    LabTerm { pattern: r"hba1c|hb\s*a1c|a1c|hemoglobin\s+a1c|glycated\s+ha?emoglobin", canonical: &["hba1c", "a1c"] },
    LabTerm { pattern: r"glucose|blood\s+sugar", canonical: &["glucose"] },
    LabTerm { pattern: r"cholesterol", canonical: &["cholesterol"] },
    LabTerm { pattern: r"ldl", canonical: &["ldl"] },
    LabTerm { pattern: r"hdl", canonical: &["hdl"] },
    LabTerm { pattern: r"triglycerides?", canonical: &["triglyceride", "triglycerides"] },
    LabTerm { pattern: r"creatinine", canonical: &["creatinine"] },
    LabTerm { pattern: r"egfr", canonical: &["egfr"] },
    LabTerm { pattern: r"ha?emoglobin", canonical: &["hemoglobin"] },
    LabTerm { pattern: r"ha?ematocrit", canonical: &["hematocrit"] },
    LabTerm { pattern: r"platelets?", canonical: &["platelet", "platelets"] },
    LabTerm { pattern: r"wbc|white\s+blood\s+cells?|white\s+cell\s+count", canonical: &["wbc"] },
    LabTerm { pattern: r"sodium", canonical: &["sodium"] },
    LabTerm { pattern: r"potassium", canonical: &["potassium"] },
    LabTerm { pattern: r"kappa", canonical: &["kappa"] },
    LabTerm { pattern: r"lambda", canonical: &["lambda"] },
    LabTerm { pattern: r"ife|immunofixation", canonical: &["ife", "immunofixation"] },
    LabTerm { pattern: r"m[\s-]?protein", canonical: &["m-protein"] },
    LabTerm { pattern: r"blood\s+pressure|bp", canonical: &["blood pressure"] },
    LabTerm { pattern: r"heart\s+rate|pulse", canonical: &["heart rate"] },
    LabTerm { pattern: r"albumin", canonical: &["albumin"] },
    LabTerm { pattern: r"bilirubin", canonical: &["bilirubin"] },
    LabTerm { pattern: r"alt", canonical: &["alt"] },
    LabTerm { pattern: r"ast", canonical: &["ast"] },
    LabTerm { pattern: r"tsh|thyroid", canonical: &["tsh"] },
    LabTerm { pattern: r"inr", canonical: &["inr"] },
    LabTerm { pattern: r"troponin", canonical: &["troponin"] },
    LabTerm { pattern: r"bnp", canonical: &["bnp"] },
    LabTerm { pattern: r"weight", canonical: &["weight"] },
    LabTerm { pattern: r"bmi", canonical: &["bmi"] },
];

static LAB_PATTERNS: LazyLock<Vec<(Regex, &'static [&'static str])>> = LazyLock::new(|| {
    LAB_TERMS
        .iter()
        .map(|term| {
            let pattern = format!(r"(?i)\b(?:{})\b", term.pattern);
            (Regex::new(&pattern).expect("valid lab term pattern"), term.canonical)
        })
        .collect()
});

/// Classify one question. Pure and total.
///
/// # Example
///
/// ```rust
/// use clinrag::intent::classify_intent;
///
/// let intent = classify_intent("show me the last 3 HbA1c readings");
/// assert_eq!(intent.requested_count, Some(3));
/// assert!(intent.wants_hybrid_search);
/// assert!(intent.lab_keywords.contains("hba1c"));
/// ```
pub fn classify_intent(question: &str) -> QueryIntent {
    let lowered = question.to_lowercase();

    // A count too large for usize is treated as no count; the classifier
    // stays total either way.
    let requested_count = LAST_N
        .captures(question)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok());

    let wants_exhaustive = TOTALITY.is_match(question);

    let wants_hybrid_search = requested_count.is_some()
        || wants_exhaustive
        || lowered.contains("how many")
        || LIST_WORD.is_match(question);

    let format_hint = if TABLE_HINT.is_match(question) {
        FormatHint::Table
    } else if BULLET_HINT.is_match(question) {
        FormatHint::Bullets
    } else if SENTENCE_HINT.is_match(question) {
        FormatHint::Sentence
    } else {
        FormatHint::Unspecified
    };

    let mut lab_keywords = BTreeSet::new();
    for (pattern, canonical) in LAB_PATTERNS.iter() {
        if pattern.is_match(question) {
            for form in *canonical {
                lab_keywords.insert((*form).to_string());
            }
        }
    }

    QueryIntent {
        requested_count,
        wants_exhaustive,
        wants_hybrid_search,
        format_hint,
        lab_keywords,
    }
}
