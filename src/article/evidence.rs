//! Evidence Curator
//!
//! Condenses research sources into at most 12 tagged, de-duplicated fragments.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::constants::evidence::MAX_ITEMS;
use crate::types::{EvidenceItem, EvidenceTag, ResearchBundle};

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?\s?%").expect("valid regex"));
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("valid regex"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+").expect("valid regex"));
static STANDALONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("valid regex"));

const QUOTE_MARKS: [char; 5] = ['"', '\u{201c}', '\u{201d}', '\u{00ab}', '\u{00bb}'];
const CASE_WORDS: [&str; 3] = ["case study", "case", "example"];
const TOOL_WORDS: [&str; 4] = ["tool", "platform", "software", "suite"];

/// Classify a fragment; first match wins
pub fn classify(text: &str) -> EvidenceTag {
    if PERCENT.is_match(text) || YEAR.is_match(text) || DECIMAL.is_match(text) {
        return EvidenceTag::Stat;
    }
    if text.contains(QUOTE_MARKS) {
        return EvidenceTag::Quote;
    }

    let lower = text.to_lowercase();
    if CASE_WORDS.iter().any(|w| lower.contains(w)) {
        return EvidenceTag::Case;
    }
    if TOOL_WORDS.iter().any(|w| lower.contains(w)) {
        return EvidenceTag::Tool;
    }

    if STANDALONE_NUMBER.is_match(text) {
        EvidenceTag::Stat
    } else {
        EvidenceTag::Case
    }
}

/// `"{title} — {snippet}"`, or whichever half is present
fn combine(title: &str, snippet: &str) -> String {
    match (title.trim(), snippet.trim()) {
        ("", "") => String::new(),
        (t, "") => t.to_string(),
        ("", s) => s.to_string(),
        (t, s) => format!("{} \u{2014} {}", t, s),
    }
}

/// Curate evidence from the first sources of a research bundle
pub fn curate_evidence(research: &ResearchBundle) -> Vec<EvidenceItem> {
    let mut seen = HashSet::new();

    research
        .sources
        .iter()
        .take(MAX_ITEMS)
        .map(|source| combine(&source.title, &source.snippet))
        .filter(|text| !text.is_empty())
        .filter(|text| seen.insert(text.clone()))
        .map(|text| EvidenceItem {
            tag: classify(&text),
            text,
        })
        .take(MAX_ITEMS)
        .collect()
}

/// Evidence as prompt bullet lines, or an explicit marker when empty
pub fn render_evidence(items: &[EvidenceItem]) -> String {
    if items.is_empty() {
        return "- None available".to_string();
    }
    items
        .iter()
        .map(EvidenceItem::render)
        .collect::<Vec<_>>()
        .join("\n")
}
