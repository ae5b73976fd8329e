//! SEO Metadata Generator
//!
//! Deterministic title/description/keywords/slug derivation. No model calls.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::constants::seo as limits;
use crate::types::Metadata;

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("valid regex"));

const SECONDARY_SUFFIXES: [&str; 6] = [
    "best practices",
    "tutorial",
    "examples",
    "tools",
    "checklist",
    "tips",
];

/// URL-friendly slug: lowercase ASCII letters, digits and single hyphens
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let stripped = NON_SLUG.replace_all(&lower, "");
    let hyphenated = SEPARATOR_RUN.replace_all(&stripped, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Clamp to `max_chars` characters without splitting a word
///
/// Cuts at the last whitespace at or before the limit; a first word longer than
/// the limit is hard-cut.
pub fn clamp(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let head = &text[..cut];

    // The limit falls on a word boundary
    if text[cut..].starts_with(char::is_whitespace) {
        return head.trim_end().to_string();
    }

    let sliced = head.trim_end();
    match sliced.rfind(char::is_whitespace) {
        Some(idx) => sliced[..idx].trim_end().to_string(),
        None => sliced.to_string(),
    }
}

/// Inputs for metadata derivation
#[derive(Debug, Clone, Copy)]
pub struct MetadataInput<'a> {
    pub topic: &'a str,
    pub heading: &'a str,
    pub audience: Option<&'a str>,
    pub outline_h2: &'a [String],
    pub research_keywords: &'a [String],
}

/// Derive SEO metadata from the request, outline and research keywords
pub fn generate_metadata(input: MetadataInput<'_>) -> Metadata {
    let base_keyword = slugify(input.topic).replace('-', " ");
    let title_source = if input.heading.trim().is_empty() {
        input.topic
    } else {
        input.heading
    };

    let audience_note = input
        .audience
        .filter(|a| !a.trim().is_empty())
        .map(|a| format!(" for {}", a.trim()))
        .unwrap_or_default();
    let description = format!(
        "Comprehensive guide to {}{}. Learn key concepts, best practices, and actionable tips.",
        input.topic, audience_note
    );

    let mut seen = HashSet::new();
    let mut primary_keywords: Vec<String> = input
        .research_keywords
        .iter()
        .filter(|k| seen.insert(k.as_str()))
        .take(limits::MAX_PRIMARY_KEYWORDS)
        .cloned()
        .collect();
    if primary_keywords.is_empty() {
        primary_keywords = vec![
            base_keyword.clone(),
            format!("what is {}", base_keyword),
            format!("{} guide", base_keyword),
        ];
    }

    let secondary_keywords = SECONDARY_SUFFIXES
        .iter()
        .map(|suffix| format!("{} {}", base_keyword, suffix))
        .take(limits::MAX_SECONDARY_KEYWORDS)
        .collect();

    Metadata {
        title_tag: clamp(title_source, limits::TITLE_MAX_CHARS),
        meta_description: clamp(&description, limits::DESCRIPTION_MAX_CHARS),
        primary_keywords,
        secondary_keywords,
        url_slug: slugify(title_source),
        table_of_contents: input.outline_h2.to_vec(),
    }
}
