//! Polish: markup stripping and per-H2 takeaway synthesis

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::ai::prompt::PromptTemplates;
use crate::ai::{GenerationRequest, TextGenerator};
use crate::constants::{generation, refine};
use crate::types::{Level, Section};

static STAR_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(\S(?:[^*\n]*?\S)?)\*").expect("valid regex"));
// `_` is a word character, so `\b` keeps snake_case identifiers intact
static UNDERSCORE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_(\S(?:[^_\n]*?\S)?)_\b").expect("valid regex"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("valid regex"));

fn strip_emphasis(line: &str) -> String {
    let line = line.replace("**", "").replace("__", "");
    let line = STAR_EMPHASIS.replace_all(&line, "$1");
    UNDERSCORE_EMPHASIS.replace_all(&line, "$1").into_owned()
}

/// Strip leading heading markers and emphasis markers from every line
pub fn strip_markup(text: &str) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let body = if trimmed.starts_with('#') {
                trimmed.trim_start_matches('#').trim_start()
            } else {
                line
            };
            strip_emphasis(body)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Remove a list marker (`-`, `*`, `•`, `1.`, `1)`) from the start of a line
fn strip_bullet_marker(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "\u{2022} "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest);
        }
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(rest);
        }
    }
    None
}

/// Bullets from a takeaway response
///
/// Marked list lines win; a response with no markers is read one bullet per line.
pub fn parse_bullets(response: &str) -> Vec<String> {
    let lines: Vec<&str> = response
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let marked: Vec<&str> = lines.iter().copied().filter_map(strip_bullet_marker).collect();
    let chosen = if marked.is_empty() { lines } else { marked };

    chosen
        .into_iter()
        .map(strip_markup)
        .filter(|b| !b.is_empty())
        .take(refine::MAX_TAKEAWAYS)
        .collect()
}

/// First sentences of the text, used when synthesis is unavailable
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace, unless the next
/// word starts lowercase ("e.g. a kettle"). Decimals never split.
pub fn sentence_bullets(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for end in SENTENCE_END.find_iter(text) {
        let continues = text[end.end()..]
            .chars()
            .next()
            .is_some_and(char::is_lowercase);
        if !continues {
            sentences.push(&text[start..end.start()]);
            start = end.end();
        }
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(|s| s.trim().trim_end_matches(['.', '!', '?']))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .take(refine::MAX_TAKEAWAYS)
        .collect()
}

fn takeaway_section(bullets: &[String]) -> Section {
    let text = bullets
        .iter()
        .map(|b| format!("- {}", b))
        .collect::<Vec<_>>()
        .join("\n");
    Section::new(refine::TAKEAWAYS_TITLE, Level::H3, text)
}

async fn synthesize_takeaways(generator: &dyn TextGenerator, section: &Section) -> Vec<String> {
    let request = GenerationRequest::new(
        PromptTemplates::writer_system(),
        PromptTemplates::takeaways(&section.title, &section.text),
    )
    .sampling(generation::TAKEAWAY_TEMPERATURE, generation::EDITORIAL_TOP_P);

    match generator.complete(&request).await {
        Ok(response) => {
            let bullets = parse_bullets(&response);
            if bullets.is_empty() {
                debug!("No bullets in takeaways for '{}', using sentences", section.title);
                sentence_bullets(&section.text)
            } else {
                bullets
            }
        }
        Err(err) => {
            warn!(
                "Takeaway synthesis failed for '{}', using sentences: {}",
                section.title, err
            );
            sentence_bullets(&section.text)
        }
    }
}

/// Polish every section; never fails
///
/// Each H2 gains a "Key Takeaways" H3 right after it whenever bullets result.
pub async fn polish(generator: &dyn TextGenerator, sections: Vec<Section>) -> Vec<Section> {
    let mut polished = Vec::with_capacity(sections.len() * 2);

    for mut section in sections {
        section.text = strip_markup(&section.text);

        let takeaways = if section.level == Level::H2 {
            synthesize_takeaways(generator, &section).await
        } else {
            Vec::new()
        };

        polished.push(section);
        if !takeaways.is_empty() {
            polished.push(takeaway_section(&takeaways));
        }
    }

    polished
}
