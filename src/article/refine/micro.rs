//! Micro-refinement: one global rewrite of the whole article
//!
//! The response is validated against a typed schema. Anything that does not
//! fit leaves the article exactly as it was.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::ai::prompt::PromptTemplates;
use crate::ai::{GenerationRequest, TextGenerator, extract_json_from_response};
use crate::constants::generation;
use crate::types::{Article, Level, Metadata, Section};

/// Why a refinement response was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaMismatch {
    #[error("response is not JSON: {0}")]
    NotJson(String),

    #[error("missing field '{0}'")]
    Missing(&'static str),

    #[error("'metadata' must be an object: {0}")]
    Metadata(String),

    #[error("'sections' must be a non-empty list of {{title, level, text}} records: {0}")]
    Sections(String),
}

#[derive(Serialize)]
struct RefinePayload<'a> {
    heading: &'a str,
    metadata: &'a Metadata,
    sections: &'a [Section],
    #[serde(skip_serializing_if = "Option::is_none")]
    audience: Option<&'a str>,
}

/// Metadata fields the rewrite may replace; absent fields are kept
#[derive(Debug, Default, Deserialize)]
struct MetadataPatch {
    title_tag: Option<String>,
    meta_description: Option<String>,
    primary_keywords: Option<Vec<String>>,
    secondary_keywords: Option<Vec<String>>,
    url_slug: Option<String>,
    table_of_contents: Option<Vec<String>>,
}

impl MetadataPatch {
    fn apply(self, base: &Metadata) -> Metadata {
        Metadata {
            title_tag: self.title_tag.unwrap_or_else(|| base.title_tag.clone()),
            meta_description: self
                .meta_description
                .unwrap_or_else(|| base.meta_description.clone()),
            primary_keywords: self
                .primary_keywords
                .unwrap_or_else(|| base.primary_keywords.clone()),
            secondary_keywords: self
                .secondary_keywords
                .unwrap_or_else(|| base.secondary_keywords.clone()),
            url_slug: self.url_slug.unwrap_or_else(|| base.url_slug.clone()),
            table_of_contents: self
                .table_of_contents
                .unwrap_or_else(|| base.table_of_contents.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SectionRecord {
    title: String,
    level: String,
    text: String,
}

/// Validate a refinement response into a replacement article
pub fn validate_refinement(raw: &str, current: &Article) -> Result<Article, SchemaMismatch> {
    let value =
        extract_json_from_response(raw).map_err(|e| SchemaMismatch::NotJson(e.to_string()))?;
    let Value::Object(mut root) = value else {
        return Err(SchemaMismatch::NotJson("top level is not an object".to_string()));
    };

    let metadata = root
        .remove("metadata")
        .ok_or(SchemaMismatch::Missing("metadata"))?;
    if !metadata.is_object() {
        return Err(SchemaMismatch::Metadata(format!("got {}", kind_of(&metadata))));
    }
    let patch: MetadataPatch =
        serde_json::from_value(metadata).map_err(|e| SchemaMismatch::Metadata(e.to_string()))?;

    let sections = root
        .remove("sections")
        .ok_or(SchemaMismatch::Missing("sections"))?;
    let records: Vec<SectionRecord> =
        serde_json::from_value(sections).map_err(|e| SchemaMismatch::Sections(e.to_string()))?;
    if records.is_empty() {
        return Err(SchemaMismatch::Sections("empty list".to_string()));
    }

    let sections = records
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let level = r
                .level
                .parse::<Level>()
                .map_err(|e| SchemaMismatch::Sections(format!("section {}: {}", i, e)))?;
            Ok(Section::new(r.title, level, r.text.trim()))
        })
        .collect::<Result<Vec<_>, SchemaMismatch>>()?;

    Ok(Article {
        heading: current.heading.clone(),
        metadata: patch.apply(&current.metadata),
        sections,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Run the global rewrite; returns the input unchanged on any failure
pub async fn micro_refine(
    generator: &dyn TextGenerator,
    article: Article,
    audience: Option<&str>,
) -> Article {
    let payload = RefinePayload {
        heading: &article.heading,
        metadata: &article.metadata,
        sections: &article.sections,
        audience,
    };
    let payload = match serde_json::to_string_pretty(&payload) {
        Ok(json) => json,
        Err(err) => {
            debug!("Could not serialize article for refinement: {}", err);
            return article;
        }
    };

    let request = GenerationRequest::new(
        PromptTemplates::writer_system(),
        PromptTemplates::micro_refine(&payload),
    )
    .sampling(
        generation::MICRO_REFINE_TEMPERATURE,
        generation::EDITORIAL_TOP_P,
    );

    let response = match generator.complete(&request).await {
        Ok(response) => response,
        Err(err) => {
            debug!("Micro-refinement request failed, keeping article: {}", err);
            return article;
        }
    };

    match validate_refinement(&response, &article) {
        Ok(refined) => {
            info!(
                "Micro-refinement applied ({} -> {} sections)",
                article.sections.len(),
                refined.sections.len()
            );
            refined
        }
        Err(mismatch) => {
            debug!("Micro-refinement response rejected: {}", mismatch);
            article
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::test_support::ScriptedGenerator;
    use crate::types::{FailureKind, LlmError};

    fn article() -> Article {
        Article {
            heading: "A Guide to Coffee Brewing".to_string(),
            metadata: Metadata {
                title_tag: "A Guide to Coffee Brewing".to_string(),
                url_slug: "a-guide-to-coffee-brewing".to_string(),
                primary_keywords: vec!["brewing".to_string()],
                ..Metadata::default()
            },
            sections: vec![
                Section::new("Introduction", Level::H2, "Coffee starts here."),
                Section::new("Conclusion", Level::H2, "Enjoy your cup."),
            ],
        }
    }

    #[tokio::test]
    async fn test_malformed_response_returns_article_unchanged() {
        let generator = ScriptedGenerator::replying(&["Sure! Here is a better article, enjoy."]);
        let before = article();
        let after = micro_refine(&generator, before.clone(), None).await;
        assert_eq!(after, before);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_service_failure_returns_article_unchanged() {
        let generator = ScriptedGenerator::new(vec![Err(LlmError::new(
            FailureKind::Connectivity,
            "timeout",
        ))]);
        let before = article();
        assert_eq!(micro_refine(&generator, before.clone(), Some("baristas")).await, before);
    }

    #[tokio::test]
    async fn test_valid_response_replaces_sections_and_patches_metadata() {
        let response = r#"```json
{
  "metadata": {"title_tag": "Brew Better Coffee", "primary_keywords": ["coffee"]},
  "sections": [
    {"title": "Why Brewing Matters", "level": "h2", "text": " Ever wondered? "},
    {"title": "Quick Wins", "level": "H3", "text": "Grind fresh."},
    {"title": "Conclusion", "level": "h2", "text": "Happy brewing."}
  ]
}
```"#;
        let generator = ScriptedGenerator::replying(&[response]);
        let refined = micro_refine(&generator, article(), None).await;

        assert_eq!(refined.heading, "A Guide to Coffee Brewing");
        assert_eq!(refined.metadata.title_tag, "Brew Better Coffee");
        assert_eq!(refined.metadata.primary_keywords, vec!["coffee"]);
        // absent fields retained
        assert_eq!(refined.metadata.url_slug, "a-guide-to-coffee-brewing");
        assert_eq!(refined.sections.len(), 3);
        assert_eq!(refined.sections[0].text, "Ever wondered?");
        assert_eq!(refined.sections[1].level, Level::H3);

        let request = &generator.requests()[0];
        assert!(request.user.contains("\"heading\": \"A Guide to Coffee Brewing\""));
        assert!(!request.user.contains("\"audience\""));
    }

    #[test]
    fn test_shape_failures() {
        let current = article();
        let cases = [
            (r#"[1, 2]"#, "top level"),
            (r#"{"sections": []}"#, "metadata"),
            (r#"{"metadata": [], "sections": []}"#, "array"),
            (r#"{"metadata": {}}"#, "sections"),
            (r#"{"metadata": {}, "sections": {}}"#, "records"),
            (r#"{"metadata": {}, "sections": []}"#, "empty"),
            (
                r#"{"metadata": {}, "sections": [{"title": "A", "level": "h4", "text": "x"}]}"#,
                "h4",
            ),
            (
                r#"{"metadata": {}, "sections": [{"title": "A", "text": "x"}]}"#,
                "level",
            ),
            (r#"{"metadata": {"title_tag": 5}, "sections": []}"#, "metadata"),
        ];

        for (raw, needle) in cases {
            let err = validate_refinement(raw, &current).unwrap_err();
            assert!(
                err.to_string().contains(needle),
                "{} -> {} (expected '{}')",
                raw,
                err,
                needle
            );
        }
    }
}
