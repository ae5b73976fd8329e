//! Section Composer
//!
//! Turns one outline entry plus evidence and style directives into a generation
//! request. Any service failure here is fatal to the run.

use tracing::{debug, warn};

use super::evidence::render_evidence;
use crate::ai::prompt::PromptTemplates;
use crate::ai::{GenerationRequest, TextGenerator};
use crate::types::{EvidenceItem, OutlineNode, Result, WeaveError};

/// Everything the composer needs to draft one section
#[derive(Debug, Clone, Copy)]
pub struct SectionBrief<'a> {
    pub topic: &'a str,
    pub heading: &'a str,
    pub node: &'a OutlineNode,
    pub audience: Option<&'a str>,
    pub structure_template: &'a str,
    pub micro_style: &'a str,
    pub evidence: &'a [EvidenceItem],
}

/// Build the generation request for a section
pub fn build_request(brief: &SectionBrief<'_>, temperature: f32, top_p: f32) -> GenerationRequest {
    let audience = match brief.audience.map(str::trim).filter(|a| !a.is_empty()) {
        Some(a) => format!("approachable, professional writing for {}", a),
        None => "approachable, professional writing for a general audience".to_string(),
    };

    let user = PromptTemplates::section_draft(
        brief.heading,
        &brief.node.title,
        &brief.node.level.as_str().to_uppercase(),
        brief.node.target_word_count,
    )
    .context_item("Topic", brief.topic)
    .context_item("Audience", &audience)
    .context_item("Article structure", brief.structure_template)
    .context_item("Section style", brief.micro_style)
    .section("Evidence", &render_evidence(brief.evidence))
    .build();

    GenerationRequest::new(PromptTemplates::writer_system(), user).sampling(temperature, top_p)
}

/// Draft one section; returns the trimmed response text
pub async fn compose_section(
    generator: &dyn TextGenerator,
    brief: &SectionBrief<'_>,
    temperature: f32,
    top_p: f32,
) -> Result<String> {
    let request = build_request(brief, temperature, top_p);
    debug!(
        "Drafting '{}' via {} ({} evidence items)",
        brief.node.title,
        generator.name(),
        brief.evidence.len()
    );

    match generator.complete(&request).await {
        Ok(text) => Ok(text.trim().to_string()),
        Err(err) => {
            warn!("Section '{}' failed: {}", brief.node.title, err);
            Err(WeaveError::Generation(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::test_support::ScriptedGenerator;
    use crate::types::{EvidenceTag, FailureKind, LlmError};

    fn brief<'a>(node: &'a OutlineNode, evidence: &'a [EvidenceItem]) -> SectionBrief<'a> {
        SectionBrief {
            topic: "coffee brewing",
            heading: "A Guide to Coffee Brewing",
            node,
            audience: Some("home baristas"),
            structure_template: "question-led walkthrough",
            micro_style: "story hook",
            evidence,
        }
    }

    #[test]
    fn test_request_embeds_directives() {
        let node = OutlineNode::h2("Understanding coffee brewing", 190);
        let evidence = vec![EvidenceItem {
            tag: EvidenceTag::Stat,
            text: "Sales rose 12%".to_string(),
        }];
        let request = build_request(&brief(&node, &evidence), 0.7, 0.9);

        assert!(request.system.contains("raw markup"));
        assert!(request.user.contains("190 words"));
        assert!(request.user.contains("H2 section \"Understanding coffee brewing\""));
        assert!(request.user.contains("for home baristas"));
        assert!(request.user.contains("Article structure: question-led walkthrough"));
        assert!(request.user.contains("Section style: story hook"));
        assert!(request.user.contains("- [stat] Sales rose 12%"));
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.top_p, 0.9);
    }

    #[test]
    fn test_request_marks_missing_evidence() {
        let node = OutlineNode::h3("Key Takeaways", 80);
        let mut b = brief(&node, &[]);
        b.audience = None;
        let request = build_request(&b, 0.7, 0.9);
        assert!(request.user.contains("- None available"));
        assert!(request.user.contains("H3 section"));
        assert!(request.user.contains("general audience"));
    }

    #[tokio::test]
    async fn test_compose_trims_response() {
        let generator = ScriptedGenerator::replying(&["\n  Brewing starts with water.  \n"]);
        let node = OutlineNode::h2("Introduction", 180);
        let text = compose_section(&generator, &brief(&node, &[]), 0.7, 0.9)
            .await
            .unwrap();
        assert_eq!(text, "Brewing starts with water.");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_compose_failure_keeps_kind() {
        let generator = ScriptedGenerator::new(vec![Err(LlmError::new(
            FailureKind::RateLimit,
            "Too Many Requests",
        ))]);
        let node = OutlineNode::h2("Introduction", 180);
        let err = compose_section(&generator, &brief(&node, &[]), 0.7, 0.9)
            .await
            .unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::RateLimit));
        assert!(err.user_message().contains("rate limit reached"));
    }
}
