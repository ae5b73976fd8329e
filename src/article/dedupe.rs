//! Similarity Deduplicator
//!
//! Walks the drafted sections in order and compares each against the sections
//! already kept. The first kept section at or above the similarity threshold
//! triggers one paraphrase of the incoming text; earlier sections never change.

use tracing::{debug, info, warn};

use crate::ai::prompt::PromptTemplates;
use crate::ai::{Embedder, GenerationRequest, TextGenerator, cosine_similarity, embed_one};
use crate::constants::{dedupe::DEFAULT_THRESHOLD, generation};
use crate::types::{Result, Section};

struct Kept {
    section: Section,
    /// Embedding of `section.text`, when caching is on and it has been computed
    embedding: Option<Vec<f32>>,
}

pub struct Deduplicator<'a> {
    embedder: &'a dyn Embedder,
    generator: &'a dyn TextGenerator,
    threshold: f32,
    cache_embeddings: bool,
}

impl<'a> Deduplicator<'a> {
    pub fn new(embedder: &'a dyn Embedder, generator: &'a dyn TextGenerator) -> Self {
        Self {
            embedder,
            generator,
            threshold: DEFAULT_THRESHOLD,
            cache_embeddings: true,
        }
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// When off, every comparison re-embeds the kept section's current text
    pub fn cache_embeddings(mut self, enabled: bool) -> Self {
        self.cache_embeddings = enabled;
        self
    }

    /// Deduplicate in order; output has the same length and order as the input
    ///
    /// Embedding failures are fatal. A failed paraphrase keeps the original text.
    pub async fn run(&self, sections: Vec<Section>) -> Result<Vec<Section>> {
        let mut kept: Vec<Kept> = Vec::with_capacity(sections.len());
        let mut repaired = 0usize;

        for mut section in sections {
            let vector = embed_one(self.embedder, &section.text).await?;
            let collision = self.first_collision(&vector, &mut kept).await?;

            let mut embedding = self.cache_embeddings.then_some(vector);
            if let Some((idx, similarity)) = collision {
                debug!(
                    "'{}' matches '{}' (similarity {:.3})",
                    section.title, kept[idx].section.title, similarity
                );
                if let Some(text) = self.paraphrase(&section).await {
                    section.text = text;
                    embedding = None;
                    repaired += 1;
                }
            }

            kept.push(Kept { section, embedding });
        }

        if repaired > 0 {
            info!("Paraphrased {} near-duplicate section(s)", repaired);
        }
        Ok(kept.into_iter().map(|k| k.section).collect())
    }

    /// Index and similarity of the first kept section at or above the threshold
    async fn first_collision(
        &self,
        vector: &[f32],
        kept: &mut [Kept],
    ) -> Result<Option<(usize, f32)>> {
        for (idx, entry) in kept.iter_mut().enumerate() {
            let similarity = match &entry.embedding {
                Some(cached) => cosine_similarity(vector, cached),
                None => {
                    let fresh = embed_one(self.embedder, &entry.section.text).await?;
                    let similarity = cosine_similarity(vector, &fresh);
                    if self.cache_embeddings {
                        entry.embedding = Some(fresh);
                    }
                    similarity
                }
            };
            if similarity >= self.threshold {
                return Ok(Some((idx, similarity)));
            }
        }
        Ok(None)
    }

    async fn paraphrase(&self, section: &Section) -> Option<String> {
        let request = GenerationRequest::new(
            PromptTemplates::writer_system(),
            PromptTemplates::paraphrase(&section.text),
        )
        .sampling(
            generation::PARAPHRASE_TEMPERATURE,
            generation::EDITORIAL_TOP_P,
        );

        match self.generator.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!("Empty paraphrase for '{}', keeping original", section.title);
                None
            }
            Err(err) => {
                warn!(
                    "Paraphrase failed for '{}', keeping original: {}",
                    section.title, err
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::test_support::{LookupEmbedder, ScriptedGenerator};
    use crate::types::{FailureKind, Level, LlmError, WeaveError};

    fn sections(texts: &[&str]) -> Vec<Section> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Section::new(format!("Section {}", i), Level::H2, *t))
            .collect()
    }

    #[tokio::test]
    async fn test_at_threshold_replaces_later_section_only() {
        let embedder = LookupEmbedder::new(
            &[("Brew with fresh beans.", vec![1.0, 0.0]), ("Use fresh beans to brew.", vec![1.0, 0.0])],
            vec![0.0, 1.0],
        );
        let generator = ScriptedGenerator::replying(&["  Grind right before brewing.  "]);
        let input = sections(&["Brew with fresh beans.", "Use fresh beans to brew."]);

        let output = Deduplicator::new(&embedder, &generator)
            .threshold(1.0)
            .run(input.clone())
            .await
            .unwrap();

        assert_eq!(output.len(), 2);
        assert_eq!(output[0], input[0]);
        assert_ne!(output[1].text, input[1].text);
        assert_eq!(output[1].text, "Grind right before brewing.");
        assert_eq!(output[1].title, input[1].title);
        assert!(generator.requests()[0].user.contains("Use fresh beans to brew."));
    }

    #[tokio::test]
    async fn test_below_threshold_is_byte_identical() {
        let embedder = LookupEmbedder::new(
            &[("alpha", vec![1.0, 0.0]), ("beta", vec![0.6, 0.8])],
            vec![0.0, 1.0],
        );
        let generator = ScriptedGenerator::replying(&[]);
        let input = sections(&["alpha", "beta"]);

        let output = Deduplicator::new(&embedder, &generator)
            .run(input.clone())
            .await
            .unwrap();

        assert_eq!(output, input);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_only_first_match_is_resolved() {
        let embedder = LookupEmbedder::new(
            &[("a", vec![1.0, 0.0]), ("b", vec![1.0, 0.0]), ("c", vec![1.0, 0.0])],
            vec![0.0, 1.0],
        );
        let generator = ScriptedGenerator::replying(&["b rewritten", "c rewritten"]);

        let output = Deduplicator::new(&embedder, &generator)
            .run(sections(&["a", "b", "c"]))
            .await
            .unwrap();

        // c matches a before it is ever compared with b
        assert_eq!(output[0].text, "a");
        assert_eq!(output[1].text, "b rewritten");
        assert_eq!(output[2].text, "c rewritten");
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_embedding_calls_with_and_without_cache() {
        let pairs = [
            ("x", vec![1.0, 0.0, 0.0]),
            ("y", vec![0.0, 1.0, 0.0]),
            ("z", vec![0.0, 0.0, 1.0]),
        ];
        let generator = ScriptedGenerator::replying(&[]);

        let cached = LookupEmbedder::new(&pairs, vec![1.0, 1.0, 1.0]);
        Deduplicator::new(&cached, &generator)
            .run(sections(&["x", "y", "z"]))
            .await
            .unwrap();
        assert_eq!(cached.calls(), 3);

        let uncached = LookupEmbedder::new(&pairs, vec![1.0, 1.0, 1.0]);
        Deduplicator::new(&uncached, &generator)
            .cache_embeddings(false)
            .run(sections(&["x", "y", "z"]))
            .await
            .unwrap();
        // 3 incoming + (0 + 1 + 2) kept re-embeddings
        assert_eq!(uncached.calls(), 6);
    }

    #[tokio::test]
    async fn test_paraphrase_failure_keeps_original() {
        let embedder = LookupEmbedder::new(&[], vec![1.0, 0.0]);
        let generator = ScriptedGenerator::new(vec![Err(LlmError::new(
            FailureKind::Connectivity,
            "connection reset",
        ))]);
        let input = sections(&["same", "same"]);

        let output = Deduplicator::new(&embedder, &generator)
            .run(input.clone())
            .await
            .unwrap();
        assert_eq!(output, input);
    }

    #[tokio::test]
    async fn test_blank_drafts_skip_embedding_service() {
        let embedder = LookupEmbedder::failing();
        let generator = ScriptedGenerator::replying(&[]);
        let input = sections(&["", "  \n"]);

        let output = Deduplicator::new(&embedder, &generator)
            .run(input.clone())
            .await
            .unwrap();

        assert_eq!(output, input);
        assert_eq!(embedder.calls(), 0);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_fatal() {
        let embedder = LookupEmbedder::failing();
        let generator = ScriptedGenerator::replying(&[]);
        let err = Deduplicator::new(&embedder, &generator)
            .run(sections(&["one"]))
            .await
            .unwrap_err();
        assert!(matches!(err, WeaveError::Embedding(_)));
    }
}
