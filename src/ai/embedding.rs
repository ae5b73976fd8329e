//! Embedding Service
//!
//! Text → vector contract used by the similarity deduplicator, plus the
//! cosine similarity measure applied to its output.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::ai::provider::{DEFAULT_OPENAI_BASE, validate_endpoint};
use crate::config::EmbeddingConfig;
use crate::types::{Result, WeaveError};

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed each text; one vector per input, in input order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

pub type SharedEmbedder = Arc<dyn Embedder>;

/// Embed a single text with one round trip
///
/// Blank text never reaches the service and yields an empty vector, whose
/// similarity to anything is 0.
pub async fn embed_one(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    embedder
        .embed(&[text.to_string()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| WeaveError::Embedding("No embedding returned".to_string()))
}

/// Cosine similarity: `dot(a,b) / (|a| * |b|)`, 0 when either norm is zero
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na.sqrt() * nb.sqrt())
    }
}

// =============================================================================
// OpenAI Embeddings
// =============================================================================

pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    api_base: String,
    model: String,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

impl OpenAiEmbedder {
    pub fn new(config: &EmbeddingConfig, api_key: SecretString) -> Result<Self> {
        let api_base = match &config.api_base {
            Some(base) => validate_endpoint(base, "Embedding")?,
            None => DEFAULT_OPENAI_BASE.to_string(),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeaveError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(
            "Generating OpenAI embeddings (model={}, inputs={})",
            self.model,
            texts.len()
        );

        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| WeaveError::Embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(WeaveError::Embedding(format!(
                "Embedding API error {}: {}",
                status, error_text
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| WeaveError::Embedding(format!("Failed to parse embeddings: {}", e)))?;

        order_embeddings(parsed.data, texts.len())
    }
}

/// Restore input order and check that every input got a vector
fn order_embeddings(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(WeaveError::Embedding(format!(
            "Expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}
