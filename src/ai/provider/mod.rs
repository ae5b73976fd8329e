//! Text Generation Provider Abstraction
//!
//! Defines the `TextGenerator` trait used by every pipeline stage that asks a model
//! for prose. Failures come back as a classified [`LlmError`] so that each caller
//! decides for itself whether a failure is fatal or absorbed.

mod openai;

pub use openai::OpenAiProvider;
pub(crate) use openai::DEFAULT_API_BASE as DEFAULT_OPENAI_BASE;

pub use crate::types::{ErrorClassifier, FailureKind, LlmError};

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::types::{Result, WeaveError};

/// One chat-style generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System directive
    pub system: String,
    /// User directive
    pub user: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling
    pub top_p: f32,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: crate::constants::generation::SECTION_TEMPERATURE,
            top_p: crate::constants::generation::SECTION_TOP_P,
        }
    }

    pub fn sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }
}

/// Text generation service: directive in, free text out
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation round trip
    async fn complete(&self, request: &GenerationRequest) -> std::result::Result<String, LlmError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Shared generator handle
pub type SharedGenerator = Arc<dyn TextGenerator>;

/// Validate a provider endpoint URL
///
/// Only http/https schemes are accepted. The trailing slash is removed so that
/// paths can be appended with `format!("{}/path", base)`.
pub fn validate_endpoint(endpoint: &str, what: &str) -> Result<String> {
    let url = url::Url::parse(endpoint).map_err(|e| {
        WeaveError::Config(format!("Invalid {} endpoint URL '{}': {}", what, endpoint, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(WeaveError::Config(format!(
            "{} endpoint must use http or https scheme, got: {}",
            what,
            url.scheme()
        )));
    }

    if url.scheme() == "http"
        && let Some(host) = url.host_str()
        && !matches!(host, "localhost" | "127.0.0.1" | "::1")
    {
        warn!("{} endpoint uses plain http on {}", what, host);
    }

    let mut result = url.to_string();
    if result.ends_with('/') {
        result.pop();
    }
    Ok(result)
}
