//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/articleweave/) and project (./articleweave.toml) configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants;
use crate::types::{Result, WeaveError};

/// The only text generation backend wired into the CLI
pub const SUPPORTED_PROVIDER: &str = "openai";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Text generation provider settings
    pub llm: LlmConfig,

    /// Embedding provider settings
    pub embedding: EmbeddingConfig,

    /// Research provider and cache settings
    pub research: ResearchConfig,

    /// Pipeline tuning
    pub generation: GenerationConfig,

    /// Export settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            research: ResearchConfig::default(),
            generation: GenerationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `WeaveError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.llm.provider != SUPPORTED_PROVIDER {
            return Err(WeaveError::Config(format!(
                "Unsupported LLM provider '{}' (only '{}' is available)",
                self.llm.provider, SUPPORTED_PROVIDER
            )));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(WeaveError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if !(self.llm.top_p > 0.0 && self.llm.top_p <= 1.0) {
            return Err(WeaveError::Config(format!(
                "LLM top_p must be in (0.0, 1.0], got {}",
                self.llm.top_p
            )));
        }

        let threshold = self.generation.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(WeaveError::Config(format!(
                "Similarity threshold must be in (0.0, 1.0], got {}",
                threshold
            )));
        }

        if self.llm.timeout_secs == 0
            || self.embedding.timeout_secs == 0
            || self.research.timeout_secs == 0
        {
            return Err(WeaveError::Config(
                "Provider timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.research.basic_max_results == 0 || self.research.deep_max_results == 0 {
            return Err(WeaveError::Config(
                "Research max results must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name; only `openai` is implemented
    pub provider: String,

    /// Model name
    pub model: String,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature for section drafting
    pub temperature: f32,

    /// Nucleus sampling for section drafting
    pub top_p: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: SUPPORTED_PROVIDER.to_string(),
            model: "gpt-4o-mini".to_string(),
            api_base: None,
            timeout_secs: 120,
            temperature: constants::generation::SECTION_TEMPERATURE,
            top_p: constants::generation::SECTION_TOP_P,
        }
    }
}

// =============================================================================
// Embedding Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub api_base: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            api_base: None,
            timeout_secs: 30,
        }
    }
}

// =============================================================================
// Research Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Research API base URL
    pub api_base: Option<String>,

    /// Research cache file (defaults to .cache/research_cache.json)
    pub cache_path: PathBuf,

    /// Results requested in basic mode
    pub basic_max_results: usize,

    /// Results requested in deep mode
    pub deep_max_results: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Retries for transient research failures
    pub max_retries: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            cache_path: PathBuf::from(".cache/research_cache.json"),
            basic_max_results: constants::research::BASIC_MAX_RESULTS,
            deep_max_results: constants::research::DEEP_MAX_RESULTS,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

// =============================================================================
// Generation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Cosine similarity at or above which a section is paraphrased
    pub similarity_threshold: f32,

    /// Embed each kept section once instead of on every comparison
    pub cache_embeddings: bool,

    /// Run Polish and Micro-refinement after deduplication
    pub polish: bool,

    /// Seed for structure-template selection (rotation when absent)
    pub style_seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: constants::dedupe::DEFAULT_THRESHOLD,
            cache_embeddings: true,
            polish: false,
            style_seed: None,
        }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

/// Export format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Txt,
    Json,
    #[default]
    All,
}

impl OutputFormat {
    pub fn includes_txt(&self) -> bool {
        matches!(self, OutputFormat::Txt | OutputFormat::All)
    }

    pub fn includes_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::All)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Txt => write!(f, "txt"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "json" => Ok(OutputFormat::Json),
            "all" => Ok(OutputFormat::All),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: txt, json, all",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory
    pub dir: PathBuf,

    /// Export format
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            format: OutputFormat::All,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
