//! ArticleWeave - Research-Grounded Long-Form Article Generator
//!
//! Plans, drafts and refines SEO articles from a topic and a target length,
//! using a web research provider, a text-generation service and an embedding
//! service.
//!
//! ## Core Features
//!
//! - **Outline Planning**: section count and word budgets sized to the target length
//! - **Evidence Curation**: tagged stat/quote/case/tool fragments from research
//! - **Section Drafting**: one generation request per outline entry with rotating styles
//! - **Deduplication**: embedding similarity with paraphrase repair
//! - **Editorial Refinement**: takeaway synthesis and a validated whole-article rewrite
//! - **SEO Metadata**: deterministic title, description, keywords and slug
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use articleweave::{ArticlePipeline, ArticleRequest, Config};
//!
//! let pipeline = ArticlePipeline::new(generator, embedder, research, cache, Config::default());
//! let request = ArticleRequest::new("coffee brewing", "A Guide to Coffee Brewing", 1500);
//! let article = pipeline.run(&request).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: generation and embedding services, prompts, JSON validation
//! - [`article`]: pipeline stages and export
//! - [`research`]: search provider and research cache
//! - [`config`]: layered configuration

pub mod ai;
pub mod article;
pub mod cli;
pub mod config;
pub mod constants;
pub mod research;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, OutputFormat};

// Error Types
pub use types::error::{FailureKind, LlmError, Result, WeaveError};

// Data Model
pub use types::{Article, EvidenceItem, Level, Metadata, OutlineNode, ResearchBundle, Section};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use article::{ArticlePipeline, ArticleRequest, Exporter};

// =============================================================================
// Service Re-exports
// =============================================================================

pub use ai::{Embedder, OpenAiEmbedder, OpenAiProvider, TextGenerator};
pub use research::{JsonFileCache, MemoryCache, ResearchCache, ResearchProvider, TavilyProvider};
