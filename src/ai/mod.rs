//! AI Integration Layer
//!
//! Text generation, prompts, embeddings, and response validation used by the article pipeline.

pub mod embedding;
pub mod prompt;
pub mod provider;
pub mod validation;

pub use embedding::{Embedder, OpenAiEmbedder, SharedEmbedder, cosine_similarity, embed_one};
pub use provider::{
    ErrorClassifier, FailureKind, GenerationRequest, LlmError, OpenAiProvider, SharedGenerator,
    TextGenerator,
};
pub use validation::{JsonRepairer, extract_json_from_response};
