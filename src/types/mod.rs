pub mod article;
pub mod error;
pub mod research;

pub use article::{Article, EvidenceItem, EvidenceTag, Level, Metadata, OutlineNode, Section};
pub use error::{ErrorClassifier, FailureKind, LlmError, Result, WeaveError};
pub use research::{ResearchBundle, ResearchQuery, SearchDepth, SourceDoc};
