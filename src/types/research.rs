//! Research data model
//!
//! Output of the research collaborator; read-only input to the article pipeline.

use serde::{Deserialize, Serialize};

/// Search depth requested from the research provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchDepth::Basic => write!(f, "basic"),
            SearchDepth::Advanced => write!(f, "advanced"),
        }
    }
}

/// One search request sent to the research provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchQuery {
    pub query: String,
    pub depth: SearchDepth,
    pub max_results: usize,
    pub include_raw_content: bool,
}

/// A single research source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDoc {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub raw_content: Option<String>,
}

/// Normalized research results for one topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchBundle {
    #[serde(default)]
    pub sources: Vec<SourceDoc>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}
