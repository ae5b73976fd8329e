//! Article data model
//!
//! Outline nodes, drafted sections, SEO metadata and the finished article.

use serde::{Deserialize, Serialize};

/// Heading level of an outline node or section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    H2,
    H3,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::H2 => "h2",
            Level::H3 => "h3",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "h2" => Ok(Level::H2),
            "h3" => Ok(Level::H3),
            _ => Err(format!("Unknown heading level: {}. Valid values: h2, h3", s)),
        }
    }
}

/// One planned entry of the article outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub level: Level,
    pub title: String,
    pub target_word_count: usize,
}

impl OutlineNode {
    pub fn h2(title: impl Into<String>, target_word_count: usize) -> Self {
        Self {
            level: Level::H2,
            title: title.into(),
            target_word_count,
        }
    }

    pub fn h3(title: impl Into<String>, target_word_count: usize) -> Self {
        Self {
            level: Level::H3,
            title: title.into(),
            target_word_count,
        }
    }
}

/// A drafted section of the article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub level: Level,
    pub text: String,
}

impl Section {
    pub fn new(title: impl Into<String>, level: Level, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            level,
            text: text.into(),
        }
    }
}

/// SEO metadata derived from the request and the outline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title_tag: String,
    pub meta_description: String,
    pub primary_keywords: Vec<String>,
    pub secondary_keywords: Vec<String>,
    pub url_slug: String,
    pub table_of_contents: Vec<String>,
}

/// The finished article handed to exporters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub heading: String,
    pub metadata: Metadata,
    pub sections: Vec<Section>,
}

impl Article {
    pub fn word_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.text.split_whitespace().count())
            .sum()
    }
}

/// Classification of an evidence fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceTag {
    Stat,
    Quote,
    Case,
    Tool,
}

impl std::fmt::Display for EvidenceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvidenceTag::Stat => write!(f, "stat"),
            EvidenceTag::Quote => write!(f, "quote"),
            EvidenceTag::Case => write!(f, "case"),
            EvidenceTag::Tool => write!(f, "tool"),
        }
    }
}

/// A tagged fragment of research used to ground section prose
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub tag: EvidenceTag,
    pub text: String,
}

impl EvidenceItem {
    /// Bullet line as embedded in generation prompts
    pub fn render(&self) -> String {
        format!("- [{}] {}", self.tag, self.text)
    }
}
