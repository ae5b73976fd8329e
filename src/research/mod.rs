//! Research Gathering
//!
//! Runs one search for the article topic (through the research cache) and turns
//! the raw sources into a [`ResearchBundle`] of sources, insights and keywords.

mod cache;
mod tavily;

pub use cache::{JsonFileCache, MemoryCache, ResearchCache, research_key};
pub use tavily::TavilyProvider;

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::info;

use crate::config::ResearchConfig;
use crate::constants::research as limits;
use crate::types::{ResearchBundle, ResearchQuery, Result, SearchDepth, SourceDoc};

/// External search service
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    async fn search(&self, query: &ResearchQuery) -> Result<Vec<SourceDoc>>;
}

/// Shape the search request for a topic
pub fn build_query(topic: &str, deep: bool, config: &ResearchConfig) -> ResearchQuery {
    if deep {
        ResearchQuery {
            query: topic.to_string(),
            depth: SearchDepth::Advanced,
            max_results: config.deep_max_results,
            include_raw_content: true,
        }
    } else {
        ResearchQuery {
            query: topic.to_string(),
            depth: SearchDepth::Basic,
            max_results: config.basic_max_results,
            include_raw_content: false,
        }
    }
}

/// Derive insights and keywords from the leading sources
pub fn assemble_bundle(sources: Vec<SourceDoc>) -> ResearchBundle {
    let mut insights = Vec::new();
    let mut keywords = Vec::new();

    for source in sources.iter().take(limits::MINED_SOURCES) {
        let text = format!("{} {}", source.title, source.snippet);
        for token in text.split_whitespace() {
            let token = token
                .to_lowercase()
                .trim_matches(|c: char| ",.()[]{}:;!?".contains(c))
                .to_string();
            let len = token.chars().count();
            if (limits::KEYWORD_MIN_CHARS..=limits::KEYWORD_MAX_CHARS).contains(&len)
                && token.chars().all(char::is_alphabetic)
            {
                keywords.push(token);
            }
        }
        if !source.title.is_empty() {
            insights.push(source.title.clone());
        }
    }

    ResearchBundle {
        sources,
        insights: dedupe(insights, limits::MAX_INSIGHTS),
        keywords: dedupe(keywords, limits::MAX_KEYWORDS),
    }
}

fn dedupe(items: Vec<String>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(limit)
        .collect()
}

/// Read-through research: cached bundle if present, otherwise search and store
pub async fn gather_research(
    provider: &dyn ResearchProvider,
    cache: &dyn ResearchCache,
    topic: &str,
    deep: bool,
    config: &ResearchConfig,
) -> Result<ResearchBundle> {
    let key = research_key(topic, deep);
    if let Some(bundle) = cache.get(&key) {
        info!("Using cached research ({} sources)", bundle.sources.len());
        return Ok(bundle);
    }

    let query = build_query(topic, deep, config);
    let sources = provider.search(&query).await?;
    let bundle = assemble_bundle(sources);

    cache.put(&key, &bundle)?;
    info!("Found {} sources", bundle.sources.len());
    Ok(bundle)
}
