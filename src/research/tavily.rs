//! Tavily search provider

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::ResearchProvider;
use crate::ai::provider::validate_endpoint;
use crate::config::ResearchConfig;
use crate::types::{ResearchQuery, Result, SourceDoc, WeaveError};

const DEFAULT_API_BASE: &str = "https://api.tavily.com";

pub struct TavilyProvider {
    api_key: SecretString,
    api_base: String,
    max_retries: usize,
    client: reqwest::Client,
}

impl std::fmt::Debug for TavilyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilyProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: String,
    max_results: usize,
    include_raw_content: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    raw_content: Option<String>,
}

/// One failed search attempt, with the HTTP status when the API answered
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct SearchFailure {
    status: Option<u16>,
    message: String,
}

impl SearchFailure {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Bad requests, auth and quota errors will not clear up on retry
    fn is_transient(&self) -> bool {
        !matches!(self.status, Some(400 | 401 | 403 | 432))
    }
}

impl From<SearchFailure> for WeaveError {
    fn from(failure: SearchFailure) -> Self {
        WeaveError::Research(failure.message)
    }
}

impl TavilyProvider {
    pub fn new(config: &ResearchConfig, api_key: SecretString) -> Result<Self> {
        let api_base = match &config.api_base {
            Some(base) => validate_endpoint(base, "Research")?,
            None => DEFAULT_API_BASE.to_string(),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeaveError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base,
            max_retries: config.max_retries,
            client,
        })
    }

    async fn search_once(
        &self,
        query: &ResearchQuery,
    ) -> std::result::Result<Vec<SourceDoc>, SearchFailure> {
        let body = SearchRequest {
            api_key: self.api_key.expose_secret(),
            query: &query.query,
            search_depth: query.depth.to_string(),
            max_results: query.max_results,
            include_raw_content: query.include_raw_content,
        };

        let response = self
            .client
            .post(format!("{}/search", self.api_base))
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchFailure::new(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(
                SearchFailure::new(format!("Search API error ({}): {}", status, text))
                    .status(status.as_u16()),
            );
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchFailure::new(format!("Failed to parse search response: {}", e)))?;

        Ok(normalize_results(parsed.results, query.include_raw_content))
    }
}

fn normalize_results(results: Vec<SearchResult>, keep_raw: bool) -> Vec<SourceDoc> {
    results
        .into_iter()
        .map(|r| SourceDoc {
            title: r.title.unwrap_or_default(),
            url: r.url.or(r.link).unwrap_or_default(),
            snippet: r.content.or(r.snippet).unwrap_or_default(),
            raw_content: if keep_raw { r.raw_content } else { None },
        })
        .collect()
}

#[async_trait]
impl ResearchProvider for TavilyProvider {
    async fn search(&self, query: &ResearchQuery) -> Result<Vec<SourceDoc>> {
        debug!(
            "Searching '{}' (depth={}, max_results={})",
            query.query, query.depth, query.max_results
        );

        let docs = (|| async { self.search_once(query).await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(500))
                    .with_max_times(self.max_retries),
            )
            .when(SearchFailure::is_transient)
            .notify(|err: &SearchFailure, delay: Duration| {
                warn!("Research request failed, retrying in {:?}: {}", delay, err);
            })
            .await?;
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_results_accepts_aliases() {
        let results: SearchResponse = serde_json::from_str(
            r#"{"results":[
                {"title":"A","url":"https://a","content":"alpha","raw_content":"RAW"},
                {"link":"https://b","snippet":"beta"}
            ]}"#,
        )
        .unwrap();

        let docs = normalize_results(results.results, false);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].snippet, "alpha");
        assert!(docs[0].raw_content.is_none());
        assert_eq!(docs[1].title, "");
        assert_eq!(docs[1].url, "https://b");
        assert_eq!(docs[1].snippet, "beta");
    }

    #[test]
    fn test_raw_content_kept_in_deep_mode() {
        let results = vec![SearchResult {
            title: None,
            url: None,
            link: None,
            content: None,
            snippet: None,
            raw_content: Some("RAW".to_string()),
        }];
        let docs = normalize_results(results, true);
        assert_eq!(docs[0].raw_content.as_deref(), Some("RAW"));
    }

    #[test]
    fn test_url_and_link_together_prefer_url() {
        let results: SearchResponse = serde_json::from_str(
            r#"{"results":[{"url":"https://a","link":"https://mirror","content":"alpha","snippet":"short"}]}"#,
        )
        .unwrap();

        let docs = normalize_results(results.results, false);
        assert_eq!(docs[0].url, "https://a");
        assert_eq!(docs[0].snippet, "alpha");
    }

    #[test]
    fn test_retry_decision_uses_status() {
        let unauthorized = SearchFailure::new("Search API error (401 Unauthorized): bad key").status(401);
        assert!(!unauthorized.is_transient());
        assert!(!SearchFailure::new("quota").status(432).is_transient());
        assert!(SearchFailure::new("overloaded").status(503).is_transient());
        // status text in the message alone does not decide
        assert!(SearchFailure::new("Search request failed: (401").is_transient());
        assert!(SearchFailure::new("Search request failed: connection reset").is_transient());
    }

    #[test]
    fn test_failure_becomes_research_error() {
        let err: WeaveError = SearchFailure::new("boom").status(500).into();
        assert!(matches!(err, WeaveError::Research(msg) if msg == "boom"));
    }
}
