//! Article Pipeline
//!
//! Strictly sequential: research → outline → metadata → evidence → one draft
//! per outline entry → deduplication → optional refinement. A drafting failure
//! aborts the run; every later stage absorbs its own failures.

use std::sync::Arc;
use tracing::info;

use super::composer::{SectionBrief, compose_section};
use super::dedupe::Deduplicator;
use super::evidence::curate_evidence;
use super::outline::{h2_titles, plan_outline};
use super::refine::refine;
use super::seo::{MetadataInput, generate_metadata};
use super::style::{StyleSelector, selector_for};
use crate::ai::{SharedEmbedder, SharedGenerator};
use crate::config::Config;
use crate::research::{ResearchCache, ResearchProvider, gather_research};
use crate::types::{Article, ResearchBundle, Result, Section, WeaveError};

/// What to write
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRequest {
    pub topic: String,
    pub heading: String,
    pub word_count: usize,
    pub audience: Option<String>,
    pub deep: bool,
    pub polish: bool,
}

impl ArticleRequest {
    pub fn new(topic: impl Into<String>, heading: impl Into<String>, word_count: usize) -> Self {
        Self {
            topic: topic.into(),
            heading: heading.into(),
            word_count,
            audience: None,
            deep: false,
            polish: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(WeaveError::InvalidRequest("topic must not be empty".to_string()));
        }
        if self.word_count == 0 {
            return Err(WeaveError::InvalidRequest(
                "word count must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn audience(&self) -> Option<&str> {
        self.audience.as_deref().filter(|a| !a.trim().is_empty())
    }

    fn heading_or_topic(&self) -> &str {
        if self.heading.trim().is_empty() {
            &self.topic
        } else {
            &self.heading
        }
    }
}

pub struct ArticlePipeline {
    generator: SharedGenerator,
    embedder: SharedEmbedder,
    research: Arc<dyn ResearchProvider>,
    cache: Arc<dyn ResearchCache>,
    styles: Box<dyn StyleSelector>,
    config: Config,
}

impl ArticlePipeline {
    pub fn new(
        generator: SharedGenerator,
        embedder: SharedEmbedder,
        research: Arc<dyn ResearchProvider>,
        cache: Arc<dyn ResearchCache>,
        config: Config,
    ) -> Self {
        Self {
            generator,
            embedder,
            research,
            cache,
            styles: selector_for(config.generation.style_seed),
            config,
        }
    }

    pub fn with_style_selector(mut self, styles: Box<dyn StyleSelector>) -> Self {
        self.styles = styles;
        self
    }

    /// Gather research (through the cache), then write the article
    pub async fn run(&self, request: &ArticleRequest) -> Result<Article> {
        request.validate()?;

        info!("Starting research...");
        let research = gather_research(
            self.research.as_ref(),
            self.cache.as_ref(),
            &request.topic,
            request.deep,
            &self.config.research,
        )
        .await?;

        self.write(request, &research).await
    }

    /// Write the article from an already gathered research bundle
    pub async fn write(&self, request: &ArticleRequest, research: &ResearchBundle) -> Result<Article> {
        request.validate()?;
        let heading = request.heading_or_topic();
        let audience = request.audience();

        info!("Building outline and metadata...");
        let outline = plan_outline(&request.topic, request.word_count);
        let toc = h2_titles(&outline);
        let metadata = generate_metadata(MetadataInput {
            topic: &request.topic,
            heading: &request.heading,
            audience,
            outline_h2: &toc,
            research_keywords: &research.keywords,
        });
        let evidence = curate_evidence(research);

        info!("Generating content...");
        let template = self.styles.structure_template();
        let mut sections = Vec::with_capacity(outline.len());
        for (idx, node) in outline.iter().enumerate() {
            info!("Writing section {}/{}: {}", idx + 1, outline.len(), node.title);
            let brief = SectionBrief {
                topic: &request.topic,
                heading,
                node,
                audience,
                structure_template: template,
                micro_style: self.styles.micro_style(idx),
                evidence: &evidence,
            };
            let text = compose_section(
                self.generator.as_ref(),
                &brief,
                self.config.llm.temperature,
                self.config.llm.top_p,
            )
            .await?;
            sections.push(Section::new(node.title.clone(), node.level, text));
        }

        info!("De-duplicating and paraphrasing similar sections...");
        let sections = Deduplicator::new(self.embedder.as_ref(), self.generator.as_ref())
            .threshold(self.config.generation.similarity_threshold)
            .cache_embeddings(self.config.generation.cache_embeddings)
            .run(sections)
            .await?;

        let article = Article {
            heading: heading.to_string(),
            metadata,
            sections,
        };

        if request.polish {
            Ok(refine(self.generator.as_ref(), article, audience).await)
        } else {
            Ok(article)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::style::{MICRO_STYLES, SeededStyleSelector};
    use crate::article::test_support::{DistinctEmbedder, ScriptedGenerator};
    use crate::research::MemoryCache;
    use crate::types::{FailureKind, Level, LlmError, ResearchQuery, SourceDoc};
    use async_trait::async_trait;

    struct StaticResearch;

    #[async_trait]
    impl ResearchProvider for StaticResearch {
        async fn search(&self, _query: &ResearchQuery) -> Result<Vec<SourceDoc>> {
            Ok(vec![SourceDoc {
                title: "Pour-over brewing ratios".to_string(),
                url: "https://example.com/ratios".to_string(),
                snippet: "Most baristas use 16 grams of water per gram of coffee.".to_string(),
                raw_content: None,
            }])
        }
    }

    fn pipeline(generator: Arc<ScriptedGenerator>) -> ArticlePipeline {
        ArticlePipeline::new(
            generator,
            Arc::new(DistinctEmbedder::new()),
            Arc::new(StaticResearch),
            Arc::new(MemoryCache::new()),
            Config::default(),
        )
        .with_style_selector(Box::new(SeededStyleSelector::new(1)))
    }

    fn drafts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Draft number {}.", i)).collect()
    }

    #[tokio::test]
    async fn test_sections_mirror_outline() {
        // 500 words: intro + 5 bodies + 1 subsection + conclusion
        let texts = drafts(8);
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let generator = Arc::new(ScriptedGenerator::replying(&refs));
        let request = ArticleRequest::new("coffee brewing", "A Guide to Coffee Brewing", 500);

        let article = pipeline(generator.clone()).run(&request).await.unwrap();

        let outline = plan_outline("coffee brewing", 500);
        assert_eq!(article.sections.len(), outline.len());
        for (section, node) in article.sections.iter().zip(&outline) {
            assert_eq!(section.title, node.title);
            assert_eq!(section.level, node.level);
        }
        assert_eq!(article.sections[0].text, "Draft number 0.");
        assert_eq!(article.heading, "A Guide to Coffee Brewing");
        assert_eq!(article.metadata.table_of_contents, h2_titles(&outline));
        assert_eq!(article.metadata.url_slug, "a-guide-to-coffee-brewing");
        // "pour-over" is not purely alphabetic
        assert_eq!(article.metadata.primary_keywords[0], "brewing");

        let requests = generator.requests();
        assert_eq!(requests.len(), 8);
        assert!(requests[1].user.contains(MICRO_STYLES[1]));
        assert!(requests[0].user.contains("16 grams"));
    }

    #[tokio::test]
    async fn test_drafting_failure_aborts_run() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Ok("Intro.".to_string()),
            Err(LlmError::new(FailureKind::Auth, "invalid api key").status(401)),
            Ok("never used".to_string()),
        ]));
        let request = ArticleRequest::new("tea", "Tea", 500);

        let err = pipeline(generator.clone()).run(&request).await.unwrap_err();

        assert_eq!(err.failure_kind(), Some(FailureKind::Auth));
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_polish_adds_takeaways() {
        let mut script: Vec<std::result::Result<String, LlmError>> =
            drafts(8).into_iter().map(Ok).collect();
        // one takeaway reply per H2 (7), then a rejected micro-refinement
        script.extend((0..7).map(|_| Ok("- A point".to_string())));
        script.push(Ok("no json here".to_string()));
        let generator = Arc::new(ScriptedGenerator::new(script));

        let mut request = ArticleRequest::new("tea", "", 500);
        request.polish = true;
        let article = pipeline(generator.clone()).run(&request).await.unwrap();

        assert_eq!(article.heading, "tea");
        assert_eq!(generator.calls(), 16);
        let takeaways = article
            .sections
            .iter()
            .filter(|s| s.level == Level::H3 && s.text == "- A point")
            .count();
        assert_eq!(takeaways, 7);
        assert_eq!(article.sections.len(), 15);
    }

    #[tokio::test]
    async fn test_invalid_request() {
        let generator = Arc::new(ScriptedGenerator::replying(&[]));
        let err = pipeline(generator)
            .run(&ArticleRequest::new("  ", "Heading", 500))
            .await
            .unwrap_err();
        assert!(matches!(err, WeaveError::InvalidRequest(_)));
    }
}
