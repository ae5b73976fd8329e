//! Generate Command
//!
//! Research a topic, write the article and export it.
//!
//! Usage:
//!   articleweave --topic "coffee brewing" --heading "A Guide to Coffee Brewing" --word-count 1500

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tokio::runtime::Runtime;
use tracing::info;

use crate::ai::{OpenAiEmbedder, OpenAiProvider};
use crate::article::{ArticlePipeline, ArticleRequest, Exporter};
use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader, OPENAI_KEY_VAR, OutputFormat, TAVILY_KEY_VAR};
use crate::research::{JsonFileCache, TavilyProvider};
use crate::types::{Result, WeaveError};

/// Generate run options (consolidated CLI parameters)
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub topic: String,
    pub heading: String,
    pub word_count: usize,
    pub audience: Option<String>,
    pub deep: bool,
    pub polish: bool,
    /// Export format override
    pub format: Option<OutputFormat>,
    /// Similarity threshold override
    pub threshold: Option<f32>,
    /// Output directory override
    pub output: Option<PathBuf>,
    /// Project config file override
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

impl GenerateOptions {
    fn request(&self, config: &Config) -> ArticleRequest {
        ArticleRequest {
            topic: self.topic.trim().to_string(),
            heading: self.heading.trim().to_string(),
            word_count: self.word_count,
            audience: self.audience.clone(),
            deep: self.deep,
            polish: self.polish || config.generation.polish,
        }
    }

    /// Fold CLI overrides into the loaded configuration
    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(threshold) = self.threshold {
            config.generation.similarity_threshold = threshold;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(dir) = &self.output {
            config.output.dir = dir.clone();
        }
        config.validate()
    }
}

/// Run the full generation flow
pub fn run(options: GenerateOptions) -> Result<()> {
    let out = Output::quiet(options.quiet);

    let mut config = match &options.config {
        Some(path) => ConfigLoader::load_with_project(path)?,
        None => ConfigLoader::load()?,
    };
    options.apply(&mut config)?;

    let request = options.request(&config);
    request.validate()?;

    let exporter = Exporter::new(&config.output.dir);
    exporter.prepare()?;

    let openai_key = ConfigLoader::require_secret(OPENAI_KEY_VAR)?;
    let tavily_key = ConfigLoader::require_secret(TAVILY_KEY_VAR)?;

    let generator = Arc::new(OpenAiProvider::new(&config.llm, openai_key.clone())?);
    let embedder = Arc::new(OpenAiEmbedder::new(&config.embedding, openai_key)?);
    let research = Arc::new(TavilyProvider::new(&config.research, tavily_key)?);
    let cache = Arc::new(JsonFileCache::new(&config.research.cache_path));

    let format = config.output.format;
    let model = generator.model().to_string();
    let pipeline = ArticlePipeline::new(generator, embedder, research, cache, config);

    out.header(&format!("Writing \"{}\"", request.topic));
    out.field("Model", &model);
    let rt = Runtime::new().map_err(WeaveError::Io)?;
    let article = rt.block_on(pipeline.run(&request))?;
    info!(
        "Article ready: {} sections, {} words",
        article.sections.len(),
        article.word_count()
    );

    let written = exporter.export(&article, format, &Local::now())?;

    out.success("Article generated successfully.");
    out.field("Saved to", &exporter.dir().display().to_string());
    for path in &written {
        out.field("File", &path.display().to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_and_validate() {
        let options = GenerateOptions {
            topic: "  coffee  ".to_string(),
            heading: "Guide".to_string(),
            word_count: 900,
            threshold: Some(0.8),
            format: Some(OutputFormat::Txt),
            output: Some(PathBuf::from("articles")),
            ..GenerateOptions::default()
        };
        let mut config = Config::default();
        options.apply(&mut config).unwrap();

        assert!((config.generation.similarity_threshold - 0.8).abs() < f32::EPSILON);
        assert_eq!(config.output.format, OutputFormat::Txt);
        assert_eq!(config.output.dir, PathBuf::from("articles"));

        let request = options.request(&config);
        assert_eq!(request.topic, "coffee");
        assert!(!request.polish);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let options = GenerateOptions {
            threshold: Some(0.0),
            ..GenerateOptions::default()
        };
        assert!(options.apply(&mut Config::default()).is_err());
    }

    #[test]
    fn test_config_polish_enables_refinement() {
        let mut config = Config::default();
        config.generation.polish = true;
        let request = GenerateOptions::default().request(&config);
        assert!(request.polish);
    }
}
