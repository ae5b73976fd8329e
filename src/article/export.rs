//! Article export
//!
//! Plain-text and JSON renderings of a finished [`Article`], written as
//! `{slug}_{YYYYmmdd_HHMMSS}.{ext}` under the output directory.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::seo::slugify;
use crate::config::OutputFormat;
use crate::types::{Article, Level, Result, WeaveError};

/// Plain-text layout: metadata block, H1, then `H2:`/`H3:` sections
pub fn render_txt(article: &Article) -> String {
    let meta = &article.metadata;
    let mut lines = vec![
        "SEO Metadata".to_string(),
        format!("Title Tag: {}", meta.title_tag),
        format!("Meta Description: {}", meta.meta_description),
        format!("Primary Keywords: {}", meta.primary_keywords.join(", ")),
        format!("Secondary Keywords: {}", meta.secondary_keywords.join(", ")),
        format!("URL Slug: {}", meta.url_slug),
        String::new(),
        format!("H1: {}", article.heading),
        String::new(),
    ];

    for section in &article.sections {
        let prefix = match section.level {
            Level::H2 => "H2:",
            Level::H3 => "H3:",
        };
        lines.push(format!("{} {}", prefix, section.title));
        lines.push(section.text.trim().to_string());
        lines.push(String::new());
    }

    format!("{}\n", lines.join("\n").trim())
}

pub fn render_json(article: &Article) -> Result<String> {
    Ok(serde_json::to_string_pretty(article)?)
}

/// Writes articles into one output directory
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory and prove it is writable
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let probe = self.dir.join(".write_test");
        fs::write(&probe, "ok")
            .and_then(|_| fs::remove_file(&probe))
            .map_err(|e| {
                WeaveError::Export(format!(
                    "Output directory not writable: {}. {}",
                    self.dir.display(),
                    e
                ))
            })
    }

    /// File name stem: metadata slug (or slugified heading) plus timestamp
    pub fn file_stem(article: &Article, timestamp: &DateTime<Local>) -> String {
        let slug = if article.metadata.url_slug.is_empty() {
            slugify(&article.heading)
        } else {
            article.metadata.url_slug.clone()
        };
        format!("{}_{}", slug, timestamp.format("%Y%m%d_%H%M%S"))
    }

    /// Write every requested format; returns the written paths
    pub fn export(
        &self,
        article: &Article,
        format: OutputFormat,
        timestamp: &DateTime<Local>,
    ) -> Result<Vec<PathBuf>> {
        let stem = Self::file_stem(article, timestamp);
        let mut written = Vec::new();

        if format.includes_txt() {
            info!("Exporting to txt...");
            written.push(self.write(&stem, "txt", &render_txt(article))?);
        }
        if format.includes_json() {
            info!("Exporting to json...");
            written.push(self.write(&stem, "json", &render_json(article)?)?);
        }

        Ok(written)
    }

    fn write(&self, stem: &str, ext: &str, content: &str) -> Result<PathBuf> {
        let path = self.dir.join(format!("{}.{}", stem, ext));
        fs::write(&path, content)
            .map_err(|e| WeaveError::Export(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }
}
