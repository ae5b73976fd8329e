//! Article generation pipeline
//!
//! Leaf stages first:
//! - [`evidence`]: research sources → tagged evidence items
//! - [`outline`]: topic + length → sized outline
//! - [`composer`]: one outline entry → one drafted section
//! - [`dedupe`]: embedding-based near-duplicate repair
//! - [`refine`]: polish and global micro-refinement
//! - [`seo`]: deterministic metadata
//!
//! [`ArticlePipeline`] runs them in order; [`Exporter`] writes the result.

pub mod composer;
pub mod dedupe;
pub mod evidence;
pub mod export;
pub mod outline;
pub mod pipeline;
pub mod refine;
pub mod seo;
pub mod style;

#[cfg(test)]
pub(crate) mod test_support;

pub use composer::{SectionBrief, compose_section};
pub use dedupe::Deduplicator;
pub use evidence::{curate_evidence, render_evidence};
pub use export::{Exporter, render_json, render_txt};
pub use outline::plan_outline;
pub use pipeline::{ArticlePipeline, ArticleRequest};
pub use refine::{SchemaMismatch, micro_refine, polish, refine};
pub use seo::{MetadataInput, clamp, generate_metadata, slugify};
pub use style::{RotatingStyleSelector, SeededStyleSelector, StyleSelector};
