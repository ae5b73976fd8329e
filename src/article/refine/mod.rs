//! Editorial Refiner
//!
//! Two independent stages, run in this order when both are wanted:
//! - [`polish`]: local cleanup plus synthesized "Key Takeaways" subsections
//! - [`micro_refine`]: one global rewrite, applied only if it validates
//!
//! Neither stage can fail the run.

mod micro;
mod polish;

pub use micro::{SchemaMismatch, micro_refine, validate_refinement};
pub use polish::{parse_bullets, polish, sentence_bullets, strip_markup};

use tracing::info;

use crate::ai::TextGenerator;
use crate::types::Article;

/// Polish, then micro-refine
pub async fn refine(
    generator: &dyn TextGenerator,
    mut article: Article,
    audience: Option<&str>,
) -> Article {
    info!("Polishing {} sections", article.sections.len());
    article.sections = polish(generator, article.sections).await;

    info!("Applying micro-refinement");
    micro_refine(generator, article, audience).await
}
