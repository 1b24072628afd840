//! Recipe extraction from publisher web pages.
//!
//! A document is read by a fixed chain of strategies (embedded JSON-LD,
//! `itemprop` microdata, `<meta>` tags, then heading and class heuristics),
//! normalized into one [`RecipeSchema`], and finally handed to the override
//! registered for its site, if any.
//!
//! ```
//! let html = r#"<html><head><script type="application/ld+json">
//!     {"@type": "Recipe", "name": "Toast", "recipeIngredient": ["bread"]}
//! </script></head><body></body></html>"#;
//!
//! let recipe = recipe_scraper::scrape_html("https://example.com/toast", html).unwrap();
//! assert_eq!(recipe.name, "Toast");
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod model;
pub mod normalize;
pub mod overrides;
pub mod pipelines;

use log::{debug, warn};

pub use crate::config::ScraperConfig;
pub use crate::error::{ScrapeError, Stage, TransformError};
pub use crate::extractors::ParsingContext;
pub use crate::model::{Instruction, RecipeSchema, Scalar, Source, VideoObject};

/// Extract a recipe from a parsed document.
///
/// Runs the generic pipeline, the site override (unless disabled in
/// `config`) and the final usability check. Soft failures carry the record
/// built so far, see [`ScrapeError::record`].
pub fn scrape(
    context: &ParsingContext,
    config: &ScraperConfig,
) -> Result<RecipeSchema, ScrapeError> {
    let parsed = pipelines::generic::parse(context, config)?;
    let mut record = parsed.record;

    if let Some(site) = context.site() {
        if config.overrides.allows(&site) {
            let corrected = overrides::registry().dispatch(&site, record, &context.document)?;
            // transforms may read raw links from the document
            record = pipelines::generic::resolve_links(corrected, context);
        } else {
            debug!("Override for '{}' disabled by configuration", site);
        }
    }

    if record.is_usable() {
        debug!("Extracted '{}' from {}", record.name, context.url);
        return Ok(record);
    }

    warn!("No usable recipe in {}", context.url);
    match parsed.malformed {
        Some(message) => Err(ScrapeError::StructuredDataMalformed {
            message,
            record: Box::new(record),
        }),
        None => Err(ScrapeError::NoUsableData {
            record: Box::new(record),
        }),
    }
}

/// Parse `html` and extract a recipe with the default configuration
pub fn scrape_html(url: &str, html: &str) -> Result<RecipeSchema, ScrapeError> {
    let context = ParsingContext::from_html(url, html)?;
    scrape(&context, &ScraperConfig::default())
}
