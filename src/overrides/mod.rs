//! Per-site corrections applied after the generic pipeline.
//!
//! Each publisher with known quirks registers one [`Transform`] under its
//! site identifier. Transforms receive the generic record and the raw
//! document and return a corrected record; sites without a transform keep
//! the generic result.

use std::collections::HashMap;
use std::sync::OnceLock;

use log::{debug, warn};
use scraper::Html;
use url::Url;

use crate::error::{ScrapeError, TransformError};
use crate::model::RecipeSchema;

mod helpers;

mod bbcgoodfood;
mod chetnamakan;
mod chinesecookingdemystified;
mod closetcooking;
mod epicurious;
mod examplesite;
mod kwestiasmaku;
mod veganpratique;

/// A site-specific correction
pub type Transform = fn(RecipeSchema, &Html) -> Result<RecipeSchema, TransformError>;

const SITES: &[(&str, Transform)] = &[
    ("bbcgoodfood", bbcgoodfood::transform),
    ("chetnamakan", chetnamakan::transform),
    ("chinesecookingdemystified", chinesecookingdemystified::transform),
    ("closetcooking", closetcooking::transform),
    ("epicurious", epicurious::transform),
    ("examplesite", examplesite::transform),
    ("kwestiasmaku", kwestiasmaku::transform),
    ("vegan-pratique", veganpratique::transform),
];

/// Read-only mapping from site identifier to transform
pub struct Registry {
    transforms: HashMap<&'static str, Transform>,
}

impl Registry {
    pub fn new(entries: impl IntoIterator<Item = (&'static str, Transform)>) -> Self {
        Self {
            transforms: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, site: &str) -> Option<Transform> {
        self.transforms.get(site).copied()
    }

    pub fn contains(&self, site: &str) -> bool {
        self.transforms.contains_key(site)
    }

    pub fn sites(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.transforms.keys().copied()
    }

    /// Apply the transform registered for `site`, or return the record
    /// unchanged when there is none.
    ///
    /// On failure the error carries the record as it was before the
    /// transform ran.
    pub fn dispatch(
        &self,
        site: &str,
        record: RecipeSchema,
        document: &Html,
    ) -> Result<RecipeSchema, ScrapeError> {
        let Some(transform) = self.get(site) else {
            debug!("No override registered for '{}'", site);
            return Ok(record);
        };

        debug!("Applying override for '{}'", site);
        let before = record.clone();
        transform(record, document).map_err(|source| {
            warn!("Override for '{}' failed: {}", site, source);
            ScrapeError::TransformFailure {
                site: site.to_string(),
                source,
                record: Box::new(before),
            }
        })
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The transforms known to the engine, built once on first use
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| Registry::new(SITES.iter().copied()))
}

/// Subdomains that never name the publisher
const SERVICE_LABELS: &[&str] = &[
    "recipes", "receitas", "recepten", "cooking", "news", "mobile", "dashboard", "fr", "blog",
    "old",
];

/// Publishers whose label is the middle one even with a custom subdomain
const MIDDLE_LABELS: &[&str] = &["wikibooks", "tesco", "expressen"];

/// Reduce a document URL to the publisher label used as registry key:
/// `https://www.bbcgoodfood.com/recipes/x` -> `bbcgoodfood`
pub fn site_identifier(raw_url: &str) -> Option<String> {
    let url = Url::parse(raw_url).ok()?;
    let host = url.host_str()?;
    let parts: Vec<&str> = host.split('.').collect();

    let label = match parts.as_slice() {
        [_, "m", site, _] => *site,
        [_, site, _, _] => *site,
        [sub, site, _] if SERVICE_LABELS.contains(sub) || MIDDLE_LABELS.contains(site) => *site,
        ["www", site, _] => *site,
        [sub, _, _] => *sub,
        [.., site, _] => *site,
        _ => return None,
    };

    (!label.is_empty()).then(|| label.to_string())
}
