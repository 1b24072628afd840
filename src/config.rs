use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::error::ScrapeError;

/// Engine configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScraperConfig {
    /// Heuristic DOM scanning
    #[serde(default)]
    pub heuristics: HeuristicsConfig,
    /// Site override dispatch
    #[serde(default)]
    pub overrides: OverridesConfig,
}

/// Configuration for the heuristic fallback strategies
#[derive(Debug, Deserialize, Clone)]
pub struct HeuristicsConfig {
    /// Whether heuristic scanning runs when structured data leaves lists empty
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum number of entries a strategy collects for one list
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Abort heuristic scanning after this many milliseconds
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_entries: default_max_entries(),
            deadline_ms: None,
        }
    }
}

impl HeuristicsConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

/// Configuration for site override dispatch
#[derive(Debug, Deserialize, Clone)]
pub struct OverridesConfig {
    /// Whether registered transforms run at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Site identifiers whose transform is skipped
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl Default for OverridesConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            disabled: Vec::new(),
        }
    }
}

impl OverridesConfig {
    /// Whether the transform registered for `site` may run
    pub fn allows(&self, site: &str) -> bool {
        self.enabled && !self.disabled.iter().any(|s| s.eq_ignore_ascii_case(site))
    }
}

// Default value functions
fn default_enabled() -> bool {
    true
}

fn default_max_entries() -> usize {
    250
}

impl ScraperConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_SCRAPER__ prefix
    /// 2. recipe_scraper.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_SCRAPER__HEURISTICS__DEADLINE_MS
    pub fn load() -> Result<Self, ScrapeError> {
        Ok(load_config()?)
    }
}

/// Load configuration from file and environment variables
///
/// See [`ScraperConfig::load`] for the source priority.
pub fn load_config() -> Result<ScraperConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe_scraper").required(false))
        // Use double underscore for nested: RECIPE_SCRAPER__OVERRIDES__ENABLED
        .add_source(
            Environment::with_prefix("RECIPE_SCRAPER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
