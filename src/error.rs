use std::fmt;

use thiserror::Error;

use crate::model::RecipeSchema;

/// Stage of the extraction that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Turning the raw input into a DOM
    Markup,
    /// Reading embedded JSON-LD payloads
    JsonLd,
    /// Reading `itemprop` attributes
    Microdata,
    /// Reading Open Graph and generic `<meta>` tags
    Meta,
    /// Heading and class based DOM scanning
    Heuristic,
    /// Site-specific override transform
    Override,
    /// Final check for the minimally required fields
    Validation,
    /// Loading the engine configuration
    Config,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Markup => "markup",
            Stage::JsonLd => "json-ld",
            Stage::Microdata => "microdata",
            Stage::Meta => "meta",
            Stage::Heuristic => "heuristic",
            Stage::Override => "override",
            Stage::Validation => "validation",
            Stage::Config => "config",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while extracting a recipe from a document
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The input cannot be treated as a DOM at all
    #[error("Unparseable document: {0}")]
    UnparseableDocument(String),

    /// An embedded structured-data payload exists but fails to decode.
    /// Carries the record built from the remaining sources.
    #[error("Malformed structured data: {message}")]
    StructuredDataMalformed {
        message: String,
        record: Box<RecipeSchema>,
    },

    /// Every strategy ran but the name or both ingredient and instruction lists are empty
    #[error("No usable recipe data found in document")]
    NoUsableData { record: Box<RecipeSchema> },

    /// A registered site transform failed; `record` is the pre-transform record
    #[error("Override for '{site}' failed: {source}")]
    TransformFailure {
        site: String,
        #[source]
        source: TransformError,
        record: Box<RecipeSchema>,
    },

    /// Heuristic scanning ran past the caller's deadline
    #[error("Heuristic scanning exceeded the deadline")]
    Timeout,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ScrapeError {
    /// The stage that raised the error
    pub fn stage(&self) -> Stage {
        match self {
            ScrapeError::UnparseableDocument(_) => Stage::Markup,
            ScrapeError::StructuredDataMalformed { .. } => Stage::JsonLd,
            ScrapeError::NoUsableData { .. } => Stage::Validation,
            ScrapeError::TransformFailure { .. } => Stage::Override,
            ScrapeError::Timeout => Stage::Heuristic,
            ScrapeError::Config(_) => Stage::Config,
        }
    }

    /// The partial or pre-transform record carried by soft failures
    pub fn record(&self) -> Option<&RecipeSchema> {
        match self {
            ScrapeError::StructuredDataMalformed { record, .. }
            | ScrapeError::NoUsableData { record }
            | ScrapeError::TransformFailure { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<RecipeSchema> {
        match self {
            ScrapeError::StructuredDataMalformed { record, .. }
            | ScrapeError::NoUsableData { record }
            | ScrapeError::TransformFailure { record, .. } => Some(*record),
            _ => None,
        }
    }
}

/// Errors raised by site-specific override transforms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// An element the transform relies on is not in the document
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// The element exists but its content cannot be used
    #[error("Invalid content: {0}")]
    Invalid(String),
}
