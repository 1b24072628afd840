use std::time::Instant;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ScrapeError;
use crate::model::Instruction;
use crate::normalize::{links, text};

pub mod heuristic;
pub mod html_class;
pub mod json_ld;
pub mod meta;
pub mod microdata;

pub use self::heuristic::HeadingExtractor;
pub use self::html_class::HtmlClassExtractor;
pub use self::json_ld::JsonLdExtractor;

/// A parsed document together with where it came from
pub struct ParsingContext {
    pub url: String,
    pub document: Html,
    /// Base for relative links: `<base href>` or the document URL
    pub base: Option<Url>,
    deadline: Option<Instant>,
}

impl ParsingContext {
    pub fn new(url: &str, document: Html) -> Self {
        let base = links::document_base(&document, url);
        Self {
            url: url.to_string(),
            document,
            base,
            deadline: None,
        }
    }

    /// Parse raw markup. Input that cannot be treated as a DOM is rejected
    /// with [`ScrapeError::UnparseableDocument`].
    pub fn from_html(url: &str, html: &str) -> Result<Self, ScrapeError> {
        if html.trim().is_empty() {
            return Err(ScrapeError::UnparseableDocument("empty input".to_string()));
        }
        if html.contains('\0') {
            return Err(ScrapeError::UnparseableDocument(
                "input contains NUL bytes".to_string(),
            ));
        }

        let document = Html::parse_document(html);
        if !has_content(&document) {
            return Err(ScrapeError::UnparseableDocument(
                "no elements or text in document".to_string(),
            ));
        }

        Ok(Self::new(url, document))
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Site identifier derived from the document URL
    pub fn site(&self) -> Option<String> {
        crate::overrides::site_identifier(&self.url)
    }

    /// Resolve a possibly relative link against the document base
    pub fn resolve(&self, raw: &str) -> Option<String> {
        links::resolve(self.base.as_ref(), raw)
    }
}

fn has_content(document: &Html) -> bool {
    let root = document.root_element();
    // html, head and body are always synthesized
    root.text().any(|t| !t.trim().is_empty())
        || root.descendants().filter_map(ElementRef::wrap).count() > 3
}

/// Bounds for heuristic scanning
#[derive(Debug, Clone, Copy)]
pub struct ScanLimits {
    pub max_entries: usize,
    pub deadline: Option<Instant>,
}

impl ScanLimits {
    pub fn check(&self) -> Result<(), ScrapeError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ScrapeError::Timeout),
            _ => Ok(()),
        }
    }
}

/// Lists recovered by a heuristic strategy
#[derive(Debug, Default)]
pub struct Lists {
    pub ingredients: Vec<String>,
    pub instructions: Vec<Instruction>,
}

/// A heuristic strategy that recovers the recipe lists from page structure
pub trait Extractor {
    fn name(&self) -> &'static str;
    fn parse(&self, context: &ParsingContext, limits: &ScanLimits) -> Result<Lists, ScrapeError>;
}

/// Parse a selector that is built at runtime. Invalid selectors select nothing.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Whitespace-collapsed text content of an element
pub(crate) fn element_text(element: ElementRef) -> String {
    text::collapse(&element.text().collect::<Vec<_>>().join(" "))
}
