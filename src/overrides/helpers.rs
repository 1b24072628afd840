use scraper::{ElementRef, Html};

use crate::error::TransformError;
use crate::extractors::{element_text, selector};
use crate::model::Instruction;
use crate::normalize::{self, list};

pub(super) fn select<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => document.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Cleaned text of the first element matching `css` that has any
pub(super) fn text_of(document: &Html, css: &str) -> Option<String> {
    select(document, css)
        .into_iter()
        .map(|el| normalize::clean_text(&element_text(el)))
        .find(|text| !text.is_empty())
}

/// Cleaned texts of every element matching `css`, empty ones dropped
pub(super) fn texts_of(document: &Html, css: &str) -> Vec<String> {
    list::clean(
        select(document, css)
            .into_iter()
            .map(|el| normalize::clean_text(&element_text(el)))
            .collect(),
        &[],
    )
}

/// Like [`texts_of`], but a page without any match is an error
pub(super) fn require_texts(document: &Html, css: &str) -> Result<Vec<String>, TransformError> {
    let texts = texts_of(document, css);
    if texts.is_empty() {
        return Err(TransformError::MissingElement(css.to_string()));
    }
    Ok(texts)
}

pub(super) fn attr_of(document: &Html, css: &str, attr: &str) -> Option<String> {
    select(document, css)
        .into_iter()
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

pub(super) fn steps(texts: Vec<String>) -> Vec<Instruction> {
    texts.into_iter().map(Instruction::step).collect()
}

/// Use `value` unless it is empty
pub(super) fn or_keep(value: Option<String>, current: String) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(current)
}
