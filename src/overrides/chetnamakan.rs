use scraper::node::Node;
use scraper::{ElementRef, Html};

use super::helpers;
use crate::error::TransformError;
use crate::extractors::{element_text, meta};
use crate::model::RecipeSchema;
use crate::normalize::{self, date};

/// Lists follow inline `<strong>` labels inside one paragraph, one entry per
/// `<br>`-separated line
pub(super) fn transform(
    record: RecipeSchema,
    document: &Html,
) -> Result<RecipeSchema, TransformError> {
    let ingredients = after_label(document, "Ingredients")?;
    let instructions = after_label(document, "Method")?
        .into_iter()
        .map(|step| step.trim_start_matches(&['–', '-'][..]).trim().to_string())
        .filter(|step| !step.is_empty())
        .collect();

    Ok(RecipeSchema {
        name: helpers::or_keep(
            helpers::text_of(document, "h1[itemprop=headline]"),
            record.name.clone(),
        ),
        date_published: helpers::or_keep(
            meta::read(document, "article:published_time").map(|v| date::normalize(&v)),
            record.date_published.clone(),
        ),
        date_modified: helpers::or_keep(
            meta::read(document, "article:modified_time").map(|v| date::normalize(&v)),
            record.date_modified.clone(),
        ),
        ingredients: Some(ingredients),
        instructions: Some(helpers::steps(instructions)),
        ..record
    })
}

fn after_label(document: &Html, label: &str) -> Result<Vec<String>, TransformError> {
    let strong = helpers::select(document, "strong")
        .into_iter()
        .find(|el| element_text(*el).contains(label))
        .ok_or_else(|| TransformError::MissingElement(format!("strong label '{label}'")))?;

    let entries = strong
        .next_siblings()
        .filter_map(|node| match node.value() {
            Node::Text(t) => Some(String::from(&**t)),
            Node::Element(el) if el.name() == "br" => None,
            Node::Element(_) => ElementRef::wrap(node).map(element_text),
            _ => None,
        })
        .map(|entry| normalize::clean_text(&entry))
        .filter(|entry| !entry.is_empty())
        .collect();
    Ok(entries)
}
