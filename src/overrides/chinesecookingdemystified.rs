use std::collections::HashMap;

use scraper::{ElementRef, Html};
use serde_json::Value;

use super::helpers;
use crate::error::TransformError;
use crate::extractors::element_text;
use crate::model::{RecipeSchema, Scalar, Source, VideoObject};
use crate::normalize::{self, date};

/// Newsletter layout: dates like `Jan 02, 2024`, lists after `<h3>`
/// headings and a YouTube player described in a data attribute
pub(super) fn transform(
    record: RecipeSchema,
    document: &Html,
) -> Result<RecipeSchema, TransformError> {
    let date_published = helpers::select(document, ".pencraft.pc-display-flex.pc-gap-4.pc-reset")
        .get(1)
        .and_then(|el| date::parse_date(&element_text(*el), &["%b %d, %Y"]))
        .map(|d| d.format("%Y-%m-%d").to_string());

    let ingredients: Vec<String> = heading(document, "Ingredients")
        .and_then(next_element)
        .map(|list| paragraphs(list.children().filter_map(ElementRef::wrap)))
        .unwrap_or_default();

    let instructions: Vec<String> = heading(document, "Process")
        .map(|h3| {
            paragraphs(
                h3.next_siblings()
                    .filter_map(ElementRef::wrap)
                    .take_while(|el| el.value().name() == "p"),
            )
        })
        .unwrap_or_default();

    let description = match helpers::text_of(document, "h3.subtitle") {
        Some(value) => Scalar::new(value, Source::Override),
        None => record.description.clone(),
    };

    let mut video = record.video.clone();
    if let Some(embed) = youtube_embed(document)? {
        video.get_or_insert_with(Vec::new).push(VideoObject::iframe(embed));
    }

    Ok(RecipeSchema {
        name: helpers::or_keep(helpers::text_of(document, ".post-header h1"), record.name.clone()),
        description,
        date_published: helpers::or_keep(date_published, record.date_published.clone()),
        ingredients: if ingredients.is_empty() {
            record.ingredients.clone()
        } else {
            Some(ingredients)
        },
        instructions: if instructions.is_empty() {
            record.instructions.clone()
        } else {
            Some(helpers::steps(instructions))
        },
        video,
        ..record
    })
}

fn heading<'a>(document: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    helpers::select(document, "h3")
        .into_iter()
        .find(|h3| element_text(*h3).contains(label))
}

fn next_element(element: ElementRef) -> Option<ElementRef> {
    element.next_siblings().find_map(ElementRef::wrap)
}

fn paragraphs<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    let mut texts = Vec::new();
    for element in elements {
        if element.value().name() == "p" {
            texts.push(normalize::clean_text(&element_text(element)));
        } else if let Some(sel) = crate::extractors::selector("p") {
            texts.extend(element.select(&sel).map(|p| normalize::clean_text(&element_text(p))));
        }
    }
    texts.retain(|t| !t.is_empty());
    texts
}

/// `data-attrs` holds a JSON object with the YouTube `videoId`
fn youtube_embed(document: &Html) -> Result<Option<String>, TransformError> {
    let Some(attrs) = helpers::attr_of(document, ".youtube-wrap", "data-attrs") else {
        return Ok(None);
    };

    let parsed: HashMap<String, Value> = serde_json::from_str(&attrs)
        .map_err(|e| TransformError::Invalid(format!("youtube data-attrs: {e}")))?;
    Ok(parsed
        .get("videoId")
        .and_then(Value::as_str)
        .map(|id| format!("https://youtube.com/embed/{id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <div class="post-header"><h1>Mapo Tofu</h1></div>
        <h3 class="subtitle">Sichuan classic</h3>
        <div class="pencraft pc-display-flex pc-gap-4 pc-reset">By Chris</div>
        <div class="pencraft pc-display-flex pc-gap-4 pc-reset">Mar 07, 2023</div>
        <h3>Ingredients</h3>
        <ul><li><p>400g tofu</p></li><li><p>2 tbsp doubanjiang</p></li></ul>
        <h3>Process</h3>
        <p>Blanch the tofu.</p>
        <p>Fry the paste.</p>
        <div class="footer">Subscribe</div>
        <div class="youtube-wrap" data-attrs='{"videoId":"abc123","startTime":null}'></div>
        </body></html>
    "#;

    #[test]
    fn test_newsletter_layout() {
        let doc = Html::parse_document(PAGE);
        let out = transform(RecipeSchema::default(), &doc).unwrap();

        assert_eq!(out.name, "Mapo Tofu");
        assert_eq!(out.description.value, "Sichuan classic");
        assert_eq!(out.date_published, "2023-03-07");
        assert_eq!(out.ingredients(), ["400g tofu", "2 tbsp doubanjiang"]);
        assert_eq!(out.instruction_texts(), vec!["Blanch the tofu.", "Fry the paste."]);

        let video = &out.video.unwrap()[0];
        assert_eq!(video.embed_url, "https://youtube.com/embed/abc123");
        assert!(video.is_iframe);
    }

    #[test]
    fn test_invalid_video_attrs() {
        let doc = Html::parse_document(
            r#"<html><body><div class="youtube-wrap" data-attrs="{oops"></div></body></html>"#,
        );
        let err = transform(RecipeSchema::default(), &doc).unwrap_err();
        assert!(matches!(err, TransformError::Invalid(_)));
    }
}
