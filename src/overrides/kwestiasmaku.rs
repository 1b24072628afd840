use scraper::Html;

use super::helpers;
use crate::error::TransformError;
use crate::extractors::meta;
use crate::model::{RecipeSchema, Scalar, Source};
use crate::normalize::{self, date, text};

pub(super) fn transform(
    record: RecipeSchema,
    document: &Html,
) -> Result<RecipeSchema, TransformError> {
    // skladniki: ingredients, przygotowanie: preparation
    let ingredients = helpers::require_texts(document, ".field-name-field-skladniki li")?;
    let instructions = helpers::texts_of(document, ".field-name-field-przygotowanie li");

    let description = match helpers::text_of(document, "span[itemprop=description]") {
        Some(value) => Scalar::new(value, Source::Override),
        None => record.description.clone(),
    };

    Ok(RecipeSchema {
        name: helpers::or_keep(
            meta::read(document, "og:title").map(|v| normalize::clean_text(&v)),
            record.name.clone(),
        ),
        description,
        image: helpers::or_keep(
            meta::read(document, "og:image").map(|v| normalize::clean_text(&v)),
            record.image.clone(),
        ),
        date_published: helpers::or_keep(
            meta::read(document, "article:published_time").map(|v| date::normalize(&v)),
            record.date_published.clone(),
        ),
        date_modified: helpers::or_keep(
            meta::read(document, "article:modified_time").map(|v| date::normalize(&v)),
            record.date_modified.clone(),
        ),
        recipe_yield: helpers::text_of(document, ".field-name-field-ilosc-porcji")
            .and_then(|y| text::first_integer(&y))
            .unwrap_or(record.recipe_yield),
        ingredients: Some(ingredients),
        instructions: Some(helpers::steps(instructions)),
        ..record
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polish_fields() {
        let doc = Html::parse_document(r#"
            <html><head><meta property="og:title" content="Pierogi ruskie"></head><body>
            <span itemprop="description">Klasyczne pierogi</span>
            <div class="field-name-field-ilosc-porcji">Liczba porcji: 4</div>
            <div class="field-name-field-skladniki"><ul>
                <li>500 g mąki</li>
                <li>
                    250 ml   wody
                </li>
            </ul></div>
            <div class="field-name-field-przygotowanie"><ul><li>Zagnieść ciasto.</li></ul></div>
            </body></html>
        "#);

        let out = transform(RecipeSchema::default(), &doc).unwrap();
        assert_eq!(out.name, "Pierogi ruskie");
        assert_eq!(out.description.value, "Klasyczne pierogi");
        assert_eq!(out.recipe_yield, 4);
        assert_eq!(out.ingredients(), ["500 g mąki", "250 ml wody"]);
        assert_eq!(out.instruction_texts(), vec!["Zagnieść ciasto."]);
    }
}
