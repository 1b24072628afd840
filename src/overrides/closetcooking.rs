use scraper::Html;

use super::helpers;
use crate::error::TransformError;
use crate::extractors::meta;
use crate::model::{RecipeSchema, Scalar, Source};
use crate::normalize::{self, date, duration, list, text};

/// The JSON-LD on these pages describes the blog post, not the recipe: the
/// record is rebuilt from the microdata card and Open Graph tags.
pub(super) fn transform(
    record: RecipeSchema,
    document: &Html,
) -> Result<RecipeSchema, TransformError> {
    let ingredients = helpers::require_texts(document, "li[itemprop='recipeIngredient']")?;
    let instructions = helpers::texts_of(document, "li[itemprop='recipeInstructions']");

    let meta_text = |key: &str| meta::read(document, key).map(|v| normalize::clean_text(&v));
    let itemprop_time = |prop: &str| {
        helpers::attr_of(document, &format!("meta[itemprop='{prop}']"), "content")
            .map(|v| duration::parse(&v))
    };

    let categories = helpers::texts_of(document, ".entry-categories a");
    let keywords = if categories.is_empty() {
        record.keywords.clone()
    } else {
        list::join_keywords(categories.iter().map(String::as_str))
    };

    let description = match meta_text("og:description") {
        Some(value) if !value.is_empty() => Scalar::new(value, Source::Override),
        _ => record.description.clone(),
    };

    Ok(RecipeSchema {
        name: helpers::or_keep(meta_text("og:title"), record.name.clone()),
        description,
        image: helpers::or_keep(
            meta_text("og:image"),
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
        prep_time: helpers::or_keep(itemprop_time("prepTime"), record.prep_time.clone()),
        cook_time: helpers::or_keep(itemprop_time("cookTime"), record.cook_time.clone()),
        recipe_yield: helpers::text_of(document, "span[itemprop='recipeYield']")
            .and_then(|y| text::first_integer(&y))
            .unwrap_or(record.recipe_yield),
        keywords,
        ingredients: Some(ingredients),
        instructions: Some(helpers::steps(instructions)),
        ..record
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuilds_from_card() {
        let doc = Html::parse_document(r#"
            <html><head>
            <meta property="og:title" content="Chicken Parmesan Sandwich">
            <meta property="og:image" content="https://www.closetcooking.com/img/cps.jpg">
            <meta property="article:published_time" content="2021-05-01T10:00:00+00:00">
            </head><body>
            <div class="entry-categories"><a>Sandwich</a><a>Chicken</a></div>
            <meta itemprop="prepTime" content="PT15M">
            <span itemprop="recipeYield">2 servings</span>
            <ul>
                <li itemprop="recipeIngredient">2 chicken breasts</li>
                <li itemprop="recipeIngredient">1 cup marinara</li>
            </ul>
            <ol><li itemprop="recipeInstructions">Bread the chicken.</li></ol>
            </body></html>
        "#);
        let record = RecipeSchema {
            name: "Blog post".to_string(),
            cook_time: "PT20M".to_string(),
            ..Default::default()
        };

        let out = transform(record, &doc).unwrap();
        assert_eq!(out.name, "Chicken Parmesan Sandwich");
        assert_eq!(out.image, "https://www.closetcooking.com/img/cps.jpg");
        assert_eq!(out.date_published, "2021-05-01");
        assert_eq!(out.prep_time, "PT15M");
        assert_eq!(out.cook_time, "PT20M");
        assert_eq!(out.recipe_yield, 2);
        assert_eq!(out.keywords, "Sandwich, Chicken");
        assert_eq!(out.ingredients(), ["2 chicken breasts", "1 cup marinara"]);
        assert_eq!(out.instruction_texts(), vec!["Bread the chicken."]);
    }

    #[test]
    fn test_missing_card_is_an_error() {
        let doc = Html::parse_document("<html><body><p>Gone</p></body></html>");
        let err = transform(RecipeSchema::default(), &doc).unwrap_err();
        assert!(matches!(err, TransformError::MissingElement(_)));
    }
}
