use log::debug;
use scraper::{ElementRef, Html};
use std::collections::HashMap;

use super::{element_text, selector, Extractor, Lists, ParsingContext, ScanLimits};
use crate::error::ScrapeError;
use crate::model::Instruction;

/// Recipe card plugins and themes mark their lists with well-known classes
pub struct HtmlClassExtractor;

struct ClassMatchers {
    exact: HashMap<&'static str, Vec<&'static str>>,
    fuzzy: HashMap<&'static str, Vec<&'static str>>,
}

impl ClassMatchers {
    fn new() -> Self {
        let mut exact = HashMap::new();
        let mut fuzzy = HashMap::new();

        // WordPress Recipe Maker, Tasty Recipes, Mediavine Create and friends
        exact.insert(
            "ingredients",
            vec![
                "wprm-recipe-ingredients-container",
                "tasty-recipes-ingredients",
                "mv-create-ingredients",
                "recipe-ingredients",
                "recipe-ingredient-list",
                "recipe-card-ingredients",
                "wpzoom-recipe-ingredients",
                "simple-recipe-pro-recipe-ingredients",
                "wpupg-recipe-ingredients",
                "recipe_ingredients",
                "structured-ingredients",
                "mpprecipe-ingredients",
                "ingredients-list",
            ],
        );

        exact.insert(
            "instructions",
            vec![
                "wprm-recipe-instructions-container",
                "tasty-recipes-instructions",
                "mv-create-instructions",
                "recipe-instructions",
                "recipe-instruction-list",
                "recipe-card-instructions",
                "wpzoom-recipe-instructions",
                "simple-recipe-pro-recipe-instructions",
                "wpupg-recipe-instructions",
                "recipe_instructions",
                "structured-instructions",
                "mpprecipe-instructions",
                "recipe-directions",
                "directions",
            ],
        );

        // Fuzzy matchers for fallback
        fuzzy.insert("ingredients", vec!["ingredient"]);
        fuzzy.insert("instructions", vec!["instruction", "direction", "method"]);

        ClassMatchers { exact, fuzzy }
    }

    fn extract_list_items(
        &self,
        document: &Html,
        field: &str,
        limits: &ScanLimits,
    ) -> Result<Vec<String>, ScrapeError> {
        let exact = self
            .exact
            .get(field)
            .into_iter()
            .flatten()
            .map(|class_name| (format!(".{class_name}"), true));
        let fuzzy = self
            .fuzzy
            .get(field)
            .into_iter()
            .flatten()
            .map(|pattern| (format!("[class*='{pattern}']"), false));

        for (css, precise) in exact.chain(fuzzy) {
            limits.check()?;
            let Some(containers) = selector(&css) else {
                continue;
            };

            let mut items = Vec::new();
            for container in document.select(&containers) {
                items.extend(container_items(container, precise));
                if items.len() >= limits.max_entries {
                    break;
                }
            }

            if !items.is_empty() {
                debug!("Found {} {} using class selector: {}", items.len(), field, css);
                items.truncate(limits.max_entries);
                return Ok(items);
            }
        }

        Ok(Vec::new())
    }
}

/// List items of a container. Exact matches also accept paragraphs when
/// the plugin renders no list; fuzzy matches are too loose for that.
fn container_items(container: ElementRef, precise: bool) -> Vec<String> {
    let mut items = collect(container, "li");
    if items.is_empty() && precise {
        items = collect(container, "p");
    }
    items
        .into_iter()
        .filter(|text| text.len() < 1000)
        .collect()
}

fn collect(container: ElementRef, css: &str) -> Vec<String> {
    let Some(sel) = selector(css) else {
        return Vec::new();
    };
    container
        .select(&sel)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

impl Extractor for HtmlClassExtractor {
    fn name(&self) -> &'static str {
        "class names"
    }

    fn parse(&self, context: &ParsingContext, limits: &ScanLimits) -> Result<Lists, ScrapeError> {
        debug!("Attempting to extract recipe lists using HTML class matchers");

        let matchers = ClassMatchers::new();
        let ingredients = matchers.extract_list_items(&context.document, "ingredients", limits)?;
        let instructions = matchers
            .extract_list_items(&context.document, "instructions", limits)?
            .into_iter()
            .map(Instruction::step)
            .collect();

        Ok(Lists {
            ingredients,
            instructions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ScanLimits {
        ScanLimits {
            max_entries: 250,
            deadline: None,
        }
    }

    #[test]
    fn test_recipe_card_plugin() {
        let html = r#"
            <html><body>
            <div class="wprm-recipe-ingredients-container">
                <ul>
                    <li class="wprm-recipe-ingredient">2 cups flour</li>
                    <li class="wprm-recipe-ingredient">1 cup sugar</li>
                </ul>
            </div>
            <div class="wprm-recipe-instructions-container">
                <ol><li>Preheat oven.</li><li>Bake.</li></ol>
            </div>
            </body></html>
        "#;
        let context = ParsingContext::new("https://example.com", Html::parse_document(html));
        let lists = HtmlClassExtractor.parse(&context, &limits()).unwrap();

        assert_eq!(lists.ingredients, vec!["2 cups flour", "1 cup sugar"]);
        assert_eq!(
            lists.instructions,
            vec![Instruction::step("Preheat oven."), Instruction::step("Bake.")]
        );
    }

    #[test]
    fn test_fuzzy_match_requires_list_items() {
        let html = r#"
            <html><body>
            <div class="post-ingredient-notes"><p>Use ripe tomatoes.</p></div>
            <section class="my-method"><ul><li>Stir.</li></ul></section>
            </body></html>
        "#;
        let context = ParsingContext::new("https://example.com", Html::parse_document(html));
        let lists = HtmlClassExtractor.parse(&context, &limits()).unwrap();

        assert!(lists.ingredients.is_empty());
        assert_eq!(lists.instructions, vec![Instruction::step("Stir.")]);
    }

    #[test]
    fn test_paragraphs_in_exact_container() {
        let html = r#"<html><body><div class="recipe-directions"><p>Boil.</p><p>Serve.</p></div></body></html>"#;
        let context = ParsingContext::new("https://example.com", Html::parse_document(html));
        let lists = HtmlClassExtractor.parse(&context, &limits()).unwrap();

        assert_eq!(lists.instructions.len(), 2);
    }
}
