use scraper::Html;

use crate::error::TransformError;
use crate::model::{Instruction, NutritionFacts, RecipeSchema};
use crate::normalize::list;

/// Shopping widgets leak into the ingredient list
const INGREDIENT_BOILERPLATE: &[&str] = &[
    "click to",
    "shop now",
    "buy ingredients",
    "this ingredient shopping module",
];

const STEP_BOILERPLATE: &[&str] = &["recipe from good food magazine", "see more"];

/// Nutrition values carry their label: `12g carbohydrates`
const NUTRITION_LABELS: &[(&str, &str)] = &[
    ("carbohydrateContent", "carbohydrates"),
    ("sugarContent", "sugar"),
    ("proteinContent", "protein"),
    ("fatContent", "fat"),
    ("saturatedFatContent", "saturated fat"),
    ("unsaturatedFatContent", "unsaturated fat"),
    ("sodiumContent", "of sodium"),
    ("fiberContent", "fiber"),
    ("cholesterolContent", "cholesterol"),
];

/// Ingredients are listed once per serving size toggle and interleaved with
/// shop links; steps end with magazine credits
pub(super) fn transform(
    record: RecipeSchema,
    _: &Html,
) -> Result<RecipeSchema, TransformError> {
    let ingredients = record
        .ingredients
        .map(|entries| list::dedup(list::clean(entries, INGREDIENT_BOILERPLATE)));

    let instructions = record.instructions.map(|steps| {
        steps
            .into_iter()
            .filter(|step| match step {
                Instruction::Step { text } => !list::is_boilerplate(text, STEP_BOILERPLATE),
                Instruction::Section { .. } => true,
            })
            .collect()
    });

    let nutrition = record
        .nutrition
        .map(|facts| trim_nutrition(facts, record.recipe_yield));

    Ok(RecipeSchema {
        ingredients,
        instructions,
        nutrition,
        ..record
    })
}

fn trim_nutrition(mut facts: NutritionFacts, servings: u16) -> NutritionFacts {
    if servings > 0 {
        facts.serving_size = servings.to_string();
    }

    for (property, field) in facts.fields_mut() {
        let Some((_, label)) = NUTRITION_LABELS.iter().find(|(p, _)| *p == property) else {
            continue;
        };
        let trimmed = field
            .split_once(*label)
            .map(|(value, _)| value.trim().to_string());
        if let Some(value) = trimmed {
            *field = value;
        }
    }
    facts
}
