use scraper::Html;

use crate::error::TransformError;
use crate::model::RecipeSchema;
use crate::normalize::text;

const TITLE_SUFFIX: &str = "| Example Site";

/// The publisher appends its name to every recipe title
pub(super) fn transform(record: RecipeSchema, _: &Html) -> Result<RecipeSchema, TransformError> {
    let name = text::strip_suffix_ci(&record.name, TITLE_SUFFIX).to_string();
    Ok(RecipeSchema { name, ..record })
}
