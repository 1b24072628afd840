use std::collections::HashMap;

use scraper::Html;
use serde_json::Value;

use super::helpers;
use crate::error::TransformError;
use crate::extractors::meta;
use crate::model::{RecipeSchema, VideoObject};
use crate::normalize::date;

const WATCH_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Elementor widgets hold the lists; embedded players replace the JSON-LD
/// videos, which are mostly clips without a playable type
pub(super) fn transform(
    record: RecipeSchema,
    document: &Html,
) -> Result<RecipeSchema, TransformError> {
    let ingredients =
        helpers::texts_of(document, ".elementor-widget-ucaddon_recipe_ingredients ul li");
    let instructions =
        helpers::texts_of(document, ".elementor-widget-ucaddon_recipe_instructions p");

    let players = helpers::select(document, ".elementor-widget-video");
    let mut videos = Vec::with_capacity(players.len());
    for player in players {
        let Some(settings) = player.value().attr("data-settings") else {
            continue;
        };
        // widgets with unreadable settings are skipped like widgets without any
        let Ok(settings) = serde_json::from_str::<HashMap<String, Value>>(settings) else {
            continue;
        };
        if let Some(url) = settings.get("youtube_url").and_then(Value::as_str) {
            let id = url.strip_prefix(WATCH_PREFIX).unwrap_or(url);
            videos.push(VideoObject::iframe(format!("https://www.youtube.com/embed/{id}")));
        }
    }

    Ok(RecipeSchema {
        date_modified: helpers::or_keep(
            meta::read(document, "article:modified_time").map(|v| date::normalize(&v)),
            record.date_modified.clone(),
        ),
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
        video: Some(videos),
        ..record
    })
}
