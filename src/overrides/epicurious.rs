use scraper::Html;

use crate::error::TransformError;
use crate::model::RecipeSchema;
use crate::normalize::duration;

/// Timings like `20 mn` or `1 h 5 mn` that the generic parser rejects
pub(super) fn transform(
    record: RecipeSchema,
    _: &Html,
) -> Result<RecipeSchema, TransformError> {
    Ok(RecipeSchema {
        prep_time: reformat(record.prep_time),
        cook_time: reformat(record.cook_time),
        total_time: reformat(record.total_time),
        ..record
    })
}

fn reformat(time: String) -> String {
    if time.is_empty() || duration::is_normalized(&time) {
        return time;
    }

    let parts: Vec<&str> = time.split_whitespace().collect();
    let number = |i: usize| parts.get(i).and_then(|p| p.parse::<u32>().ok());

    let minutes = match (parts.len(), number(0), number(2)) {
        (2, Some(n), _) if parts[1].to_lowercase().starts_with('m') => Some(n),
        (2, Some(n), _) => n.checked_mul(60),
        (n, Some(hours), Some(minutes)) if n >= 4 => hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes)),
        _ => None,
    };

    match minutes {
        Some(minutes) => duration::format_minutes(minutes),
        None => time,
    }
}
