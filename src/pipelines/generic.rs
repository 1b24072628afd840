use std::time::Instant;

use log::{debug, warn};

use crate::config::{HeuristicsConfig, ScraperConfig};
use crate::error::ScrapeError;
use crate::extractors::{
    heuristic, meta, microdata, Extractor, HeadingExtractor, HtmlClassExtractor, JsonLdExtractor,
    ParsingContext, ScanLimits,
};
use crate::model::{Instruction, NutritionFacts, RecipeSchema, Scalar, Source, VideoObject};
use crate::normalize::{self, date, duration, list, text};

/// Result of the generic pipeline
#[derive(Debug)]
pub struct GenericParse {
    pub record: RecipeSchema,
    /// Why a JSON-LD payload was rejected, if one was
    pub malformed: Option<String>,
}

/// Where a field may be read from, in priority order
#[derive(Debug, Clone, Copy)]
enum Candidate {
    Microdata(&'static str),
    Meta(&'static str),
}

use Candidate::{Meta, Microdata};

const NAME: &[Candidate] = &[
    Microdata("name"),
    Microdata("headline"),
    Meta("og:title"),
    Meta("twitter:title"),
];
const DESCRIPTION: &[Candidate] = &[
    Microdata("description"),
    Meta("og:description"),
    Meta("description"),
    Meta("twitter:description"),
];
const IMAGE: &[Candidate] = &[Microdata("image"), Meta("og:image"), Meta("twitter:image")];
const THUMBNAIL: &[Candidate] = &[Microdata("thumbnailUrl")];
const DATE_PUBLISHED: &[Candidate] = &[
    Microdata("datePublished"),
    Microdata("dateCreated"),
    Meta("article:published_time"),
];
const DATE_MODIFIED: &[Candidate] = &[
    Microdata("dateModified"),
    Meta("article:modified_time"),
    Meta("og:updated_time"),
];
const PREP_TIME: &[Candidate] = &[Microdata("prepTime")];
const COOK_TIME: &[Candidate] = &[Microdata("cookTime")];
const TOTAL_TIME: &[Candidate] = &[Microdata("totalTime")];
const YIELD: &[Candidate] = &[Microdata("recipeYield"), Microdata("yield")];
const CATEGORY: &[Candidate] = &[Microdata("recipeCategory"), Meta("article:section")];
const CUISINE: &[Candidate] = &[Microdata("recipeCuisine")];
const COOKING_METHOD: &[Candidate] = &[Microdata("cookingMethod")];
const KEYWORDS: &[Candidate] = &[Microdata("keywords"), Meta("keywords")];
const URL: &[Candidate] = &[Microdata("url"), Meta("og:url")];

fn read(context: &ParsingContext, candidate: Candidate) -> Option<(String, Source)> {
    match candidate {
        Microdata(prop) => microdata::read(&context.document, prop).map(|v| (v, Source::Microdata)),
        Meta(key) => meta::read(&context.document, key).map(|v| (v, Source::Meta)),
    }
}

fn first_value(context: &ParsingContext, candidates: &[Candidate]) -> Option<(String, Source)> {
    candidates.iter().find_map(|candidate| read(context, *candidate))
}

/// Resolved link or nothing, so that unusable links count as empty
fn link(context: &ParsingContext, raw: &str) -> String {
    context
        .resolve(&normalize::clean_text(raw))
        .unwrap_or_default()
}

/// Like [`fill`], skipping candidates that do not resolve to an absolute URL
fn fill_link(context: &ParsingContext, field: &mut String, candidates: &[Candidate]) {
    if field.is_empty() {
        let resolved = candidates
            .iter()
            .filter_map(|candidate| read(context, *candidate))
            .map(|(raw, _)| link(context, &raw))
            .find(|value| !value.is_empty());
        if let Some(value) = resolved {
            *field = value;
        }
    }
}

fn fill(context: &ParsingContext, field: &mut String, candidates: &[Candidate]) {
    if field.trim().is_empty() {
        if let Some((value, _)) = first_value(context, candidates) {
            *field = value;
        }
    }
}

fn fill_scalar(context: &ParsingContext, field: &mut Scalar, candidates: &[Candidate]) {
    if field.value.trim().is_empty() {
        if let Some((value, source)) = first_value(context, candidates) {
            *field = Scalar::new(value, source);
        }
    }
}

fn is_empty<T>(list: &Option<Vec<T>>) -> bool {
    list.as_ref().map_or(true, Vec::is_empty)
}

/// Run every generic strategy against the document.
///
/// Structured JSON-LD data comes first; microdata and `<meta>` tags only fill
/// fields it left empty; heuristics only run for lists still empty after
/// that. A field populated by an earlier source is never overwritten.
pub fn parse(
    context: &ParsingContext,
    config: &ScraperConfig,
) -> Result<GenericParse, ScrapeError> {
    let mut malformed = None;

    let mut record = match JsonLdExtractor.parse(context) {
        Ok(Some(record)) => record,
        Ok(None) => RecipeSchema::default(),
        Err(payload) => {
            warn!("{}: {}, falling back to markup", context.url, payload);
            malformed = Some(payload.to_string());
            RecipeSchema::default()
        }
    };

    record.image = link(context, &record.image);
    record.thumbnail_url = link(context, &record.thumbnail_url);
    record.url = link(context, &record.url);

    fill_from_markup(context, &mut record);

    if config.heuristics.enabled
        && (record.name.trim().is_empty()
            || is_empty(&record.ingredients)
            || is_empty(&record.instructions))
    {
        fill_from_heuristics(context, &config.heuristics, &mut record)?;
    }

    Ok(GenericParse {
        record: normalize_record(record, context),
        malformed,
    })
}

fn fill_from_markup(context: &ParsingContext, record: &mut RecipeSchema) {
    fill(context, &mut record.name, NAME);
    fill_scalar(context, &mut record.description, DESCRIPTION);
    fill_link(context, &mut record.image, IMAGE);
    fill_link(context, &mut record.thumbnail_url, THUMBNAIL);
    fill(context, &mut record.date_published, DATE_PUBLISHED);
    fill(context, &mut record.date_modified, DATE_MODIFIED);
    fill(context, &mut record.prep_time, PREP_TIME);
    fill(context, &mut record.cook_time, COOK_TIME);
    fill(context, &mut record.total_time, TOTAL_TIME);
    fill_scalar(context, &mut record.category, CATEGORY);
    fill_scalar(context, &mut record.cuisine, CUISINE);
    fill_scalar(context, &mut record.cooking_method, COOKING_METHOD);
    fill_link(context, &mut record.url, URL);

    if record.keywords.trim().is_empty() {
        record.keywords = match first_value(context, KEYWORDS) {
            Some((keywords, _)) => keywords,
            None => list::join_keywords(
                meta::read_all(&context.document, "article:tag")
                    .iter()
                    .map(String::as_str),
            ),
        };
    }

    if record.recipe_yield == 0 {
        record.recipe_yield = first_value(context, YIELD)
            .and_then(|(value, _)| text::first_integer(&value))
            .unwrap_or(0);
    }

    let document = &context.document;
    if is_empty(&record.ingredients) {
        let found = ["recipeIngredient", "ingredients"]
            .iter()
            .map(|prop| microdata::read_all(document, prop))
            .find(|values| !values.is_empty());
        if let Some(ingredients) = found {
            record.ingredients = Some(ingredients);
        }
    }

    if is_empty(&record.instructions) {
        let steps = microdata::read_all(document, "recipeInstructions");
        if !steps.is_empty() {
            record.instructions = Some(steps.into_iter().map(Instruction::step).collect());
        }
    }

    if is_empty(&record.tools) && microdata::has(document, "tool") {
        record.tools = Some(microdata::read_all(document, "tool"));
    }

    if record.nutrition.is_none() {
        if let Some(item) = microdata::nested_item(document, "nutrition") {
            let mut facts = NutritionFacts::default();
            for (property, field) in facts.fields_mut() {
                if let Some(value) = microdata::read_in(item, property) {
                    *field = value;
                }
            }
            record.nutrition = (!facts.is_empty()).then_some(facts);
        }
    }
}

fn fill_from_heuristics(
    context: &ParsingContext,
    config: &HeuristicsConfig,
    record: &mut RecipeSchema,
) -> Result<(), ScrapeError> {
    let deadline = config.deadline().map(|budget| Instant::now() + budget);
    let limits = ScanLimits {
        max_entries: config.max_entries,
        deadline: match (deadline, context.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        },
    };

    if record.name.trim().is_empty() {
        if let Some(name) = heuristic::first_heading(&context.document) {
            record.name = name;
        }
    }

    let strategies: Vec<Box<dyn Extractor>> =
        vec![Box::new(HeadingExtractor), Box::new(HtmlClassExtractor)];

    for strategy in strategies {
        let wants_ingredients = is_empty(&record.ingredients);
        let wants_instructions = is_empty(&record.instructions);
        if !wants_ingredients && !wants_instructions {
            break;
        }

        let lists = strategy.parse(context, &limits)?;
        if wants_ingredients && !lists.ingredients.is_empty() {
            debug!("{} ingredients from {}", lists.ingredients.len(), strategy.name());
            record.ingredients = Some(lists.ingredients);
        }
        if wants_instructions && !lists.instructions.is_empty() {
            debug!("{} instructions from {}", lists.instructions.len(), strategy.name());
            record.instructions = Some(lists.instructions);
        }
    }

    Ok(())
}

/// Apply the normalization utilities to every populated field
fn normalize_record(record: RecipeSchema, context: &ParsingContext) -> RecipeSchema {
    let scalar = |s: Scalar| Scalar {
        value: normalize::clean_text(&s.value),
        ..s
    };

    let record = RecipeSchema {
        name: normalize::clean_text(&record.name),
        description: scalar(record.description),
        date_published: date::normalize(&normalize::clean_text(&record.date_published)),
        date_modified: date::normalize(&normalize::clean_text(&record.date_modified)),
        prep_time: duration::parse(&normalize::clean_text(&record.prep_time)),
        cook_time: duration::parse(&normalize::clean_text(&record.cook_time)),
        total_time: duration::parse(&normalize::clean_text(&record.total_time)),
        category: scalar(record.category),
        cuisine: scalar(record.cuisine),
        cooking_method: scalar(record.cooking_method),
        keywords: list::join_keywords([normalize::clean_text(&record.keywords).as_str()]),
        ingredients: record.ingredients.map(clean_entries),
        instructions: record.instructions.map(clean_instructions),
        tools: record.tools.map(clean_entries),
        video: record.video.map(|videos| {
            videos
                .into_iter()
                .filter(VideoObject::is_playable)
                .map(|video| VideoObject {
                    name: normalize::clean_text(&video.name),
                    description: normalize::clean_text(&video.description),
                    upload_date: date::normalize(&video.upload_date),
                    duration: duration::parse(&video.duration),
                    ..video
                })
                .collect()
        }),
        nutrition: record.nutrition.map(clean_nutrition).filter(|n| !n.is_empty()),
        ..record
    };

    resolve_links(record, context)
}

/// Make every link of `record` absolute against the document base.
///
/// Links that cannot be resolved are dropped; the record URL falls back to
/// the document URL.
pub fn resolve_links(record: RecipeSchema, context: &ParsingContext) -> RecipeSchema {
    let url = match link(context, &record.url) {
        url if url.is_empty() => context.url.clone(),
        url => url,
    };

    RecipeSchema {
        image: link(context, &record.image),
        thumbnail_url: link(context, &record.thumbnail_url),
        video: record.video.map(|videos| {
            videos
                .into_iter()
                .map(|video| VideoObject {
                    embed_url: link(context, &video.embed_url),
                    content_url: link(context, &video.content_url),
                    thumbnail_url: link(context, &video.thumbnail_url),
                    ..video
                })
                .collect()
        }),
        url,
        ..record
    }
}

fn clean_nutrition(mut facts: NutritionFacts) -> NutritionFacts {
    for (_, field) in facts.fields_mut() {
        *field = normalize::clean_text(field.as_str());
    }
    facts
}

fn clean_entries(entries: Vec<String>) -> Vec<String> {
    list::clean(
        entries.iter().map(|entry| normalize::clean_text(entry)).collect(),
        &[],
    )
}

fn clean_instructions(instructions: Vec<Instruction>) -> Vec<Instruction> {
    instructions
        .into_iter()
        .filter_map(|instruction| match instruction {
            Instruction::Step { text } => {
                let text = normalize::clean_step(&text);
                (!text.is_empty()).then_some(Instruction::Step { text })
            }
            Instruction::Section { name, steps } => {
                let name = normalize::clean_text(&name);
                let steps: Vec<String> = steps
                    .iter()
                    .map(|step| normalize::clean_step(step))
                    .filter(|step| !step.is_empty())
                    .collect();
                match (name.is_empty(), steps.is_empty()) {
                    (true, true) => None,
                    _ => Some(Instruction::Section { name, steps }),
                }
            }
        })
        .collect()
}
