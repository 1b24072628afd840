use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

use super::{selector, ParsingContext};
use crate::model::{Instruction, NutritionFacts, RecipeSchema, Scalar, Source, VideoObject};
use crate::normalize::{list, text};

pub struct JsonLdExtractor;

/// A `ld+json` payload that still fails to parse after the repair pass
#[derive(Error, Debug)]
#[error("JSON-LD payload {index} does not parse: {reason}")]
pub struct MalformedPayload {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonLdRecipe {
    name: Option<Text>,
    description: Option<Text>,
    image: Option<Link>,
    #[serde(rename = "thumbnailUrl")]
    thumbnail_url: Option<Link>,
    #[serde(rename = "datePublished")]
    date_published: Option<Text>,
    #[serde(rename = "dateCreated")]
    date_created: Option<Text>,
    #[serde(rename = "dateModified")]
    date_modified: Option<Text>,
    #[serde(rename = "prepTime")]
    prep_time: Option<Text>,
    #[serde(rename = "cookTime")]
    cook_time: Option<Text>,
    #[serde(rename = "totalTime")]
    total_time: Option<Text>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<Yield>,
    #[serde(rename = "yield")]
    legacy_yield: Option<Yield>,
    #[serde(rename = "recipeCategory")]
    category: Option<Text>,
    #[serde(rename = "recipeCuisine")]
    cuisine: Option<Text>,
    #[serde(rename = "cookingMethod")]
    cooking_method: Option<Text>,
    keywords: Option<TextList>,
    #[serde(rename = "recipeIngredient")]
    ingredients: Option<Ingredients>,
    #[serde(rename = "ingredients")]
    legacy_ingredients: Option<Ingredients>,
    #[serde(rename = "recipeInstructions")]
    instructions: Option<Instructions>,
    #[serde(rename = "tool")]
    tools: Option<Tools>,
    video: Option<Videos>,
    nutrition: Option<Nutrition>,
    url: Option<Text>,
}

/// First usable text of a string, number, array or `{text|name|@value}` object
#[derive(Debug, Default)]
struct Text(Option<String>);

/// Every text of a string or an array
#[derive(Debug, Default)]
struct TextList(Vec<String>);

/// A URL given as a string, an `ImageObject` or an array of either
#[derive(Debug, Default)]
struct Link(Option<String>);

#[derive(Debug, Default)]
struct Yield(Option<u16>);

#[derive(Debug, Default)]
struct Ingredients(Vec<String>);

#[derive(Debug, Default)]
struct Instructions(Vec<Instruction>);

#[derive(Debug, Default)]
struct Tools(Vec<String>);

#[derive(Debug, Default)]
struct Videos(Vec<VideoObject>);

#[derive(Debug, Default)]
struct Nutrition(Option<NutritionFacts>);

// The field wrappers never reject a shape: whatever the publisher put there is
// read as a `Value` and interpreted leniently.
macro_rules! lenient {
    ($($ty:ident => $read:ident;)*) => {
        $(
            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let value = Value::deserialize(deserializer)?;
                    Ok($ty($read(&value)))
                }
            }
        )*
    };
}

lenient! {
    Text => text_of;
    TextList => texts_of;
    Link => link_of;
    Yield => yield_of;
    Ingredients => ingredients_of;
    Instructions => instructions_of;
    Tools => tools_of;
    Videos => videos_of;
    Nutrition => nutrition_of;
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(text_of),
        Value::Object(map) => ["text", "name", "@value", "value"]
            .iter()
            .find_map(|key| map.get(*key).and_then(text_of)),
        _ => None,
    }
}

fn texts_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text_of).collect(),
        other => text_of(other).into_iter().collect(),
    }
}

fn link_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Array(items) => items.iter().find_map(link_of),
        Value::Object(map) => ["url", "contentUrl", "@id"]
            .iter()
            .find_map(|key| map.get(*key).and_then(link_of)),
        _ => None,
    }
}

fn yield_of(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u16::try_from(n).ok())
            .filter(|n| *n > 0),
        Value::String(s) => text::first_integer(s),
        Value::Array(items) => items.iter().find_map(yield_of),
        Value::Object(map) => map.get("value").and_then(yield_of),
        _ => None,
    }
}

fn ingredients_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s.lines().filter_map(non_empty).collect(),
        Value::Array(items) => items.iter().filter_map(ingredient_entry).collect(),
        other => ingredient_entry(other).into_iter().collect(),
    }
}

fn ingredient_entry(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) if map.contains_key("name") && map.contains_key("amount") => {
            let amount = map.get("amount").and_then(text_of).unwrap_or_default();
            let name = map.get("name").and_then(text_of).unwrap_or_default();
            non_empty(&format!("{amount} {name}"))
        }
        other => text_of(other),
    }
}

fn instructions_of(value: &Value) -> Vec<Instruction> {
    let mut out = Vec::new();
    match value {
        Value::String(s) => {
            let stripped = text::strip_markup(s);
            out.extend(stripped.lines().filter_map(non_empty).map(Instruction::step));
        }
        Value::Array(items) => items.iter().for_each(|item| instruction_entry(item, &mut out)),
        other => instruction_entry(other, &mut out),
    }
    out
}

fn instruction_entry(value: &Value, out: &mut Vec<Instruction>) {
    match value {
        Value::String(s) => out.extend(non_empty(s).map(Instruction::step)),
        Value::Array(items) => items.iter().for_each(|item| instruction_entry(item, out)),
        Value::Object(map)
            if is_type(map, "HowToSection") || map.contains_key("itemListElement") =>
        {
            let mut steps = Vec::new();
            if let Some(elements) = map.get("itemListElement") {
                section_steps(elements, &mut steps);
            }
            match map.get("name").and_then(text_of) {
                Some(name) => out.push(Instruction::Section { name, steps }),
                None => out.extend(steps.into_iter().map(Instruction::step)),
            }
        }
        Value::Object(map) => out.extend(step_text(map).map(Instruction::step)),
        _ => {}
    }
}

fn section_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(s) => steps.extend(non_empty(s)),
        Value::Array(items) => items.iter().for_each(|item| section_steps(item, steps)),
        Value::Object(map) => match map.get("itemListElement") {
            // sections nested in sections are flattened
            Some(inner) => section_steps(inner, steps),
            None => steps.extend(step_text(map)),
        },
        _ => {}
    }
}

fn step_text(map: &Map<String, Value>) -> Option<String> {
    ["text", "name", "description"]
        .iter()
        .find_map(|key| map.get(*key).and_then(text_of))
}

fn tools_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => {
            let parts: Vec<&str> = if s.contains('\n') {
                s.split('\n').collect()
            } else {
                s.split(',').collect()
            };
            parts.into_iter().filter_map(non_empty).collect()
        }
        Value::Array(items) => items.iter().flat_map(tools_of).collect(),
        Value::Object(map) => ["name", "text", "item"]
            .iter()
            .find_map(|key| map.get(*key).and_then(text_of))
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

fn videos_of(value: &Value) -> Vec<VideoObject> {
    match value {
        Value::Array(items) => items.iter().flat_map(videos_of).collect(),
        Value::Object(map) => {
            let field = |key: &str| map.get(key).and_then(text_of).unwrap_or_default();
            let at_type = if is_type(map, VideoObject::TYPE) {
                VideoObject::TYPE.to_string()
            } else {
                field("@type")
            };
            vec![VideoObject {
                at_type,
                name: field("name"),
                description: field("description"),
                embed_url: map.get("embedUrl").and_then(link_of).unwrap_or_default(),
                content_url: map.get("contentUrl").and_then(link_of).unwrap_or_default(),
                thumbnail_url: map.get("thumbnailUrl").and_then(link_of).unwrap_or_default(),
                upload_date: field("uploadDate"),
                duration: field("duration"),
                is_iframe: false,
            }]
        }
        _ => Vec::new(),
    }
}

/// A `NutritionInformation` object; values keep their units
fn nutrition_of(value: &Value) -> Option<NutritionFacts> {
    let map = match value {
        Value::Object(map) => map,
        Value::Array(items) => return items.iter().find_map(nutrition_of),
        _ => return None,
    };

    let mut facts = NutritionFacts::default();
    for (property, field) in facts.fields_mut() {
        if let Some(value) = map.get(property).and_then(text_of) {
            *field = value;
        }
    }
    (!facts.is_empty()).then_some(facts)
}

/// `@type` comparison ignoring case and any vocabulary prefix
/// (`Recipe`, `recipe`, `schema:Recipe`, `http://schema.org/Recipe`)
fn type_matches(tag: &str, expected: &str) -> bool {
    tag.rsplit(|c| c == '/' || c == ':')
        .next()
        .is_some_and(|t| t.trim().eq_ignore_ascii_case(expected))
}

fn is_type(map: &Map<String, Value>, expected: &str) -> bool {
    match map.get("@type") {
        Some(Value::String(tag)) => type_matches(tag, expected),
        Some(Value::Array(tags)) => tags
            .iter()
            .filter_map(Value::as_str)
            .any(|tag| type_matches(tag, expected)),
        _ => false,
    }
}

fn is_recipe_type(value: &Value) -> bool {
    value.as_object().is_some_and(|map| is_type(map, "Recipe"))
}

/// The first Recipe node of a payload: the root itself, an element of a
/// root array, or a member of an `@graph`
fn find_recipe_node(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_recipe_node),
        Value::Object(map) => {
            if is_recipe_type(value) {
                return Some(value);
            }
            map.get("@graph")
                .and_then(find_recipe_node)
                .or_else(|| map.get("mainEntity").and_then(find_recipe_node))
        }
        _ => None,
    }
}

impl JsonLdRecipe {
    fn into_record(self) -> RecipeSchema {
        let plain = |field: Option<Text>| field.and_then(|t| t.0).unwrap_or_default();
        let scalar = |field: Option<Text>| {
            field
                .and_then(|t| t.0)
                .map(|value| Scalar::new(value, Source::JsonLd))
                .unwrap_or_default()
        };
        let link = |field: Option<Link>| field.and_then(|l| l.0).unwrap_or_default();

        let date_created = plain(self.date_created);
        let mut date_published = plain(self.date_published);
        if date_published.is_empty() {
            date_published = date_created;
        }

        let ingredients = match (self.ingredients, self.legacy_ingredients) {
            (Some(list), _) if !list.0.is_empty() => Some(list.0),
            (list, legacy) => legacy.map(|l| l.0).or(list.map(|l| l.0)),
        };

        RecipeSchema {
            name: plain(self.name),
            description: scalar(self.description),
            image: link(self.image),
            thumbnail_url: link(self.thumbnail_url),
            date_published,
            date_modified: plain(self.date_modified),
            prep_time: plain(self.prep_time),
            cook_time: plain(self.cook_time),
            total_time: plain(self.total_time),
            recipe_yield: self
                .recipe_yield
                .and_then(|y| y.0)
                .or(self.legacy_yield.and_then(|y| y.0))
                .unwrap_or(0),
            category: scalar(self.category),
            cuisine: scalar(self.cuisine),
            cooking_method: scalar(self.cooking_method),
            keywords: self
                .keywords
                .map(|k| list::join_keywords(k.0.iter().map(String::as_str)))
                .unwrap_or_default(),
            ingredients,
            instructions: self.instructions.map(|i| i.0),
            tools: self.tools.map(|t| t.0),
            video: self
                .video
                .map(|v| v.0.into_iter().filter(VideoObject::is_playable).collect()),
            nutrition: self.nutrition.and_then(|n| n.0),
            url: plain(self.url),
        }
    }
}

impl JsonLdExtractor {
    /// Decode the first Recipe node found across the document's `ld+json`
    /// scripts.
    ///
    /// Returns `Ok(None)` when no script holds a Recipe, and the first
    /// malformed payload when none holds a Recipe but some failed to parse.
    pub fn parse(
        &self,
        context: &ParsingContext,
    ) -> Result<Option<RecipeSchema>, MalformedPayload> {
        let Some(scripts) = selector("script[type='application/ld+json']") else {
            return Ok(None);
        };

        let mut malformed = None;
        for (index, script) in context.document.select(&scripts).enumerate() {
            let content: String = script.text().collect();
            let raw = strip_wrappers(&content);
            if raw.is_empty() {
                continue;
            }

            let json_ld = match serde_json::from_str::<Value>(raw)
                .or_else(|_| serde_json::from_str::<Value>(&sanitize_json(raw)))
            {
                Ok(json_ld) => json_ld,
                Err(e) => {
                    debug!("JsonLdExtractor: script {} does not parse: {}", index, e);
                    malformed.get_or_insert(MalformedPayload {
                        index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let Some(node) = find_recipe_node(&json_ld) else {
                debug!("JsonLdExtractor: no Recipe node in script {}", index);
                continue;
            };

            match serde_json::from_value::<JsonLdRecipe>(node.clone()) {
                Ok(recipe) => {
                    debug!("JsonLdExtractor: decoded Recipe from script {}", index);
                    return Ok(Some(recipe.into_record()));
                }
                Err(e) => {
                    debug!("JsonLdExtractor: Recipe in script {} does not decode: {}", index, e);
                    malformed.get_or_insert(MalformedPayload {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        match malformed {
            Some(payload) => Err(payload),
            None => Ok(None),
        }
    }
}

fn strip_wrappers(raw: &str) -> &str {
    let mut s = raw.trim();
    for prefix in ["<!--", "//<![CDATA[", "<![CDATA["] {
        s = s.strip_prefix(prefix).unwrap_or(s).trim_start();
    }
    for suffix in ["-->", "//]]>", "]]>"] {
        s = s.strip_suffix(suffix).unwrap_or(s).trim_end();
    }
    s
}

/// Repair the usual publisher mistakes: raw control characters inside
/// strings, and missing, doubled or trailing commas
fn sanitize_json(json_str: &str) -> String {
    let chars: Vec<char> = json_str.chars().collect();
    let mut out = String::with_capacity(json_str.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        let rest = chars.get(i + 1..).unwrap_or(&[]);

        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    out.push(c);
                }
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                    push_missing_comma(rest, &mut out);
                }
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {}
                _ => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = rest.iter().copied().find(|c| !c.is_whitespace());
                let dangling = matches!(next, Some(']' | '}' | ','));
                let leading = matches!(out.chars().last(), Some(',' | '[' | '{'));
                if !dangling && !leading {
                    out.push(c);
                }
            }
            ']' | '}' => {
                out.push(c);
                push_missing_comma(rest, &mut out);
            }
            c if c.is_whitespace() => {}
            _ => out.push(c),
        }
    }

    out
}

fn push_missing_comma(rest: &[char], out: &mut String) {
    if matches!(
        rest.iter().copied().find(|c| !c.is_whitespace()),
        Some('"' | '{' | '[')
    ) {
        out.push(',');
    }
}
