use serde::{Deserialize, Serialize};

/// Where a scalar value was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    JsonLd,
    Microdata,
    Meta,
    Heuristic,
    Override,
}

/// A text value together with its provenance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scalar {
    pub value: String,
    pub source: Option<Source>,
}

impl Scalar {
    pub fn new(value: impl Into<String>, source: Source) -> Self {
        Self {
            value: value.into(),
            source: Some(source),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// One entry of the instruction list, in on-page order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum Instruction {
    #[serde(rename = "HowToStep")]
    Step { text: String },
    #[serde(rename = "HowToSection")]
    Section { name: String, steps: Vec<String> },
}

impl Instruction {
    pub fn step(text: impl Into<String>) -> Self {
        Instruction::Step { text: text.into() }
    }

    /// Every step text, sections flattened
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Instruction::Step { text } => vec![text.as_str()],
            Instruction::Section { steps, .. } => steps.iter().map(String::as_str).collect(),
        }
    }
}

/// An embeddable video (https://schema.org/VideoObject)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoObject {
    #[serde(rename = "@type")]
    pub at_type: String,
    pub name: String,
    pub description: String,
    pub embed_url: String,
    pub content_url: String,
    pub thumbnail_url: String,
    pub upload_date: String,
    pub duration: String,
    /// The embed URL is meant for an `<iframe>` rather than a media element
    pub is_iframe: bool,
}

impl VideoObject {
    pub const TYPE: &'static str = "VideoObject";

    pub fn iframe(embed_url: impl Into<String>) -> Self {
        Self {
            at_type: Self::TYPE.to_string(),
            embed_url: embed_url.into(),
            is_iframe: true,
            ..Default::default()
        }
    }

    pub fn is_playable(&self) -> bool {
        self.at_type.eq_ignore_ascii_case(Self::TYPE)
    }
}

/// Nutrition facts per serving (https://schema.org/NutritionInformation)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: String,
    #[serde(rename = "carbohydrateContent")]
    pub carbohydrates: String,
    #[serde(rename = "cholesterolContent")]
    pub cholesterol: String,
    #[serde(rename = "fatContent")]
    pub fat: String,
    #[serde(rename = "fiberContent")]
    pub fiber: String,
    #[serde(rename = "proteinContent")]
    pub protein: String,
    #[serde(rename = "saturatedFatContent")]
    pub saturated_fat: String,
    #[serde(rename = "servingSize")]
    pub serving_size: String,
    #[serde(rename = "sodiumContent")]
    pub sodium: String,
    #[serde(rename = "sugarContent")]
    pub sugar: String,
    #[serde(rename = "transFatContent")]
    pub trans_fat: String,
    #[serde(rename = "unsaturatedFatContent")]
    pub unsaturated_fat: String,
}

impl NutritionFacts {
    /// Every field keyed by its schema.org property name
    pub fn fields_mut(&mut self) -> [(&'static str, &mut String); 12] {
        [
            ("calories", &mut self.calories),
            ("carbohydrateContent", &mut self.carbohydrates),
            ("cholesterolContent", &mut self.cholesterol),
            ("fatContent", &mut self.fat),
            ("fiberContent", &mut self.fiber),
            ("proteinContent", &mut self.protein),
            ("saturatedFatContent", &mut self.saturated_fat),
            ("servingSize", &mut self.serving_size),
            ("sodiumContent", &mut self.sodium),
            ("sugarContent", &mut self.sugar),
            ("transFatContent", &mut self.trans_fat),
            ("unsaturatedFatContent", &mut self.unsaturated_fat),
        ]
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The canonical recipe record every extraction strategy populates.
///
/// Composite fields are `None` until a strategy populates them: `None` means
/// "not extracted", `Some(vec![])` means "attempted, found nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSchema {
    pub name: String,
    pub description: Scalar,
    pub image: String,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: String,
    pub date_published: String,
    pub date_modified: String,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    #[serde(rename = "recipeYield")]
    pub recipe_yield: u16,
    #[serde(rename = "recipeCategory")]
    pub category: Scalar,
    #[serde(rename = "recipeCuisine")]
    pub cuisine: Scalar,
    pub cooking_method: Scalar,
    pub keywords: String,
    #[serde(rename = "recipeIngredient", skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(rename = "recipeInstructions", skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<Instruction>>,
    #[serde(rename = "tool", skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Vec<VideoObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionFacts>,
    pub url: String,
}

impl RecipeSchema {
    /// A name and at least one non-empty ingredient or instruction list
    pub fn is_usable(&self) -> bool {
        !self.name.trim().is_empty()
            && (has_entries(&self.ingredients) || has_entries(&self.instructions))
    }

    pub fn ingredients(&self) -> &[String] {
        self.ingredients.as_deref().unwrap_or_default()
    }

    pub fn instructions(&self) -> &[Instruction] {
        self.instructions.as_deref().unwrap_or_default()
    }

    /// Instruction texts with sections flattened, in order
    pub fn instruction_texts(&self) -> Vec<&str> {
        self.instructions().iter().flat_map(Instruction::texts).collect()
    }
}

fn has_entries<T>(list: &Option<Vec<T>>) -> bool {
    list.as_ref().is_some_and(|v| !v.is_empty())
}
