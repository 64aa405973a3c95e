use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PREP_TIME: i64 = 15;
pub const DEFAULT_COOK_TIME: i64 = 20;
pub const DEFAULT_DIFFICULTY: &str = "Medium";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DIFFICULTY_LEVELS: &[&str] = &["Easy", "Medium", "Hard"];
pub const MAX_RATING: f64 = 5.0;

/// Surrogate key for a recipe. Names are display attributes and may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> anyhow::Result<Self> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RecipeId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fields needed to create a recipe. Optional fields fall back to the
/// `DEFAULT_*` constants and zero macros.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub category: String,
    pub calories: i64,
    pub servings: i64,
    pub serving_unit: String,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub difficulty: Option<String>,
    pub favorite: Option<bool>,
    pub notes: Option<String>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl NewRecipe {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        ingredients: impl Into<String>,
        instructions: impl Into<String>,
        category: impl Into<String>,
        calories: i64,
        servings: i64,
        serving_unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ingredients: ingredients.into(),
            instructions: instructions.into(),
            category: category.into(),
            calories,
            servings,
            serving_unit: serving_unit.into(),
            prep_time: None,
            cook_time: None,
            difficulty: None,
            favorite: None,
            notes: None,
            protein: None,
            carbs: None,
            fat: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    id: RecipeId,
    pub name: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub category: String,
    pub calories: i64,
    pub servings: i64,
    pub serving_unit: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub difficulty: String,
    tags: Vec<String>,
    rating: f64,
    pub favorite: bool,
    pub notes: String,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Recipe {
    #[must_use]
    pub fn new(new: NewRecipe) -> Self {
        Self::with_id(RecipeId::new(), new)
    }

    /// Rebuild a recipe that already has an identity, e.g. one loaded from storage.
    #[must_use]
    pub fn with_id(id: RecipeId, new: NewRecipe) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            ingredients: new.ingredients,
            instructions: new.instructions,
            category: new.category,
            calories: new.calories,
            servings: new.servings,
            serving_unit: new.serving_unit,
            prep_time: new.prep_time.unwrap_or(DEFAULT_PREP_TIME),
            cook_time: new.cook_time.unwrap_or(DEFAULT_COOK_TIME),
            difficulty: new
                .difficulty
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
            tags: Vec::new(),
            rating: 0.0,
            favorite: new.favorite.unwrap_or(false),
            notes: new.notes.unwrap_or_default(),
            protein: new.protein.unwrap_or(0.0),
            carbs: new.carbs.unwrap_or(0.0),
            fat: new.fat.unwrap_or(0.0),
        }
    }

    #[must_use]
    pub fn id(&self) -> RecipeId {
        self.id
    }

    #[must_use]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Set the rating if it lies in `0.0..=5.0`. Anything else (NaN included)
    /// leaves the previous rating in place. Returns whether the value was taken.
    pub fn set_rating(&mut self, rating: f64) -> bool {
        if (0.0..=MAX_RATING).contains(&rating) {
            self.rating = rating;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Add a tag, stored lowercased. Returns false if it was already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    #[must_use]
    pub fn total_calories(&self) -> i64 {
        self.calories.saturating_mul(self.servings)
    }

    #[must_use]
    pub fn total_time(&self) -> i64 {
        self.prep_time.saturating_add(self.cook_time)
    }

    #[must_use]
    pub fn calories_per_serving_label(&self) -> String {
        format!("{} calories per {}", self.calories, self.serving_unit)
    }

    /// Human-readable multi-line summary of every attribute.
    #[must_use]
    pub fn details(&self) -> String {
        let plural = if self.servings > 1 { "s" } else { "" };
        format!(
            "Name: {name}\n\
             Description: {description}\n\
             Category: {category}\n\
             Difficulty: {difficulty}\n\
             Preparation Time: {prep} minutes\n\
             Cooking Time: {cook} minutes\n\
             Total Time: {total_time} minutes\n\
             Serving Size: {servings} people\n\
             Nutritional Information:\n  \
             - Calories per {unit}: {calories}\n  \
             - Total calories: {total_calories}\n  \
             - Servings: {servings} {unit}{plural}\n\
             Rating: {rating:.1}/5.0\n\
             Tags: {tags}\n\
             Ingredients:\n{ingredients}\n\
             Instructions:\n{instructions}",
            name = self.name,
            description = self.description,
            category = self.category,
            difficulty = self.difficulty,
            prep = self.prep_time,
            cook = self.cook_time,
            total_time = self.total_time(),
            servings = self.servings,
            unit = self.serving_unit,
            calories = self.calories,
            total_calories = self.total_calories(),
            rating = self.rating,
            tags = self.tags.join(", "),
            ingredients = self.ingredients,
            instructions = self.instructions,
        )
    }
}
