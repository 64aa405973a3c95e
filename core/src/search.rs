//! Case-insensitive substring matching over recipes.
//!
//! No index: every query is a linear scan over the cached recipes.

use std::collections::HashSet;

use crate::models::Recipe;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// True if the lowercased query is a substring of the recipe's name,
/// ingredients, or category. An empty query matches every recipe.
#[must_use]
pub fn matches_query(recipe: &Recipe, lower_query: &str) -> bool {
    recipe.name.to_lowercase().contains(lower_query)
        || recipe.ingredients.to_lowercase().contains(lower_query)
        || recipe.category.to_lowercase().contains(lower_query)
}

#[must_use]
pub fn matches_category(recipe: &Recipe, category: &str) -> bool {
    recipe.category.to_lowercase() == category.to_lowercase()
}

/// Autocomplete candidates: each recipe's name and comma-separated
/// ingredients, trimmed, kept when they contain `text` ignoring case.
/// First occurrence wins; at most `limit` results.
#[must_use]
pub fn suggestions<'a, I>(recipes: I, text: &str, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let needle = text.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for recipe in recipes {
        let joined = format!("{},{}", recipe.name, recipe.ingredients);
        for candidate in joined.split(',').map(str::trim) {
            if out.len() >= limit {
                return out;
            }
            if candidate.to_lowercase().contains(&needle) && seen.insert(candidate.to_string()) {
                out.push(candidate.to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRecipe;

    fn recipe(name: &str, ingredients: &str, category: &str) -> Recipe {
        Recipe::new(NewRecipe::new(name, "", ingredients, "", category, 100, 1, "serving"))
    }

    #[test]
    fn test_matches_query_fields() {
        let r = recipe("Aglio e Olio", "Spaghetti, Garlic, Olive oil", "Pasta");
        assert!(matches_query(&r, "garlic"));
        assert!(matches_query(&r, "arl"));
        assert!(matches_query(&r, "aglio"));
        assert!(matches_query(&r, "past"));
        assert!(!matches_query(&r, "basil"));
    }

    #[test]
    fn test_matches_query_ignores_description_and_instructions() {
        let r = Recipe::new(NewRecipe::new(
            "Stew",
            "hearty and warming",
            "beef",
            "simmer slowly",
            "Dinner",
            500,
            4,
            "bowl",
        ));
        assert!(!matches_query(&r, "hearty"));
        assert!(!matches_query(&r, "simmer"));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(matches_query(&recipe("Toast", "bread", "Snack"), ""));
    }

    #[test]
    fn test_matches_category_exact_ignoring_case() {
        let r = recipe("Brownies", "chocolate", "Dessert");
        assert!(matches_category(&r, "dessert"));
        assert!(matches_category(&r, "DESSERT"));
        assert!(!matches_category(&r, "dess"));
    }

    #[test]
    fn test_suggestions_from_names_and_ingredients() {
        let recipes = [
            recipe("Garlic Bread", "bread, garlic, butter", "Side"),
            recipe("Aioli", "Garlic, egg yolk, oil", "Sauce"),
        ];
        let got = suggestions(&recipes, "gar", DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(got, ["Garlic Bread", "garlic", "Garlic"]);
    }

    #[test]
    fn test_suggestions_dedupe_and_limit() {
        let recipes = [
            recipe("Oat Bowl", "oats, oat milk", "Breakfast"),
            recipe("Oat Cookies", "oats, sugar", "Dessert"),
        ];
        let got = suggestions(&recipes, "oat", 10);
        assert_eq!(got, ["Oat Bowl", "oats", "oat milk", "Oat Cookies"]);

        let capped = suggestions(&recipes, "oat", 2);
        assert_eq!(capped, ["Oat Bowl", "oats"]);
    }

    #[test]
    fn test_suggestions_empty_text() {
        let recipes = [recipe("Toast", "bread", "Snack")];
        assert!(suggestions(&recipes, "", 10).is_empty());
    }
}
