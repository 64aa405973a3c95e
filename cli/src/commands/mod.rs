mod category;
mod helpers;
mod import;
mod recipe;
mod search;

use anyhow::{Result, bail};

use recipebox_core::{Recipe, RecipeId, RecipeStore};

pub(crate) use category::{cmd_category_add, cmd_category_list};
pub(crate) use import::cmd_import;
pub(crate) use recipe::{
    AddArgs, cmd_add, cmd_favorite, cmd_list, cmd_note, cmd_rate, cmd_remove, cmd_show, cmd_tag,
};
pub(crate) use search::{cmd_search, cmd_suggest};

/// Resolve a recipe id or name to an id. Names match exactly first, then by a
/// unique case-insensitive match. With duplicate names the first in store
/// order wins; pass the id to pick a later one.
pub(super) fn resolve_recipe(store: &RecipeStore, name: &str) -> Result<RecipeId> {
    if let Some(id) = RecipeId::parse(name).ok().filter(|id| store.get(*id).is_some()) {
        return Ok(id);
    }
    if let Some(recipe) = store.find_by_name(name) {
        return Ok(recipe.id());
    }

    let lower = name.to_lowercase();
    let matches: Vec<RecipeId> = store
        .recipes()
        .iter()
        .filter(|r| r.name.to_lowercase() == lower)
        .map(Recipe::id)
        .collect();
    match matches.as_slice() {
        [] => bail!("Recipe '{name}' not found"),
        [id] => Ok(*id),
        _ => bail!(
            "'{name}' matches {} recipes with different casing; use the exact name",
            matches.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipebox_core::NewRecipe;

    fn store_with(names: &[&str]) -> (RecipeStore, Vec<RecipeId>) {
        let mut store = RecipeStore::open_in_memory().unwrap();
        let ids = names
            .iter()
            .map(|name| {
                store
                    .add(Recipe::new(NewRecipe::new(
                        *name,
                        "",
                        "",
                        "",
                        "Uncategorized",
                        0,
                        1,
                        "serving",
                    )))
                    .unwrap()
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn test_resolve_exact_and_case_insensitive() {
        let (store, ids) = store_with(&["Pancakes", "Chili"]);
        assert_eq!(resolve_recipe(&store, "Chili").unwrap(), ids[1]);
        assert_eq!(resolve_recipe(&store, "pancakes").unwrap(), ids[0]);
        assert!(resolve_recipe(&store, "Waffles").is_err());
    }

    #[test]
    fn test_resolve_duplicate_names() {
        let (store, ids) = store_with(&["Chili", "Chili", "chili"]);
        assert_eq!(resolve_recipe(&store, "Chili").unwrap(), ids[0]);
        assert_eq!(resolve_recipe(&store, "chili").unwrap(), ids[2]);
        assert!(resolve_recipe(&store, "CHILI").is_err());
    }

    #[test]
    fn test_resolve_by_id() {
        let (store, ids) = store_with(&["Chili", "Chili"]);
        assert_eq!(resolve_recipe(&store, &ids[1].to_string()).unwrap(), ids[1]);
        assert!(resolve_recipe(&store, &RecipeId::new().to_string()).is_err());
    }
}
