use anyhow::{Result, bail};
use clap::Args;
use std::process;

use recipebox_core::models::{DEFAULT_CATEGORY, NewRecipe, Recipe};
use recipebox_core::RecipeStore;
use recipebox_core::search::matches_category;

use super::helpers::{json_error, print_recipe_table, split_tags};
use super::resolve_recipe;

#[derive(Args)]
pub(crate) struct AddArgs {
    /// Recipe name
    pub name: String,
    /// Short description
    #[arg(short, long, default_value = "")]
    pub description: String,
    /// Ingredients, comma separated (e.g. "flour, egg, milk")
    #[arg(short, long, default_value = "")]
    pub ingredients: String,
    /// Preparation and cooking steps
    #[arg(long, default_value = "")]
    pub instructions: String,
    /// Category name (must already exist, see `category add`)
    #[arg(short, long, default_value = DEFAULT_CATEGORY)]
    pub category: String,
    /// Calories per serving
    #[arg(long, default_value = "0")]
    pub calories: i64,
    /// Number of servings
    #[arg(short, long, default_value = "1")]
    pub servings: i64,
    /// Serving unit (e.g. serving, slice, bowl)
    #[arg(long, default_value = "serving")]
    pub unit: String,
    /// Preparation time in minutes (default: 15)
    #[arg(long)]
    pub prep: Option<i64>,
    /// Cooking time in minutes (default: 20)
    #[arg(long)]
    pub cook: Option<i64>,
    /// Difficulty: Easy, Medium, Hard (default: Medium)
    #[arg(long)]
    pub difficulty: Option<String>,
    /// Mark as favorite
    #[arg(long)]
    pub favorite: bool,
    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Protein in grams
    #[arg(long)]
    pub protein: Option<f64>,
    /// Carbs in grams
    #[arg(long)]
    pub carbs: Option<f64>,
    /// Fat in grams
    #[arg(long)]
    pub fat: Option<f64>,
    /// Tag to attach (repeatable, or comma separated)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    /// Rating from 0 to 5
    #[arg(short, long)]
    pub rating: Option<f64>,
}

pub(crate) fn cmd_add(store: &mut RecipeStore, args: AddArgs, json: bool) -> Result<()> {
    if args.servings <= 0 {
        bail!("Servings must be greater than 0");
    }
    if args.calories < 0 {
        bail!("Calories must not be negative");
    }
    if args.prep.is_some_and(|m| m < 0) || args.cook.is_some_and(|m| m < 0) {
        bail!("Times must not be negative");
    }
    let mut recipe = Recipe::new(NewRecipe {
        prep_time: args.prep,
        cook_time: args.cook,
        difficulty: args.difficulty,
        favorite: Some(args.favorite),
        notes: args.notes,
        protein: args.protein,
        carbs: args.carbs,
        fat: args.fat,
        ..NewRecipe::new(
            args.name,
            args.description,
            args.ingredients,
            args.instructions,
            args.category,
            args.calories,
            args.servings,
            args.unit,
        )
    });
    if let Some(rating) = args.rating {
        if !recipe.set_rating(rating) {
            bail!("Rating must be between 0 and 5, got {rating}");
        }
    }
    for tag in split_tags(&args.tags) {
        recipe.add_tag(&tag);
    }

    let id = store.add(recipe)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&store.get(id))?);
    } else if let Some(recipe) = store.get(id) {
        let name = &recipe.name;
        let category = &recipe.category;
        println!("Added recipe: {name} ({category}, id: {id})");
    }
    Ok(())
}

pub(crate) fn cmd_remove(store: &mut RecipeStore, name: &str, json: bool) -> Result<()> {
    let id = resolve_recipe(store, name)?;
    let removed = store.remove(id)?;
    if json {
        println!("{}", serde_json::json!({ "removed": removed.name, "id": id }));
    } else {
        let name = &removed.name;
        println!("Removed recipe: {name}");
    }
    Ok(())
}

pub(crate) fn cmd_show(store: &RecipeStore, name: &str, json: bool) -> Result<()> {
    let id = resolve_recipe(store, name)?;
    let Some(recipe) = store.get(id) else {
        bail!("Recipe '{name}' not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
        return Ok(());
    }

    println!("{}", recipe.details());
    if recipe.favorite {
        println!("Favorite: yes");
    }
    if !recipe.notes.is_empty() {
        let notes = &recipe.notes;
        println!("Notes: {notes}");
    }
    let (protein, carbs, fat) = (recipe.protein, recipe.carbs, recipe.fat);
    if protein > 0.0 || carbs > 0.0 || fat > 0.0 {
        println!("Macros: P:{protein:.0}g C:{carbs:.0}g F:{fat:.0}g");
    }
    Ok(())
}

pub(crate) fn cmd_list(
    store: &RecipeStore,
    category: Option<&str>,
    favorites: bool,
    json: bool,
) -> Result<()> {
    let recipes = listed(store, category, favorites);

    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    } else {
        print_recipe_table(&recipes);
    }
    Ok(())
}

fn listed<'a>(store: &'a RecipeStore, category: Option<&str>, favorites: bool) -> Vec<&'a Recipe> {
    match (category, favorites) {
        (Some(category), true) => store
            .favorites()
            .into_iter()
            .filter(|r| matches_category(r, category))
            .collect(),
        (Some(category), false) => store.by_category(category),
        (None, true) => store.favorites(),
        (None, false) => store.recipes().iter().collect(),
    }
}

pub(crate) fn cmd_rate(store: &mut RecipeStore, name: &str, rating: f64, json: bool) -> Result<()> {
    let id = resolve_recipe(store, name)?;
    let Some(mut recipe) = store.get(id).cloned() else {
        bail!("Recipe '{name}' not found");
    };
    if !recipe.set_rating(rating) {
        let message = format!("Rating must be between 0 and 5, got {rating}");
        if json {
            println!("{}", json_error(&message));
        } else {
            eprintln!("{message}");
        }
        process::exit(2);
    }
    store.update(&recipe)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        let name = &recipe.name;
        println!("Rated {name} {rating:.1}/5.0");
    }
    Ok(())
}

pub(crate) fn cmd_favorite(store: &mut RecipeStore, name: &str, on: bool, json: bool) -> Result<()> {
    let id = resolve_recipe(store, name)?;
    let recipe = store.modify(id, |r| r.favorite = on)?;
    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
    } else {
        let name = &recipe.name;
        if on {
            println!("Marked {name} as favorite");
        } else {
            println!("Removed {name} from favorites");
        }
    }
    Ok(())
}

pub(crate) fn cmd_note(store: &mut RecipeStore, name: &str, notes: &str, json: bool) -> Result<()> {
    let id = resolve_recipe(store, name)?;
    let recipe = store.modify(id, |r| r.notes = notes.to_string())?;
    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
    } else {
        let name = &recipe.name;
        println!("Updated notes for {name}");
    }
    Ok(())
}

pub(crate) fn cmd_tag(store: &mut RecipeStore, name: &str, tags: &[String], json: bool) -> Result<()> {
    let tags = split_tags(tags);
    if tags.is_empty() {
        bail!("No tags given");
    }
    let id = resolve_recipe(store, name)?;
    let recipe = store.modify(id, |r| {
        for tag in &tags {
            r.add_tag(tag);
        }
    })?;
    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
    } else {
        let name = &recipe.name;
        let all = recipe.tags().join(", ");
        println!("Tags for {name}: {all}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct AddCli {
        #[command(flatten)]
        args: AddArgs,
    }

    fn add_args(argv: &[&str]) -> AddArgs {
        AddCli::try_parse_from(std::iter::once("add").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    fn store() -> RecipeStore {
        let mut store = RecipeStore::open_in_memory().unwrap();
        store.create_category("Breakfast").unwrap();
        store.create_category("Dinner").unwrap();
        store
    }

    #[test]
    fn test_add_maps_arguments() {
        let mut store = store();
        let args = add_args(&[
            "Pancakes",
            "-d",
            "Fluffy",
            "-i",
            "flour, egg, milk",
            "-c",
            "Breakfast",
            "--calories",
            "200",
            "-s",
            "2",
            "--prep",
            "5",
            "--difficulty",
            "Easy",
            "--favorite",
            "--protein",
            "6.5",
            "-t",
            "Sweet, quick",
            "-t",
            "sweet",
            "-r",
            "4.5",
        ]);
        cmd_add(&mut store, args, true).unwrap();

        let recipe = store.find_by_name("Pancakes").unwrap();
        assert_eq!(recipe.description, "Fluffy");
        assert_eq!(recipe.ingredients, "flour, egg, milk");
        assert_eq!(recipe.category, "Breakfast");
        assert_eq!(recipe.total_calories(), 400);
        assert_eq!(recipe.prep_time, 5);
        assert_eq!(recipe.cook_time, 20);
        assert_eq!(recipe.difficulty, "Easy");
        assert!(recipe.favorite);
        assert!((recipe.protein - 6.5).abs() < f64::EPSILON);
        assert_eq!(recipe.tags(), ["sweet", "quick"]);
        assert!((recipe.rating() - 4.5).abs() < f64::EPSILON);
        assert_eq!(recipe.serving_unit, "serving");
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let mut store = store();
        assert!(cmd_add(&mut store, add_args(&["Soup", "-r", "7"]), true).is_err());
        assert!(cmd_add(&mut store, add_args(&["Soup", "-s", "0"]), true).is_err());
        assert!(cmd_add(&mut store, add_args(&["Soup", "--calories=-5"]), true).is_err());
        assert!(cmd_add(&mut store, add_args(&["Soup", "--cook=-1"]), true).is_err());
        assert!(cmd_add(&mut store, add_args(&["Soup", "-c", "Sauces"]), true).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_rate_persists() {
        let mut store = store();
        cmd_add(&mut store, add_args(&["Chili", "-c", "Dinner"]), true).unwrap();
        cmd_rate(&mut store, "chili", 3.5, true).unwrap();

        store.reload().unwrap();
        let rating = store.find_by_name("Chili").unwrap().rating();
        assert!((rating - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tag_splits_and_persists() {
        let mut store = store();
        cmd_add(&mut store, add_args(&["Chili", "-c", "Dinner"]), true).unwrap();
        cmd_tag(&mut store, "Chili", &["Spicy, beans".to_string(), "spicy".to_string()], true)
            .unwrap();
        assert!(cmd_tag(&mut store, "Chili", &[" , ".to_string()], true).is_err());

        store.reload().unwrap();
        assert_eq!(store.find_by_name("Chili").unwrap().tags(), ["spicy", "beans"]);
    }

    #[test]
    fn test_listed_filters() {
        let mut store = store();
        cmd_add(&mut store, add_args(&["Pancakes", "-c", "Breakfast", "--favorite"]), true)
            .unwrap();
        cmd_add(&mut store, add_args(&["Waffles", "-c", "Breakfast"]), true).unwrap();
        cmd_add(&mut store, add_args(&["Chili", "-c", "Dinner", "--favorite"]), true).unwrap();

        let names = |recipes: Vec<&Recipe>| -> Vec<String> {
            recipes.into_iter().map(|r| r.name.clone()).collect()
        };
        assert_eq!(names(listed(&store, None, false)), ["Pancakes", "Waffles", "Chili"]);
        assert_eq!(names(listed(&store, None, true)), ["Pancakes", "Chili"]);
        assert_eq!(names(listed(&store, Some("breakfast"), false)), ["Pancakes", "Waffles"]);
        assert_eq!(names(listed(&store, Some("Breakfast"), true)), ["Pancakes"]);
        assert_eq!(listed(&store, Some("Dinner"), true).len(), 1);
    }

    #[test]
    fn test_favorite_and_note() {
        let mut store = store();
        cmd_add(&mut store, add_args(&["Chili", "-c", "Dinner"]), true).unwrap();
        cmd_favorite(&mut store, "Chili", true, true).unwrap();
        cmd_note(&mut store, "Chili", "more cumin", true).unwrap();

        store.reload().unwrap();
        let chili = store.find_by_name("Chili").unwrap();
        assert!(chili.favorite);
        assert_eq!(chili.notes, "more cumin");

        cmd_favorite(&mut store, "Chili", false, true).unwrap();
        assert!(store.favorites().is_empty());
    }
}
