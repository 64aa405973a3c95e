use anyhow::Result;
use std::process;

use recipebox_core::{Recipe, RecipeStore};

use super::helpers::print_recipe_table;

pub(crate) fn cmd_search(store: &RecipeStore, query: &str, json: bool) -> Result<()> {
    // A blank query lists everything, like an empty search box
    let query = query.trim();
    let results: Vec<&Recipe> = if query.is_empty() {
        store.recipes().iter().collect()
    } else {
        store.search(query)
    };

    if results.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found for '{query}'");
        }
        process::exit(2);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_recipe_table(&results);
    }
    Ok(())
}

pub(crate) fn cmd_suggest(store: &RecipeStore, text: &str, limit: usize, json: bool) -> Result<()> {
    let suggestions = store.suggest(text.trim(), limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }
    if suggestions.is_empty() {
        process::exit(2);
    }
    for suggestion in &suggestions {
        println!("{suggestion}");
    }
    Ok(())
}
