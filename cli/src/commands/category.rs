use anyhow::Result;
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use recipebox_core::RecipeStore;

pub(crate) fn cmd_category_list(store: &RecipeStore, json: bool) -> Result<()> {
    #[derive(Serialize, Tabled)]
    struct CategoryRow {
        #[tabled(rename = "Category")]
        name: String,
        #[tabled(rename = "Recipes")]
        recipes: usize,
    }

    let rows: Vec<CategoryRow> = store
        .backend()
        .list_categories()?
        .into_iter()
        .map(|name| CategoryRow {
            recipes: store.by_category(&name).len(),
            name,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_category_add(store: &mut RecipeStore, name: &str, json: bool) -> Result<()> {
    let created = store.create_category(name)?;
    let name = name.trim();
    if json {
        println!("{}", serde_json::json!({ "category": name, "created": created }));
    } else if created {
        println!("Added category: {name}");
    } else {
        println!("Category already exists: {name}");
    }
    Ok(())
}
