use std::path::Path;

use anyhow::{Context, Result, bail};

use recipebox_core::models::{NewRecipe, Recipe};
use recipebox_core::RecipeStore;

pub(crate) fn cmd_import(
    store: &mut RecipeStore,
    file: &Path,
    name_override: Option<String>,
    category: &str,
    servings_override: Option<i64>,
    json: bool,
) -> Result<()> {
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let recipe = recipe_from_cooklang(&input, file, name_override, category, servings_override)?;
    let id = store.add(recipe)?;

    let Some(recipe) = store.get(id) else {
        bail!("Imported recipe {id} missing from store");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(recipe)?);
    } else {
        let name = &recipe.name;
        let count = recipe.ingredients.split(',').filter(|s| !s.trim().is_empty()).count();
        let servings = recipe.servings;
        println!("Imported recipe: {name} ({count} ingredients, {servings} servings)");
    }
    Ok(())
}

fn recipe_from_cooklang(
    input: &str,
    file: &Path,
    name_override: Option<String>,
    category: &str,
    servings_override: Option<i64>,
) -> Result<Recipe> {
    let (recipe_data, _report) = cooklang::parse(input)
        .into_result()
        .map_err(|e| anyhow::anyhow!("Failed to parse Cooklang file: {e}"))?;

    let name = name_override
        .or_else(|| recipe_data.metadata.title().map(String::from))
        .or_else(|| file.file_stem().and_then(|s| s.to_str()).map(String::from))
        .context("Could not determine recipe name. Use --name to specify one")?;

    let servings = servings_override
        .or_else(|| {
            recipe_data
                .metadata
                .servings()
                .and_then(|s| s.as_number())
                .map(|n| f64::from(n).round() as i64)
        })
        .unwrap_or(1)
        .max(1);

    let converter = cooklang::Converter::default();
    let ingredients: Vec<String> = recipe_data
        .group_ingredients(&converter)
        .iter()
        .map(ingredient_label)
        .collect();

    if ingredients.is_empty() {
        bail!("No ingredients found in recipe");
    }

    let description = recipe_data.metadata.description().unwrap_or_default().to_string();
    let instructions = instructions_from_steps(&recipe_data);

    Ok(Recipe::new(NewRecipe::new(
        name,
        description,
        ingredients.join(", "),
        instructions,
        category,
        0,
        servings,
        "serving",
    )))
}

/// "200 g flour" from the first grouped quantity, or just the name.
fn ingredient_label(gi: &cooklang::ingredient_list::GroupedIngredient<'_>) -> String {
    let name = gi.ingredient.display_name().replace(',', " ");
    match gi.quantity.iter().next() {
        Some(qty) => format!("{qty} {name}"),
        None => name,
    }
}

/// Plain-text instructions, one line per step or text paragraph. Components
/// are shown by name; timers by their duration.
fn instructions_from_steps(recipe: &cooklang::Recipe) -> String {
    let mut lines = Vec::new();
    for section in &recipe.sections {
        if let Some(name) = &section.name {
            lines.push(format!("{name}:"));
        }
        for content in &section.content {
            let text = match content {
                cooklang::Content::Step(step) => step_text(recipe, step),
                cooklang::Content::Text(text) => text.clone(),
            };
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                lines.push(text);
            }
        }
    }
    lines.join("\n")
}

fn step_text(recipe: &cooklang::Recipe, step: &cooklang::Step) -> String {
    let mut out = String::new();
    for item in &step.items {
        match item {
            cooklang::Item::Text { value } => out.push_str(value),
            cooklang::Item::Ingredient { index } => {
                out.push_str(&recipe.ingredients[*index].display_name());
            }
            cooklang::Item::Cookware { index } => {
                out.push_str(recipe.cookware[*index].display_name());
            }
            cooklang::Item::Timer { index } => {
                let timer = &recipe.timers[*index];
                match (&timer.quantity, &timer.name) {
                    (Some(qty), _) => out.push_str(&qty.to_string()),
                    (None, Some(name)) => out.push_str(name),
                    (None, None) => {}
                }
            }
            cooklang::Item::InlineQuantity { index } => {
                out.push_str(&recipe.inline_quantities[*index].to_string());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instructions(source: &str) -> String {
        recipe_from_cooklang(source, Path::new("test.cook"), None, "Uncategorized", None)
            .unwrap()
            .instructions
    }

    #[test]
    fn test_instructions_show_components_by_name() {
        assert_eq!(
            instructions("Whisk @flour{200%g} and @eggs{2} in a #large bowl{}.\n"),
            "Whisk flour and eggs in a large bowl."
        );
        assert_eq!(
            instructions("Bake @dough{} for ~{25%minutes}.\n"),
            "Bake dough for 25 minutes."
        );
    }

    #[test]
    fn test_instructions_one_line_per_step() {
        let source = "Mix @flour{200%g} with @milk{300%ml}.\n\n\
                      Fry in a #pan{}.\n";
        assert_eq!(instructions(source), "Mix flour with milk.\nFry in a pan.");
    }

    #[test]
    fn test_instructions_drop_comments() {
        assert_eq!(
            instructions("Mix @flour{200%g} well. [- family secret -]\n"),
            "Mix flour well."
        );
        assert_eq!(
            instructions("Cook @eggs{2} over medium-low heat. -- until just set\n"),
            "Cook eggs over medium-low heat."
        );
    }

    #[test]
    fn test_instructions_omit_ingredient_notes() {
        assert_eq!(instructions("Add @flour{200%g}(sifted) slowly.\n"), "Add flour slowly.");
    }

    #[test]
    fn test_instructions_keep_text_paragraphs() {
        let source = "Pour in @milk{300%ml}.\n\n> Tip: use cold milk\n";
        assert_eq!(instructions(source), "Pour in milk.\nTip: use cold milk");
    }

    #[test]
    fn test_frontmatter_metadata() {
        let source = "---\ntitle: Pancakes\ndescription: Fluffy and quick\nservings: 4\n---\n\
                      Mix @flour{200%g} with @milk{300%ml}.\n";
        let recipe =
            recipe_from_cooklang(source, Path::new("p.cook"), None, "Uncategorized", None).unwrap();
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.description, "Fluffy and quick");
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.instructions, "Mix flour with milk.");
    }

    #[test]
    fn test_ingredient_labels_include_quantity() {
        let source = "Mix @flour{200%g} with @eggs{2} and @salt.\n";
        let recipe =
            recipe_from_cooklang(source, Path::new("p.cook"), None, "Uncategorized", None).unwrap();
        assert_eq!(recipe.ingredients, "200 g flour, 2 eggs, salt");
    }

    #[test]
    fn test_recipe_from_cooklang() {
        let source = "Crack @eggs{3} into a bowl and add @milk{100%ml}.\n";
        let recipe = recipe_from_cooklang(
            source,
            Path::new("omelette.cook"),
            None,
            "Breakfast",
            Some(2),
        )
        .unwrap();

        assert_eq!(recipe.name, "omelette");
        assert_eq!(recipe.category, "Breakfast");
        assert_eq!(recipe.servings, 2);
        assert!(recipe.ingredients.contains("eggs"));
        assert!(recipe.ingredients.contains("milk"));
        assert_eq!(recipe.instructions, "Crack eggs into a bowl and add milk.");
    }

    #[test]
    fn test_recipe_without_ingredients_rejected() {
        let source = "Just boil some water.\n";
        assert!(
            recipe_from_cooklang(source, Path::new("water.cook"), None, "Uncategorized", None)
                .is_err()
        );
    }

    #[test]
    fn test_import_reads_file_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toast.cook");
        std::fs::write(&path, "Toast @bread{2%slices} and spread @butter.\n").unwrap();

        let mut store = RecipeStore::open_in_memory().unwrap();
        cmd_import(&mut store, &path, Some("Buttered toast".into()), "Uncategorized", None, true)
            .unwrap();

        let recipe = store.find_by_name("Buttered toast").unwrap();
        assert_eq!(recipe.servings, 1);
        assert!(recipe.ingredients.contains("bread"));
    }
}
