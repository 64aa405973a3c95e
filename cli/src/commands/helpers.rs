use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use recipebox_core::models::Recipe;

pub(crate) fn print_recipe_table(recipes: &[&Recipe]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Difficulty")]
        difficulty: String,
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Cal/serving")]
        calories: i64,
        #[tabled(rename = "Rating")]
        rating: String,
        #[tabled(rename = "Fav")]
        favorite: &'static str,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .enumerate()
        .map(|(i, r)| RecipeRow {
            idx: i + 1,
            name: truncate(&r.name, 30),
            category: truncate(&r.category, 16),
            difficulty: r.difficulty.clone(),
            time: format!("{} min", r.total_time()),
            calories: r.calories,
            rating: format!("{:.1}", r.rating()),
            favorite: if r.favorite { "*" } else { "" },
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..7)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

/// Split comma-separated tag input, dropping empty pieces.
pub(crate) fn split_tags(input: &[String]) -> Vec<String> {
    input
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags() {
        let input = vec!["quick, Vegan".to_string(), " ".to_string(), "spicy".to_string()];
        assert_eq!(split_tags(&input), ["quick", "Vegan", "spicy"]);
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("Recipe 'Soup' not found"), r#"{"error":"Recipe 'Soup' not found"}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Pancakes", 10), "Pancakes");
        assert_eq!(truncate("Slow-cooker pulled pork", 10), "Slow-co...");
    }

    #[test]
    fn test_truncate_utf8() {
        // Should not panic on multi-byte characters
        assert_eq!(truncate("Crème brûlée classique", 10), "Crème b...");
        assert_eq!(truncate("Müsli", 10), "Müsli");
        assert_eq!(truncate("親子丼と味噌汁の朝ごはん", 8), "親子丼と味...");
    }
}
