use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Local;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::models::{DEFAULT_CATEGORY, DIFFICULTY_LEVELS, NewRecipe, Recipe, RecipeId};

const RECIPE_SELECT: &str = "SELECT r.uuid, r.name, r.description, r.ingredients, r.instructions,
        c.name, r.calories, r.servings, r.serving_unit, r.prep_time,
        r.cook_time, d.label, r.is_favorite, r.notes,
        r.protein, r.carbs, r.fat, r.rating, r.tags
 FROM recipes r
 JOIN categories c ON r.category_id = c.id
 JOIN difficulty_levels d ON r.difficulty_id = d.id";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS categories (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL UNIQUE COLLATE NOCASE
                );

                CREATE TABLE IF NOT EXISTS difficulty_levels (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    label TEXT NOT NULL UNIQUE COLLATE NOCASE
                );

                CREATE TABLE IF NOT EXISTS recipes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    uuid TEXT NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    description TEXT NOT NULL,
                    ingredients TEXT NOT NULL,
                    instructions TEXT NOT NULL,
                    category_id INTEGER NOT NULL REFERENCES categories(id),
                    calories INTEGER NOT NULL,
                    servings INTEGER NOT NULL,
                    serving_unit TEXT NOT NULL,
                    prep_time INTEGER NOT NULL,
                    cook_time INTEGER NOT NULL,
                    difficulty_id INTEGER NOT NULL REFERENCES difficulty_levels(id),
                    is_favorite INTEGER NOT NULL DEFAULT 0,
                    notes TEXT NOT NULL DEFAULT '',
                    protein REAL NOT NULL DEFAULT 0,
                    carbs REAL NOT NULL DEFAULT 0,
                    fat REAL NOT NULL DEFAULT 0,
                    rating REAL NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_recipes_name ON recipes(name);",
            )?;

            for label in DIFFICULTY_LEVELS {
                self.conn.execute(
                    "INSERT OR IGNORE INTO difficulty_levels (label) VALUES (?1)",
                    params![label],
                )?;
            }
            self.conn.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
                params![DEFAULT_CATEGORY],
            )?;

            self.conn.execute_batch("PRAGMA user_version = 1;")?;
        }

        if version < 2 {
            // Tags are a JSON array of lowercase strings
            self.conn.execute_batch(
                "ALTER TABLE recipes ADD COLUMN tags TEXT NOT NULL DEFAULT '[]';
                 PRAGMA user_version = 2;",
            )?;
        }

        Ok(())
    }

    // --- Row mapping helpers ---

    // Expects columns:
    // 0: r.uuid, 1: r.name, 2: r.description, 3: r.ingredients, 4: r.instructions,
    // 5: c.name, 6: r.calories, 7: r.servings, 8: r.serving_unit, 9: r.prep_time,
    // 10: r.cook_time, 11: d.label, 12: r.is_favorite, 13: r.notes,
    // 14: r.protein, 15: r.carbs, 16: r.fat, 17: r.rating, 18: r.tags
    fn recipe_from_row(row: &rusqlite::Row) -> rusqlite::Result<Recipe> {
        let mut recipe = Recipe::with_id(
            row.get(0)?,
            NewRecipe {
                name: row.get(1)?,
                description: row.get(2)?,
                ingredients: row.get(3)?,
                instructions: row.get(4)?,
                category: row.get(5)?,
                calories: row.get(6)?,
                servings: row.get(7)?,
                serving_unit: row.get(8)?,
                prep_time: Some(row.get(9)?),
                cook_time: Some(row.get(10)?),
                difficulty: Some(row.get(11)?),
                favorite: Some(row.get(12)?),
                notes: Some(row.get(13)?),
                protein: Some(row.get(14)?),
                carbs: Some(row.get(15)?),
                fat: Some(row.get(16)?),
            },
        );
        // Stored values go through the same rating and tag rules as user input
        recipe.set_rating(row.get(17)?);
        let tags_json: String = row.get(18)?;
        let tags: Vec<String> = serde_json::from_str(&tags_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(18, Type::Text, Box::new(e)))?;
        for tag in &tags {
            recipe.add_tag(tag);
        }
        Ok(recipe)
    }

    // --- Recipes ---

    pub fn get_recipes(&self) -> Result<Vec<Recipe>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECIPE_SELECT} ORDER BY r.id"))?;
        let recipes = stmt
            .query_map([], Self::recipe_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(recipes)
    }

    pub fn get_recipe(&self, id: RecipeId) -> Result<Recipe> {
        self.conn
            .query_row(
                &format!("{RECIPE_SELECT} WHERE r.uuid = ?1"),
                params![id],
                Self::recipe_from_row,
            )
            .context("Recipe not found")
    }

    pub fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.check_lookups(recipe)?;
        let now = Local::now().to_rfc3339();
        let tags = serde_json::to_string(recipe.tags())?;
        self.conn
            .execute(
                "INSERT INTO recipes (uuid, name, description, ingredients, instructions, category_id,
                    calories, servings, serving_unit, prep_time, cook_time, difficulty_id,
                    is_favorite, notes, protein, carbs, fat, rating, tags, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5,
                    (SELECT id FROM categories WHERE name = ?6),
                    ?7, ?8, ?9, ?10, ?11,
                    (SELECT id FROM difficulty_levels WHERE label = ?12),
                    ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?20)",
                params![
                    recipe.id(),
                    recipe.name,
                    recipe.description,
                    recipe.ingredients,
                    recipe.instructions,
                    recipe.category,
                    recipe.calories,
                    recipe.servings,
                    recipe.serving_unit,
                    recipe.prep_time,
                    recipe.cook_time,
                    recipe.difficulty,
                    recipe.favorite,
                    recipe.notes,
                    recipe.protein,
                    recipe.carbs,
                    recipe.fat,
                    recipe.rating(),
                    tags,
                    now,
                ],
            )
            .with_context(|| format!("Failed to insert recipe '{}'", recipe.name))?;
        Ok(())
    }

    /// Write every field of `recipe` to the row with the same id.
    /// Returns false if no such row exists.
    pub fn update_recipe(&self, recipe: &Recipe) -> Result<bool> {
        self.check_lookups(recipe)?;
        let now = Local::now().to_rfc3339();
        let tags = serde_json::to_string(recipe.tags())?;
        let rows = self
            .conn
            .execute(
                "UPDATE recipes SET
                    name = ?1, description = ?2, ingredients = ?3, instructions = ?4,
                    category_id = (SELECT id FROM categories WHERE name = ?5),
                    calories = ?6, servings = ?7, serving_unit = ?8, prep_time = ?9, cook_time = ?10,
                    difficulty_id = (SELECT id FROM difficulty_levels WHERE label = ?11),
                    is_favorite = ?12, notes = ?13, protein = ?14, carbs = ?15, fat = ?16,
                    rating = ?17, tags = ?18, updated_at = ?19
                 WHERE uuid = ?20",
                params![
                    recipe.name,
                    recipe.description,
                    recipe.ingredients,
                    recipe.instructions,
                    recipe.category,
                    recipe.calories,
                    recipe.servings,
                    recipe.serving_unit,
                    recipe.prep_time,
                    recipe.cook_time,
                    recipe.difficulty,
                    recipe.favorite,
                    recipe.notes,
                    recipe.protein,
                    recipe.carbs,
                    recipe.fat,
                    recipe.rating(),
                    tags,
                    now,
                    recipe.id(),
                ],
            )
            .with_context(|| format!("Failed to update recipe '{}'", recipe.name))?;
        Ok(rows > 0)
    }

    pub fn delete_recipe(&self, id: RecipeId) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM recipes WHERE uuid = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Categories and difficulty levels are never created implicitly by a recipe write.
    fn check_lookups(&self, recipe: &Recipe) -> Result<()> {
        if !self.category_exists(&recipe.category)? {
            bail!("Unknown category '{}'", recipe.category);
        }
        if !self.difficulty_exists(&recipe.difficulty)? {
            bail!(
                "Unknown difficulty '{}'. Must be one of: {}",
                recipe.difficulty,
                self.list_difficulty_levels()?.join(", ")
            );
        }
        Ok(())
    }

    // --- Categories ---

    /// Returns false if a category with that name (ignoring case) already exists.
    pub fn insert_category(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Category name must not be empty");
        }
        let rows = self.conn.execute(
            "INSERT OR IGNORE INTO categories (name) VALUES (?1)",
            params![name],
        )?;
        Ok(rows > 0)
    }

    pub fn list_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM categories ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    pub fn category_exists(&self, name: &str) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    // --- Difficulty levels ---

    pub fn list_difficulty_levels(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT label FROM difficulty_levels ORDER BY id")?;
        let labels = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(labels)
    }

    fn difficulty_exists(&self, label: &str) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM difficulty_levels WHERE label = ?1)",
            params![label],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl ToSql for RecipeId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for RecipeId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Uuid::parse_str(s)
            .map(RecipeId::from)
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
