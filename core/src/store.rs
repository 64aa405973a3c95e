use std::path::Path;

use anyhow::{Result, anyhow};
use tracing::{debug, warn};

use crate::db::Database;
use crate::error::{StoreError, StoreResult, WriteOp};
use crate::models::{Recipe, RecipeId};
use crate::search;

/// Persistent storage behind a [`RecipeStore`].
///
/// `Database` is the SQLite implementation. Every call is synchronous and
/// autocommits on its own; the store never groups calls into a transaction.
pub trait RecipeBackend {
    fn load_recipes(&self) -> Result<Vec<Recipe>>;
    fn insert_recipe(&self, recipe: &Recipe) -> Result<()>;
    /// Returns false if storage has no row for the recipe's id.
    fn update_recipe(&self, recipe: &Recipe) -> Result<bool>;
    /// Returns false if storage has no row for `id`.
    fn delete_recipe(&self, id: RecipeId) -> Result<bool>;
    /// Returns false if the category already existed.
    fn insert_category(&self, name: &str) -> Result<bool>;
}

impl RecipeBackend for Database {
    fn load_recipes(&self) -> Result<Vec<Recipe>> {
        self.get_recipes()
    }

    fn insert_recipe(&self, recipe: &Recipe) -> Result<()> {
        Database::insert_recipe(self, recipe)
    }

    fn update_recipe(&self, recipe: &Recipe) -> Result<bool> {
        Database::update_recipe(self, recipe)
    }

    fn delete_recipe(&self, id: RecipeId) -> Result<bool> {
        Database::delete_recipe(self, id)
    }

    fn insert_category(&self, name: &str) -> Result<bool> {
        Database::insert_category(self, name)
    }
}

/// In-memory view of every recipe, kept in step with a [`RecipeBackend`].
///
/// Mutations touch the cache first and then storage. When the storage write
/// fails the cache change is undone and the error is returned, so the two
/// never drift apart on a failed write.
pub struct RecipeStore<B: RecipeBackend = Database> {
    backend: B,
    recipes: Vec<Recipe>,
    categories: Vec<String>,
}

impl RecipeStore<Database> {
    /// Open the SQLite database at `path` and load every recipe from it.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let db = Database::open(path).map_err(StoreError::Unavailable)?;
        let mut store = Self::new(db);
        store.load()?;
        Ok(store)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::open_in_memory().map_err(StoreError::Unavailable)?;
        Ok(Self::new(db))
    }
}

impl<B: RecipeBackend> RecipeStore<B> {
    /// An empty store over `backend`. Call [`load`](Self::load) to populate it.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            recipes: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the cache with everything in storage and rebuild the category
    /// set from the loaded recipes. On failure the store is left empty.
    pub fn load(&mut self) -> StoreResult<usize> {
        self.recipes.clear();
        self.categories.clear();

        let recipes = self.backend.load_recipes().map_err(|e| {
            warn!("Failed to load recipes: {e:#}");
            StoreError::Unavailable(e)
        })?;
        for recipe in &recipes {
            self.add_category(&recipe.category);
        }
        self.recipes = recipes;
        debug!(
            recipes = self.recipes.len(),
            categories = self.categories.len(),
            "Loaded recipe store"
        );
        Ok(self.recipes.len())
    }

    pub fn reload(&mut self) -> StoreResult<usize> {
        self.load()
    }

    // --- Mutations ---

    pub fn add(&mut self, recipe: Recipe) -> StoreResult<RecipeId> {
        let id = recipe.id();
        if self.position(id).is_some() {
            return Err(StoreError::WriteRejected {
                op: WriteOp::Add,
                name: recipe.name,
                reason: anyhow!("recipe {id} is already in the store"),
            });
        }

        self.recipes.push(recipe);
        let idx = self.recipes.len() - 1;
        if let Err(reason) = self.backend.insert_recipe(&self.recipes[idx]) {
            let recipe = self.recipes.remove(idx);
            warn!(recipe = %recipe.name, "Rolled back add: {reason:#}");
            return Err(StoreError::WriteRejected {
                op: WriteOp::Add,
                name: recipe.name,
                reason,
            });
        }

        let category = self.recipes[idx].category.clone();
        self.add_category(&category);
        debug!(recipe = %self.recipes[idx].name, %id, "Added recipe");
        Ok(id)
    }

    pub fn remove(&mut self, id: RecipeId) -> StoreResult<Recipe> {
        let idx = self.position(id).ok_or(StoreError::NotFound(id))?;
        let recipe = self.recipes.remove(idx);

        match self.backend.delete_recipe(id) {
            Ok(true) => {
                debug!(recipe = %recipe.name, %id, "Removed recipe");
                Ok(recipe)
            }
            Ok(false) => {
                warn!(recipe = %recipe.name, %id, "Removed recipe had no stored row");
                Ok(recipe)
            }
            Err(reason) => {
                warn!(recipe = %recipe.name, "Rolled back remove: {reason:#}");
                let name = recipe.name.clone();
                self.recipes.insert(idx, recipe);
                Err(StoreError::WriteRejected {
                    op: WriteOp::Remove,
                    name,
                    reason,
                })
            }
        }
    }

    /// Persist every field of `recipe`, keyed by its id, then replace the
    /// cached copy. The cache is untouched if the write fails.
    pub fn update(&mut self, recipe: &Recipe) -> StoreResult<()> {
        let id = recipe.id();
        let idx = self.position(id).ok_or(StoreError::NotFound(id))?;

        let reason = match self.backend.update_recipe(recipe) {
            Ok(true) => None,
            Ok(false) => Some(anyhow!("no stored row for recipe {id}")),
            Err(e) => Some(e),
        };
        if let Some(reason) = reason {
            warn!(recipe = %recipe.name, "Update not applied: {reason:#}");
            return Err(StoreError::WriteRejected {
                op: WriteOp::Update,
                name: recipe.name.clone(),
                reason,
            });
        }

        self.recipes[idx] = recipe.clone();
        self.add_category(&recipe.category);
        debug!(recipe = %recipe.name, %id, "Updated recipe");
        Ok(())
    }

    /// Apply `change` to a copy of the cached recipe and [`update`](Self::update) with it.
    pub fn modify<F>(&mut self, id: RecipeId, change: F) -> StoreResult<&Recipe>
    where
        F: FnOnce(&mut Recipe),
    {
        let mut recipe = self.get(id).cloned().ok_or(StoreError::NotFound(id))?;
        change(&mut recipe);
        self.update(&recipe)?;
        self.get(id).ok_or(StoreError::NotFound(id))
    }

    // --- Queries ---

    /// Snapshot of every recipe in load/add order.
    #[must_use]
    pub fn all_recipes(&self) -> Vec<Recipe> {
        self.recipes.clone()
    }

    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id() == id)
    }

    /// First recipe whose name is exactly `name`. Names may repeat.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn details(&self, name: &str) -> Option<String> {
        self.find_by_name(name).map(Recipe::details)
    }

    /// Case-insensitive substring search over name, ingredients, and category.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Recipe> {
        let query = query.to_lowercase();
        self.recipes
            .iter()
            .filter(|r| search::matches_query(r, &query))
            .collect()
    }

    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| search::matches_category(r, category))
            .collect()
    }

    #[must_use]
    pub fn favorites(&self) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.favorite).collect()
    }

    #[must_use]
    pub fn suggest(&self, text: &str, limit: usize) -> Vec<String> {
        search::suggestions(&self.recipes, text, limit)
    }

    // --- Categories ---

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Register a category in memory only. Presence is checked ignoring
    /// case and the first spelling seen is kept.
    pub fn add_category(&mut self, name: &str) -> bool {
        let lower = name.to_lowercase();
        if self.categories.iter().any(|c| c.to_lowercase() == lower) {
            return false;
        }
        self.categories.push(name.to_string());
        true
    }

    /// Create the category in storage, then register it in memory.
    /// Returns false if storage already had it.
    pub fn create_category(&mut self, name: &str) -> StoreResult<bool> {
        let created = self.backend.insert_category(name).map_err(|reason| {
            warn!(category = name, "Failed to create category: {reason:#}");
            StoreError::WriteRejected {
                op: WriteOp::CreateCategory,
                name: name.to_string(),
                reason,
            }
        })?;
        self.add_category(name.trim());
        Ok(created)
    }

    fn position(&self, id: RecipeId) -> Option<usize> {
        self.recipes.iter().position(|r| r.id() == id)
    }
}
