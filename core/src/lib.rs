pub mod db;
pub mod error;
pub mod models;
pub mod search;
pub mod store;

pub use error::{StoreError, StoreResult, WriteOp};
pub use models::{NewRecipe, Recipe, RecipeId};
pub use store::{RecipeBackend, RecipeStore};
