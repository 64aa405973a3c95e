use std::fmt;

use thiserror::Error;

use crate::models::RecipeId;

/// Which store mutation a rejected write belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Add,
    Update,
    Remove,
    CreateCategory,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteOp::Add => "add",
            WriteOp::Update => "update",
            WriteOp::Remove => "remove",
            WriteOp::CreateCategory => "create category",
        })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistent store could not be read at all.
    #[error("Recipe store unavailable: {0:#}")]
    Unavailable(anyhow::Error),

    /// A statement against the persistent store failed. The cache was rolled back.
    #[error("Failed to {op} '{name}': {reason:#}")]
    WriteRejected {
        op: WriteOp,
        name: String,
        reason: anyhow::Error,
    },

    #[error("Recipe {0} not found")]
    NotFound(RecipeId),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
