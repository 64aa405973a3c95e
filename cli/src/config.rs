use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct Config {
    pub db_path: PathBuf,
}

impl Config {
    /// Resolve where the recipe database lives. An explicit `db_path` wins
    /// over the per-user data directory. The parent directory is created.
    pub fn load(db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(path) => path,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "recipebox")
                    .context("Could not determine home directory")?;
                proj_dirs.data_dir().join("recipebox.db")
            }
        };

        if let Some(dir) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }

        Ok(Config { db_path })
    }
}
