mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    AddArgs, cmd_add, cmd_category_add, cmd_category_list, cmd_favorite, cmd_import, cmd_list,
    cmd_note, cmd_rate, cmd_remove, cmd_search, cmd_show, cmd_suggest, cmd_tag,
};
use crate::config::Config;
use recipebox_core::RecipeStore;
use recipebox_core::models::DEFAULT_CATEGORY;
use recipebox_core::search::DEFAULT_SUGGESTION_LIMIT;

#[derive(Parser)]
#[command(
    name = "recipebox",
    version,
    about = "A small recipe manager CLI",
    long_about = "Keep your recipes in one local SQLite file: add them, rate them, \
                  tag them, search by name, ingredient or category."
)]
struct Cli {
    /// Path to the recipe database (default: per-user data directory)
    #[arg(long, env = "RECIPEBOX_DB", global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipes
    List {
        /// Only recipes in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only favorites
        #[arg(long)]
        favorites: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search recipes by name, ingredient or category
    Search {
        /// Search query (empty lists everything)
        #[arg(default_value = "")]
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest recipe names and ingredients matching a prefix of text
    Suggest {
        /// Text typed so far
        text: String,
        /// Maximum number of suggestions
        #[arg(short, long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show full recipe details
    Show {
        /// Recipe name or id
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new recipe
    Add {
        #[command(flatten)]
        args: AddArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a recipe
    Remove {
        /// Recipe name or id
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rate a recipe from 0 to 5
    Rate {
        /// Recipe name or id
        name: String,
        /// Rating (0.0 - 5.0)
        rating: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a recipe as favorite
    Favorite {
        /// Recipe name or id
        name: String,
        /// Remove the favorite mark instead
        #[arg(long)]
        off: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the notes on a recipe
    Note {
        /// Recipe name or id
        name: String,
        /// Notes text (empty clears)
        notes: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Attach tags to a recipe
    Tag {
        /// Recipe name or id
        name: String,
        /// Tags to add (comma separated or repeated)
        #[arg(required = true)]
        tags: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage recipe categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Import a recipe from a Cooklang (.cook) file
    Import {
        /// Path to the .cook file
        file: PathBuf,
        /// Recipe name override (defaults to metadata title or filename)
        #[arg(long)]
        name: Option<String>,
        /// Category for the imported recipe
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
        /// Servings override (defaults to metadata servings)
        #[arg(long)]
        servings: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories with recipe counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.db)?;
    let mut store = RecipeStore::open(&config.db_path)?;
    tracing::debug!(
        path = %config.db_path.display(),
        recipes = store.len(),
        "opened recipe store"
    );

    match cli.command {
        Commands::List {
            category,
            favorites,
            json,
        } => cmd_list(&store, category.as_deref(), favorites, json),
        Commands::Search { query, json } => cmd_search(&store, &query, json),
        Commands::Suggest { text, limit, json } => cmd_suggest(&store, &text, limit, json),
        Commands::Show { name, json } => cmd_show(&store, &name, json),
        Commands::Add { args, json } => cmd_add(&mut store, args, json),
        Commands::Remove { name, json } => cmd_remove(&mut store, &name, json),
        Commands::Rate { name, rating, json } => cmd_rate(&mut store, &name, rating, json),
        Commands::Favorite { name, off, json } => cmd_favorite(&mut store, &name, !off, json),
        Commands::Note { name, notes, json } => cmd_note(&mut store, &name, &notes, json),
        Commands::Tag { name, tags, json } => cmd_tag(&mut store, &name, &tags, json),
        Commands::Category { command } => match command {
            CategoryCommands::List { json } => cmd_category_list(&store, json),
            CategoryCommands::Add { name, json } => cmd_category_add(&mut store, &name, json),
        },
        Commands::Import {
            file,
            name,
            category,
            servings,
            json,
        } => cmd_import(&mut store, &file, name, &category, servings, json),
    }
}
