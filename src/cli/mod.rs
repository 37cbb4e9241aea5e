//! Command-line interface for libcat.
//!
//! Provides one-shot commands for searching, listing, adding and deleting
//! catalog items, plus the interactive menu shell (the default).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use crate::config::{self, ResolvedConfig};
use crate::domain::Record;
use crate::library::store::parse_records;
use crate::library::{render_views, Catalog, Highlight, HighlightStyle, SearchScope};

pub mod prompt;
pub mod shell;

use prompt::{collect_items, confirm, LineEditor};

/// libcat - Library catalog manager
#[derive(Parser, Debug)]
#[command(name = "libcat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file (defaults to the config file)
    #[arg(short, long, global = true, env = "LIBCAT_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// How search matches are highlighted
    #[arg(long, global = true, value_enum)]
    pub highlight: Option<HighlightArg>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog for a keyword
    Search {
        /// Keyword (case-insensitive)
        keyword: String,

        /// Field to search: a field name, "contributor", or "all"
        #[arg(short, long)]
        field: Option<String>,
    },

    /// List all items grouped by type
    List,

    /// Add items from a JSON file, or interactively
    Add {
        /// JSON file holding one record or an array of records
        #[arg(short, long)]
        from: Option<PathBuf>,
    },

    /// Delete every item whose title contains a keyword (case-sensitive)
    Delete {
        keyword: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Create a new catalog file
    Init {
        /// Path of the new catalog
        path: PathBuf,

        /// JSON file with the initial records (prompts if omitted)
        #[arg(short, long)]
        from: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Start the interactive menu (default)
    Shell,

    /// Show resolved configuration (debug)
    Config,
}

/// Highlight style for CLI (maps to HighlightStyle)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HighlightArg {
    /// Green background terminal escape
    Ansi,

    /// Square brackets
    Brackets,
}

impl From<HighlightArg> for HighlightStyle {
    fn from(arg: HighlightArg) -> Self {
        match arg {
            HighlightArg::Ansi => HighlightStyle::Ansi,
            HighlightArg::Brackets => HighlightStyle::Brackets,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let cfg = config::config()?;

        let style = self
            .highlight
            .map(HighlightStyle::from)
            .unwrap_or(cfg.highlight);
        let highlight = Highlight::from_style(style);
        let catalog_path = self
            .catalog
            .or_else(|| cfg.catalog.clone())
            .map(with_json_extension);

        match self.command.unwrap_or(Commands::Shell) {
            Commands::Search { keyword, field } => {
                search_catalog(&require_catalog(catalog_path)?, highlight, &keyword, field.as_deref())
            }
            Commands::List => list_catalog(&require_catalog(catalog_path)?),
            Commands::Add { from } => add_items(&require_catalog(catalog_path)?, from),
            Commands::Delete { keyword, yes } => {
                delete_items(&require_catalog(catalog_path)?, highlight, &keyword, yes)
            }
            Commands::Init { path, from, force } => init_catalog(path, from, force),
            Commands::Shell => shell::run(catalog_path, highlight),
            Commands::Config => show_config(cfg, catalog_path.as_deref(), style),
        }
    }
}

/// Append `.json` to paths that do not already end in it.
pub fn with_json_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some_and(|ext| ext == "json") {
        return path;
    }
    let mut name = path.into_os_string();
    name.push(".json");
    PathBuf::from(name)
}

fn require_catalog(path: Option<PathBuf>) -> Result<PathBuf> {
    path.context(
        "No catalog given. Pass --catalog <PATH>, set LIBCAT_CATALOG, \
         or add `catalog:` to .libcat/config.yaml",
    )
}

fn open_catalog(path: &Path) -> Result<Catalog> {
    Catalog::open(path).with_context(|| format!("Failed to load catalog: {}", path.display()))
}

/// Read records to add from a JSON file (one object or an array of objects)
fn read_records_file(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records file: {}", path.display()))?;

    match value {
        Value::Object(record) => Ok(vec![record]),
        _ => Ok(parse_records(&content)?),
    }
}

/// Search the catalog
fn search_catalog(
    path: &Path,
    highlight: Highlight,
    keyword: &str,
    field: Option<&str>,
) -> Result<()> {
    let catalog = open_catalog(path)?.with_highlight(highlight);
    let scope: SearchScope = match field {
        Some(field) => field.parse()?,
        None => SearchScope::All,
    };

    let results = catalog.search(keyword, &scope)?;

    if results.is_empty() {
        println!("No results found for: {}", keyword);
        return Ok(());
    }

    println!("Found {} items for \"{}\" in {}:\n", results.len(), keyword, scope);
    print!("{}", render_views(&results));

    Ok(())
}

/// List all items, grouped by type
fn list_catalog(path: &Path) -> Result<()> {
    let catalog = open_catalog(path)?;

    if catalog.is_empty() {
        println!("Catalog is empty. Use 'libcat add' to add items.");
        return Ok(());
    }

    let listing = catalog.list_all();
    for (kind, views) in listing.iter() {
        println!("{}: {} items", kind, views.len());
        println!("{}", "-".repeat(60));
        if !views.is_empty() {
            println!("{}", render_views(views));
        }
    }

    println!("Total: {} items", listing.total());
    Ok(())
}

/// Add items from a file or interactively
fn add_items(path: &Path, from: Option<PathBuf>) -> Result<()> {
    let mut catalog = open_catalog(path)?;

    let records = match from {
        Some(file) => read_records_file(&file)?,
        None => collect_items(&mut LineEditor::new()?)?,
    };

    let added = catalog
        .add_items(records)
        .with_context(|| format!("Failed to add items to {}", path.display()))?;

    println!("Added {} items to library ({} total).", added, catalog.len());
    Ok(())
}

/// Delete items by title keyword, after showing what would go
fn delete_items(path: &Path, highlight: Highlight, keyword: &str, yes: bool) -> Result<()> {
    let mut catalog = open_catalog(path)?.with_highlight(highlight);

    let preview = catalog.delete_preview(keyword)?;
    if preview.is_empty() {
        println!("Found 0 items...");
        return Ok(());
    }

    print!("{}", render_views(&preview));
    println!();

    if !yes && !confirm(&mut LineEditor::new()?, "Are you sure you want to delete these items?")? {
        println!("Aborted.");
        return Ok(());
    }

    let removed = catalog.delete_by_title_keyword(keyword)?;
    println!("Deleted {} items.", removed);
    Ok(())
}

/// Create a new catalog file
fn init_catalog(path: PathBuf, from: Option<PathBuf>, force: bool) -> Result<()> {
    let path = with_json_extension(path);

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it",
            path.display()
        );
    }

    let records = match from {
        Some(file) => read_records_file(&file)?,
        None => collect_items(&mut LineEditor::new()?)?,
    };

    let catalog = Catalog::create(&path, records)
        .with_context(|| format!("Failed to create catalog: {}", path.display()))?;

    println!("Created {} with {} items.", path.display(), catalog.len());
    Ok(())
}

/// Show resolved configuration
fn show_config(cfg: &ResolvedConfig, catalog: Option<&Path>, style: HighlightStyle) -> Result<()> {
    println!("libcat Configuration");
    println!("{}", "=".repeat(40));
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!(
        "Catalog:     {}",
        catalog
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("Highlight:   {}", style);

    Ok(())
}
