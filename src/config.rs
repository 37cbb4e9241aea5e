//! Configuration for libcat.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (handled by the CLI)
//! 2. Environment variables (LIBCAT_CATALOG, LIBCAT_HIGHLIGHT)
//! 3. Config file (.libcat/config.yaml)
//! 4. Defaults (no catalog, ANSI highlighting)
//!
//! Config file discovery:
//! - Searches current directory and parents for .libcat/config.yaml
//! - Falls back to ~/.libcat/config.yaml
//! - The catalog path in a config file is relative to the directory that
//!   contains `.libcat/`

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::library::HighlightStyle;

/// Environment variable naming the catalog file
pub const ENV_CATALOG: &str = "LIBCAT_CATALOG";

/// Environment variable selecting the highlight style
pub const ENV_HIGHLIGHT: &str = "LIBCAT_HIGHLIGHT";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    /// Catalog file (relative to the project root)
    #[serde(default)]
    pub catalog: Option<String>,
    #[serde(default)]
    pub highlight: Option<HighlightStyle>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Catalog file to open when none is given on the command line
    pub catalog: Option<PathBuf>,
    /// Marker style for search matches
    pub highlight: HighlightStyle,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut current) = std::env::current_dir() {
        loop {
            let config_path = current.join(".libcat").join("config.yaml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }
    }

    let home_config = dirs::home_dir()?.join(".libcat").join("config.yaml");
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Combine a config file (if any) with environment overrides
fn resolve_config(
    config_file: Option<PathBuf>,
    env_catalog: Option<String>,
    env_highlight: Option<String>,
) -> Result<ResolvedConfig> {
    let file = config_file
        .as_deref()
        .map(load_config_file)
        .transpose()?;

    let catalog = if let Some(env_path) = env_catalog {
        Some(PathBuf::from(env_path))
    } else {
        match (&file, &config_file) {
            (Some(ConfigFile { catalog: Some(path), .. }), Some(config_path)) => {
                // Base directory is the parent of .libcat/
                let base_dir = config_path
                    .parent()
                    .and_then(|p| p.parent())
                    .unwrap_or(Path::new("."));
                Some(resolve_path(base_dir, path))
            }
            _ => None,
        }
    };

    let highlight = if let Some(style) = env_highlight {
        style
            .parse()
            .with_context(|| format!("Invalid {} value", ENV_HIGHLIGHT))?
    } else {
        file.as_ref()
            .and_then(|f| f.highlight)
            .unwrap_or_default()
    };

    Ok(ResolvedConfig {
        catalog,
        highlight,
        config_file,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    resolve_config(
        find_config_file(),
        std::env::var(ENV_CATALOG).ok(),
        std::env::var(ENV_HIGHLIGHT).ok(),
    )
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Resolve configuration again, bypassing the cache
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
