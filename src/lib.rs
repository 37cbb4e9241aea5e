//! libcat - File-backed library catalog
//!
//! Keeps a catalog of library items (books, CDs, DVDs, magazines) in a
//! single JSON file and offers keyword search, listing, addition and
//! deletion over it.
//!
//! # Architecture
//!
//! The JSON file is the source of truth:
//! - Items are rebuilt wholesale from the file's flat records on every load
//! - Every mutation rewrites the whole file, then reloads from it
//! - Search works on transient views and never touches stored data
//!
//! # Modules
//!
//! - `domain`: Data structures (Item, ItemKind, ItemView)
//! - `library`: Catalog operations, backing store, search and highlighting
//! - `config`: Config file and environment resolution
//! - `cli`: Command-line interface and interactive menu
//!
//! # Usage
//!
//! ```bash
//! # Interactive menu
//! libcat --catalog library.json
//!
//! # Search contributors
//! libcat -c library.json search herbert --field contributor
//!
//! # Delete by title without prompting
//! libcat -c library.json delete "Dune" --yes
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod library;

// Re-export main types at crate root for convenience
pub use domain::{Item, ItemKind, ItemView, Record};
pub use error::{CatalogError, Result};
pub use library::{
    render_views, Catalog, CatalogListing, Highlight, HighlightStyle, KeywordMatcher, SearchScope,
};
