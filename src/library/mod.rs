//! File-backed library catalog.
//!
//! # Storage Layout
//!
//! The catalog lives in a single JSON file holding an array of flat records:
//!
//! ```text
//! [
//!     {
//!         "Title": "Dune",
//!         "Type": "Book",
//!         "Contributor": {"Author": "Frank Herbert"},
//!         "Subject": "Sci-Fi",
//!         "ISBN": "9780441013593",
//!         "DDS": "813.54",
//!         "UPC": "0441013597"
//!     }
//! ]
//! ```

pub mod catalog;
pub mod format;
pub mod search;
pub mod store;

pub use catalog::{Catalog, CatalogListing};
pub use format::render_views;
pub use search::{Highlight, HighlightStyle, KeywordMatcher, SearchScope};
pub use store::CatalogStore;
