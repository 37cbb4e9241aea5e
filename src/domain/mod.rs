//! Domain types for the library catalog.
//!
//! - Item: one catalog entry (Book, CD, DVD, Magazine) built from a flat record
//! - ItemView: the ordered field mapping used for display and search

pub mod item;
pub mod view;

// Re-export commonly used types
pub use item::{
    fields, BookDetails, ContributorGroup, DiscDetails, Item, ItemDetails, ItemKind,
    MagazineDetails, Record,
};
pub use view::ItemView;
