//! Catalog of library items backed by a JSON file.
//!
//! The file is the source of truth: every mutation rewrites it in full and
//! then reloads the typed items from it, so the in-memory list is always
//! what a fresh load of the file would produce.

use std::path::Path;

use serde_json::Value;

use super::search::{Highlight, KeywordMatcher, SearchScope};
use super::store::CatalogStore;
use crate::domain::{fields, Item, ItemKind, ItemView, Record};
use crate::error::{CatalogError, Result};

/// Catalog of all library items
#[derive(Debug)]
pub struct Catalog {
    store: CatalogStore,

    /// Raw records exactly as read from the store
    records: Vec<Record>,

    /// Typed items, one per record, in store order
    items: Vec<Item>,

    highlight: Highlight,
}

impl Catalog {
    /// Load a catalog from an existing store file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut catalog = Self {
            store: CatalogStore::new(path.as_ref()),
            records: Vec::new(),
            items: Vec::new(),
            highlight: Highlight::default(),
        };
        catalog.reload()?;
        Ok(catalog)
    }

    /// Write a brand-new store holding `records` and load it.
    ///
    /// Overwrites any existing file at `path`.
    pub fn create(path: impl AsRef<Path>, records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "A new catalog needs at least one item".into(),
            ));
        }
        build_items(&records)?;

        let store = CatalogStore::new(path.as_ref());
        store.write_records(&records)?;
        tracing::info!(path = %store.path().display(), items = records.len(), "Created catalog");

        Self::open(path)
    }

    /// Use a different highlight marker for search results.
    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = highlight;
        self
    }

    /// Re-read the store and rebuild every item.
    ///
    /// The current items are replaced only once the whole file has parsed.
    pub fn reload(&mut self) -> Result<()> {
        let records = self.store.read_records()?;
        let items = build_items(&records)?;

        self.records = records;
        self.items = items;

        tracing::info!(
            path = %self.store.path().display(),
            items = self.items.len(),
            "Loaded catalog"
        );
        Ok(())
    }

    /// Get the backing store path
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Get the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find every item with a field matching `keyword` (case-insensitive).
    ///
    /// Matching fields in the returned views have each occurrence of the
    /// keyword wrapped in the highlight marker. Results are sorted by kind,
    /// then title.
    pub fn search(&self, keyword: &str, scope: &SearchScope) -> Result<Vec<ItemView>> {
        let matcher = KeywordMatcher::new(keyword)?;
        let mut hits: Vec<(&Item, ItemView)> = Vec::new();

        for item in &self.items {
            let mut view = item.locate();
            let scanned: Vec<String> = match scope {
                SearchScope::All => view.field_names().map(String::from).collect(),
                SearchScope::Contributor => item
                    .contributor_roles()
                    .into_iter()
                    .map(String::from)
                    .collect(),
                SearchScope::Field(name) => vec![name.clone()],
            };

            let mut found = false;
            for field in &scanned {
                // A field the item does not have never matches
                let Some(value) = view.get_mut(field) else {
                    continue;
                };
                if let Some(decorated) = self.highlight.apply(value, &matcher) {
                    *value = decorated;
                    found = true;
                }
            }

            if found {
                hits.push((item, view));
            }
        }

        tracing::debug!(keyword, %scope, hits = hits.len(), "Search finished");
        Ok(sorted_views(hits))
    }

    /// Views of exactly the items `delete_by_title_keyword(keyword)` would
    /// remove, with the matched part of each title highlighted.
    pub fn delete_preview(&self, keyword: &str) -> Result<Vec<ItemView>> {
        require_delete_keyword(keyword)?;

        let hits: Vec<(&Item, ItemView)> = self
            .records
            .iter()
            .zip(&self.items)
            .filter(|(record, _)| title_matches(record, keyword))
            .map(|(_, item)| {
                let mut view = item.locate();
                if let Some(title) = view.get_mut(fields::TITLE) {
                    let spans: Vec<_> = title
                        .match_indices(keyword)
                        .map(|(start, m)| start..start + m.len())
                        .collect();
                    let decorated = self.highlight.decorate(title, &spans);
                    *title = decorated;
                }
                (item, view)
            })
            .collect();

        Ok(sorted_views(hits))
    }

    /// All items partitioned by kind, each partition sorted by title.
    ///
    /// Views in the listing have no `Type` field.
    pub fn list_all(&self) -> CatalogListing {
        let mut listing = CatalogListing::default();

        for item in &self.items {
            let mut view = item.locate();
            view.remove(fields::TYPE);
            listing.partition_mut(item.kind()).push(view);
        }

        for kind in ItemKind::ALL {
            listing
                .partition_mut(kind)
                .sort_by(|a, b| a.title().cmp(b.title()));
        }

        listing
    }

    /// Append raw records to the store, rewrite it and reload.
    ///
    /// Every record must build into an item; otherwise nothing is written.
    /// If the write fails the in-memory catalog is left unchanged.
    pub fn add_items(&mut self, records: Vec<Record>) -> Result<usize> {
        if records.is_empty() {
            tracing::debug!("No records to add");
            return Ok(0);
        }

        let added = records.len();
        let mut updated = self.records.clone();
        updated.extend(records);
        build_items(&updated)?;

        self.store.write_records(&updated)?;
        self.reload()?;

        tracing::info!(added, total = self.items.len(), "Added items to catalog");
        Ok(added)
    }

    /// Remove every record whose title contains `keyword` (case-sensitive),
    /// rewrite the store and reload. Returns the number of removed records.
    ///
    /// There is no undo; callers should confirm with the user first.
    pub fn delete_by_title_keyword(&mut self, keyword: &str) -> Result<usize> {
        require_delete_keyword(keyword)?;

        let (removed, kept): (Vec<Record>, Vec<Record>) = self
            .records
            .iter()
            .cloned()
            .partition(|record| title_matches(record, keyword));

        if removed.is_empty() {
            tracing::debug!(keyword, "No titles matched, catalog unchanged");
            return Ok(0);
        }

        self.store.write_records(&kept)?;
        self.reload()?;

        tracing::info!(keyword, removed = removed.len(), "Deleted items from catalog");
        Ok(removed.len())
    }
}

/// Item views grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogListing {
    pub books: Vec<ItemView>,
    pub cds: Vec<ItemView>,
    pub dvds: Vec<ItemView>,
    pub magazines: Vec<ItemView>,
}

impl CatalogListing {
    pub fn by_kind(&self, kind: ItemKind) -> &[ItemView] {
        match kind {
            ItemKind::Book => &self.books,
            ItemKind::Cd => &self.cds,
            ItemKind::Dvd => &self.dvds,
            ItemKind::Magazine => &self.magazines,
        }
    }

    /// Partitions in fixed order: Books, CDs, DVDs, Magazines.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, &[ItemView])> {
        ItemKind::ALL.into_iter().map(move |kind| (kind, self.by_kind(kind)))
    }

    /// Total number of items across all partitions
    pub fn total(&self) -> usize {
        self.books.len() + self.cds.len() + self.dvds.len() + self.magazines.len()
    }

    fn partition_mut(&mut self, kind: ItemKind) -> &mut Vec<ItemView> {
        match kind {
            ItemKind::Book => &mut self.books,
            ItemKind::Cd => &mut self.cds,
            ItemKind::Dvd => &mut self.dvds,
            ItemKind::Magazine => &mut self.magazines,
        }
    }
}

fn build_items(records: &[Record]) -> Result<Vec<Item>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Item::from_record(record).inspect_err(|e| {
                tracing::warn!(index, error = %e, "Invalid catalog record");
            })
        })
        .collect()
}

/// Sort by kind, then by the undecorated title.
fn sorted_views(mut hits: Vec<(&Item, ItemView)>) -> Vec<ItemView> {
    hits.sort_by(|(a, _), (b, _)| (a.kind(), &a.title).cmp(&(b.kind(), &b.title)));
    hits.into_iter().map(|(_, view)| view).collect()
}

fn require_delete_keyword(keyword: &str) -> Result<()> {
    if keyword.is_empty() {
        return Err(CatalogError::InvalidArgument(
            "Delete keyword must not be empty".into(),
        ));
    }
    Ok(())
}

/// Case-sensitive title containment, shared by delete and its preview
fn title_matches(record: &Record, keyword: &str) -> bool {
    record
        .get(fields::TITLE)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains(keyword)
}
