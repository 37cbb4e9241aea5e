//! Typed catalog items rebuilt from flat store records.
//!
//! Every record in the backing store is a flat JSON object. `Item` is the
//! typed form of one record; `ItemDetails` carries the kind-specific payload
//! so that dispatch on the kind is a closed `match`.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use super::view::ItemView;
use crate::error::{CatalogError, Result};

/// A raw flat record as stored in the catalog file.
pub type Record = Map<String, Value>;

/// Field names used in store records and item views.
pub mod fields {
    pub const TITLE: &str = "Title";
    pub const TYPE: &str = "Type";
    pub const UPC: &str = "UPC";
    pub const CONTRIBUTOR: &str = "Contributor";
    pub const SUBJECT: &str = "Subject";
    pub const ISBN: &str = "ISBN";
    pub const DDS: &str = "DDS";
    pub const GENRE: &str = "Genre";
    pub const ASIN: &str = "ASIN";
    pub const VOLUME: &str = "Volume";
    pub const ISSUE: &str = "Issue";

    /// Every fixed field name, in canonical spelling.
    pub const ALL: [&str; 11] = [
        TITLE, TYPE, UPC, CONTRIBUTOR, SUBJECT, ISBN, DDS, GENRE, ASIN, VOLUME, ISSUE,
    ];
}

/// Separator between contributor names sharing one role.
pub const NAME_SEPARATOR: &str = ", ";

/// Kind of library item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    Book,
    Cd,
    Dvd,
    Magazine,
}

impl ItemKind {
    /// All kinds in listing order.
    pub const ALL: [ItemKind; 4] = [ItemKind::Book, ItemKind::Cd, ItemKind::Dvd, ItemKind::Magazine];

    /// Spelling used in the `Type` field of store records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Book => "Book",
            ItemKind::Cd => "CD",
            ItemKind::Dvd => "DVD",
            ItemKind::Magazine => "Magazine",
        }
    }

    /// Resolve the `Type` field of a stored record.
    ///
    /// Any value other than `Book`, `CD` or `DVD` is treated as a Magazine.
    /// Existing catalogs rely on this, so it is kept as a rule rather than
    /// rejected as an error.
    pub fn from_type_field(value: &str) -> ItemKind {
        value.parse().unwrap_or(ItemKind::Magazine)
    }

    /// Kind-specific fields in view order.
    pub fn detail_fields(&self) -> &'static [&'static str] {
        match self {
            ItemKind::Book => &[fields::SUBJECT, fields::ISBN, fields::DDS],
            ItemKind::Cd | ItemKind::Dvd => &[fields::GENRE, fields::ASIN],
            ItemKind::Magazine => &[fields::VOLUME, fields::ISSUE],
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = CatalogError;

    /// Strict parse: only the exact store spellings are accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Book" => Ok(ItemKind::Book),
            "CD" => Ok(ItemKind::Cd),
            "DVD" => Ok(ItemKind::Dvd),
            "Magazine" => Ok(ItemKind::Magazine),
            _ => Err(CatalogError::InvalidArgument(format!(
                "Unknown item type: {} (expected Book, CD, DVD or Magazine)",
                s
            ))),
        }
    }
}

/// Everyone credited under one role (Author, Director, Actor, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorGroup {
    pub role: String,
    pub names: Vec<String>,
}

impl ContributorGroup {
    /// Build a group from the store's comma-joined name list.
    pub fn parse(role: impl Into<String>, joined: &str) -> Self {
        Self {
            role: role.into(),
            names: joined.split(NAME_SEPARATOR).map(String::from).collect(),
        }
    }

    pub fn joined_names(&self) -> String {
        self.names.join(NAME_SEPARATOR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetails {
    pub subject: String,
    pub isbn: String,
    /// Dewey Decimal classification code
    pub dds: String,
}

/// Shared payload for CDs and DVDs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscDetails {
    pub genre: String,
    pub asin: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagazineDetails {
    pub volume: String,
    pub issue: String,
}

/// Kind-specific payload of an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDetails {
    Book(BookDetails),
    Cd(DiscDetails),
    Dvd(DiscDetails),
    Magazine(MagazineDetails),
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub title: String,

    /// UPC-like identifier
    pub identifier: String,

    /// Contributor groups in store order
    pub contributors: Vec<ContributorGroup>,

    pub details: ItemDetails,
}

impl Item {
    /// Build a typed item from one store record.
    ///
    /// Fails with `MissingField` when a required field for the record's kind
    /// is absent, or when the title, identifier or contributor list is empty.
    pub fn from_record(record: &Record) -> Result<Self> {
        let type_field = require_str(record, fields::TYPE, "Item")?;
        let kind = ItemKind::from_type_field(type_field);
        let label = kind.as_str();

        let title = require_non_empty(record, fields::TITLE, label)?;
        if kind == ItemKind::Magazine && type_field != label {
            tracing::warn!(title, type_field, "Unrecognized item type, treating as Magazine");
        }

        let identifier = require_non_empty(record, fields::UPC, label)?;
        let contributors = parse_contributors(record, label)?;

        let details = match kind {
            ItemKind::Book => ItemDetails::Book(BookDetails {
                subject: require_str(record, fields::SUBJECT, label)?.to_string(),
                isbn: require_str(record, fields::ISBN, label)?.to_string(),
                dds: require_str(record, fields::DDS, label)?.to_string(),
            }),
            ItemKind::Cd => ItemDetails::Cd(DiscDetails::from_record(record, label)?),
            ItemKind::Dvd => ItemDetails::Dvd(DiscDetails::from_record(record, label)?),
            ItemKind::Magazine => ItemDetails::Magazine(MagazineDetails {
                volume: require_str(record, fields::VOLUME, label)?.to_string(),
                issue: require_str(record, fields::ISSUE, label)?.to_string(),
            }),
        };

        Ok(Self {
            title: title.to_string(),
            identifier: identifier.to_string(),
            contributors,
            details,
        })
    }

    pub fn kind(&self) -> ItemKind {
        match self.details {
            ItemDetails::Book(_) => ItemKind::Book,
            ItemDetails::Cd(_) => ItemKind::Cd,
            ItemDetails::Dvd(_) => ItemKind::Dvd,
            ItemDetails::Magazine(_) => ItemKind::Magazine,
        }
    }

    /// Flat view of the item: Title, Type, one entry per contributor role,
    /// kind-specific fields, then UPC.
    ///
    /// Always a fresh value; mutating it never touches the item.
    pub fn locate(&self) -> ItemView {
        let mut view = ItemView::new(self.kind());
        view.insert(fields::TITLE, self.title.as_str());
        view.insert(fields::TYPE, self.kind().as_str());

        for group in &self.contributors {
            view.insert(group.role.as_str(), group.joined_names());
        }

        for (field, value) in self.detail_pairs() {
            view.insert(field, value);
        }

        view.insert(fields::UPC, self.identifier.as_str());
        view
    }

    /// Role names of all contributor groups.
    pub fn contributor_roles(&self) -> Vec<&str> {
        self.contributors.iter().map(|c| c.role.as_str()).collect()
    }

    /// Inverse of [`Item::from_record`].
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(fields::TITLE.into(), self.title.clone().into());
        record.insert(fields::TYPE.into(), self.kind().as_str().into());

        let contributors: Record = self
            .contributors
            .iter()
            .map(|c| (c.role.clone(), Value::from(c.joined_names())))
            .collect();
        record.insert(fields::CONTRIBUTOR.into(), Value::Object(contributors));

        for (field, value) in self.detail_pairs() {
            record.insert(field.into(), value.into());
        }

        record.insert(fields::UPC.into(), self.identifier.clone().into());
        record
    }

    fn detail_pairs(&self) -> Vec<(&'static str, &str)> {
        match &self.details {
            ItemDetails::Book(book) => vec![
                (fields::SUBJECT, book.subject.as_str()),
                (fields::ISBN, book.isbn.as_str()),
                (fields::DDS, book.dds.as_str()),
            ],
            ItemDetails::Cd(disc) | ItemDetails::Dvd(disc) => vec![
                (fields::GENRE, disc.genre.as_str()),
                (fields::ASIN, disc.asin.as_str()),
            ],
            ItemDetails::Magazine(magazine) => vec![
                (fields::VOLUME, magazine.volume.as_str()),
                (fields::ISSUE, magazine.issue.as_str()),
            ],
        }
    }
}

impl DiscDetails {
    fn from_record(record: &Record, label: &str) -> Result<Self> {
        Ok(Self {
            genre: require_str(record, fields::GENRE, label)?.to_string(),
            asin: require_str(record, fields::ASIN, label)?.to_string(),
        })
    }
}

fn require_str<'a>(record: &'a Record, field: &str, kind: &str) -> Result<&'a str> {
    match record.get(field) {
        None | Some(Value::Null) => Err(CatalogError::missing(kind, field)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(CatalogError::Parse(format!(
            "field `{}` of {} record must be a string, found {}",
            field, kind, other
        ))),
    }
}

fn require_non_empty<'a>(record: &'a Record, field: &str, kind: &str) -> Result<&'a str> {
    let value = require_str(record, field, kind)?;
    if value.is_empty() {
        return Err(CatalogError::missing(kind, field));
    }
    Ok(value)
}

fn parse_contributors(record: &Record, kind: &str) -> Result<Vec<ContributorGroup>> {
    let roles = match record.get(fields::CONTRIBUTOR) {
        None | Some(Value::Null) => return Err(CatalogError::missing(kind, fields::CONTRIBUTOR)),
        Some(Value::Object(roles)) => roles,
        Some(other) => {
            return Err(CatalogError::Parse(format!(
                "field `Contributor` of {} record must be an object, found {}",
                kind, other
            )))
        }
    };

    if roles.is_empty() {
        return Err(CatalogError::missing(kind, fields::CONTRIBUTOR));
    }

    roles
        .iter()
        .map(|(role, names)| match names {
            Value::String(joined) => Ok(ContributorGroup::parse(role.as_str(), joined)),
            other => Err(CatalogError::Parse(format!(
                "contributor role `{}` of {} record must be a string, found {}",
                role, kind, other
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn dune() -> Record {
        record(json!({
            "Title": "Dune",
            "Type": "Book",
            "Contributor": {"Author": "Frank Herbert"},
            "Subject": "Sci-Fi",
            "ISBN": "123",
            "DDS": "1",
            "UPC": "U1"
        }))
    }

    #[test]
    fn test_book_from_record() {
        let item = Item::from_record(&dune()).unwrap();

        assert_eq!(item.kind(), ItemKind::Book);
        assert_eq!(item.title, "Dune");
        assert_eq!(item.identifier, "U1");
        assert_eq!(item.contributor_roles(), vec!["Author"]);
        assert!(matches!(item.details, ItemDetails::Book(ref b) if b.dds == "1"));
    }

    #[test]
    fn test_locate_field_order() {
        let item = Item::from_record(&record(json!({
            "Title": "Heat",
            "Type": "DVD",
            "Contributor": {"Director": "Michael Mann", "Actor": "Al Pacino, Robert De Niro"},
            "Genre": "Crime",
            "ASIN": "B0001",
            "UPC": "0250"
        })))
        .unwrap();

        let view = item.locate();
        let names: Vec<&str> = view.field_names().collect();
        assert_eq!(
            names,
            vec!["Title", "Type", "Director", "Actor", "Genre", "ASIN", "UPC"]
        );
        assert_eq!(view.get("Actor"), Some("Al Pacino, Robert De Niro"));
        assert_eq!(view.kind(), ItemKind::Dvd);
    }

    #[test]
    fn test_locate_is_fresh() {
        let item = Item::from_record(&dune()).unwrap();

        let mut view = item.locate();
        view.insert("Title", "changed");

        assert_eq!(item.locate().get("Title"), Some("Dune"));
    }

    #[test]
    fn test_missing_kind_field() {
        let mut rec = dune();
        rec.remove("ISBN");

        let err = Item::from_record(&rec).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::MissingField { ref kind, ref field } if kind == "Book" && field == "ISBN"
        ));
    }

    #[test]
    fn test_missing_type() {
        let mut rec = dune();
        rec.remove("Type");

        let err = Item::from_record(&rec).unwrap_err();
        assert!(matches!(err, CatalogError::MissingField { ref field, .. } if field == "Type"));
    }

    #[test]
    fn test_empty_contributors_rejected() {
        let mut rec = dune();
        rec.insert("Contributor".into(), json!({}));

        let err = Item::from_record(&rec).unwrap_err();
        assert!(matches!(err, CatalogError::MissingField { ref field, .. } if field == "Contributor"));
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut rec = dune();
        rec.insert("Title".into(), json!(""));

        assert!(matches!(
            Item::from_record(&rec),
            Err(CatalogError::MissingField { .. })
        ));
    }

    #[test]
    fn test_non_string_field_is_parse_error() {
        let mut rec = dune();
        rec.insert("ISBN".into(), json!(123));

        assert!(matches!(Item::from_record(&rec), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_unknown_type_falls_back_to_magazine() {
        let item = Item::from_record(&record(json!({
            "Title": "Zine",
            "Type": "Pamphlet",
            "Contributor": {"Editor": "Someone"},
            "Volume": "3",
            "Issue": "7",
            "UPC": "Z1"
        })))
        .unwrap();

        assert_eq!(item.kind(), ItemKind::Magazine);
        assert_eq!(item.locate().get("Type"), Some("Magazine"));
    }

    #[test]
    fn test_unknown_type_still_needs_magazine_fields() {
        let err = Item::from_record(&record(json!({
            "Title": "Vinyl",
            "Type": "LP",
            "Contributor": {"Artist": "Someone"},
            "Genre": "Jazz",
            "ASIN": "A",
            "UPC": "L1"
        })))
        .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::MissingField { ref kind, ref field } if kind == "Magazine" && field == "Volume"
        ));
    }

    #[test]
    fn test_to_record_inverts_from_record() {
        let rec = dune();
        let item = Item::from_record(&rec).unwrap();
        assert_eq!(item.to_record(), rec);
    }

    #[test]
    fn test_contributor_names_split() {
        let group = ContributorGroup::parse("Actor", "Al Pacino, Robert De Niro");
        assert_eq!(group.names, vec!["Al Pacino", "Robert De Niro"]);
        assert_eq!(group.joined_names(), "Al Pacino, Robert De Niro");
    }

    #[test]
    fn test_kind_strict_parse() {
        assert_eq!("CD".parse::<ItemKind>().unwrap(), ItemKind::Cd);
        assert!("cd".parse::<ItemKind>().is_err());
        assert_eq!(ItemKind::from_type_field("cd"), ItemKind::Magazine);
    }
}
