//! Search Integration Tests
//!
//! Tests for keyword scoping, highlighting, and result ordering.

use libcat::{Catalog, CatalogError, Highlight, HighlightStyle, KeywordMatcher, SearchScope};
use serde_json::json;
use tempfile::TempDir;

fn open_sample(temp: &TempDir) -> Catalog {
    let path = temp.path().join("library.json");
    let records = json!([
        {"Title": "Dune", "Type": "Book", "Contributor": {"Author": "Frank Herbert"},
         "Subject": "Sci-Fi", "ISBN": "123", "DDS": "1", "UPC": "U1"},
        {"Title": "Dune", "Type": "DVD", "Contributor": {"Director": "David Lynch"},
         "Genre": "Sci-Fi", "ASIN": "B0001", "UPC": "D1"},
        {"Title": "Children of Dune", "Type": "Book", "Contributor": {"Author": "Frank Herbert"},
         "Subject": "Sci-Fi", "ISBN": "456", "DDS": "1", "UPC": "U2"},
        {"Title": "Heat", "Type": "DVD", "Contributor": {"Director": "Michael Mann", "Actor": "Al Pacino, Robert De Niro"},
         "Genre": "Crime", "ASIN": "B0002", "UPC": "D2"},
        {"Title": "Frankly Speaking", "Type": "Magazine", "Contributor": {"Editor": "Ann Lee"},
         "Volume": "2", "Issue": "9", "UPC": "M1"}
    ]);
    std::fs::write(&path, records.to_string()).unwrap();

    Catalog::open(path)
        .unwrap()
        .with_highlight(Highlight::from_style(HighlightStyle::Brackets))
}

#[test]
fn test_dune_example() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("library.json");
    std::fs::write(
        &path,
        json!([{"Title": "Dune", "Type": "Book", "Contributor": {"Author": "Frank Herbert"},
                "Subject": "Sci-Fi", "ISBN": "123", "DDS": "1", "UPC": "U1"}])
        .to_string(),
    )
    .unwrap();
    let catalog = Catalog::open(&path).unwrap();

    let results = catalog.search("dune", &SearchScope::All).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].title().contains(Highlight::ANSI_OPEN));
    assert!(results[0].title().contains("Dune"));

    let by_upc = catalog.search("dune", &SearchScope::field("UPC")).unwrap();
    assert!(by_upc.is_empty());
}

#[test]
fn test_empty_keyword_rejected() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);

    for scope in [SearchScope::All, SearchScope::Contributor, SearchScope::field("Title")] {
        assert!(matches!(
            catalog.search("", &scope),
            Err(CatalogError::InvalidArgument(_))
        ));
    }
}

#[test]
fn test_results_sorted_by_kind_then_title() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);

    let results = catalog.search("dune", &SearchScope::field("Title")).unwrap();
    let order: Vec<(String, String)> = results
        .iter()
        .map(|v| (v.kind().to_string(), v.title().to_string()))
        .collect();

    assert_eq!(
        order,
        vec![
            ("Book".to_string(), "Children of [Dune]".to_string()),
            ("Book".to_string(), "[Dune]".to_string()),
            ("DVD".to_string(), "[Dune]".to_string()),
        ]
    );
}

#[test]
fn test_contributor_scope_only_scans_roles() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);

    // "Frank" is in two Author fields and one Title
    let results = catalog.search("frank", &SearchScope::Contributor).unwrap();
    assert_eq!(results.len(), 2);
    for view in &results {
        assert_eq!(view.get("Author"), Some("[Frank] Herbert"));
        assert!(!view.title().contains('['));
    }

    let everywhere = catalog.search("frank", &SearchScope::All).unwrap();
    assert_eq!(everywhere.len(), 3);
}

#[test]
fn test_contributor_scope_covers_every_role() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);

    let results = catalog.search("niro", &SearchScope::Contributor).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get("Actor"), Some("Al Pacino, Robert De [Niro]"));
    assert_eq!(results[0].get("Director"), Some("Michael Mann"));
}

#[test]
fn test_field_absent_from_item_never_matches() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);

    // Only Books have an ISBN
    let results = catalog.search("1", &SearchScope::field("ISBN")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get("ISBN"), Some("[1]23"));
}

#[test]
fn test_all_scope_highlights_every_matching_field() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);

    let results = catalog.search("sci", &SearchScope::All).unwrap();
    assert_eq!(results.len(), 3);

    let dvd = results.iter().find(|v| v.get("Type") == Some("DVD")).unwrap();
    assert_eq!(dvd.get("Genre"), Some("[Sci]-Fi"));
}

#[test]
fn test_keyword_metacharacters_are_literal() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);

    assert!(catalog.search("D.ne", &SearchScope::All).unwrap().is_empty());
    assert!(catalog.search(".*", &SearchScope::All).unwrap().is_empty());

    let results = catalog.search("sci-fi", &SearchScope::field("Genre")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get("Genre"), Some("[Sci-Fi]"));
}

#[test]
fn test_no_match_is_empty_not_error() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);

    assert!(catalog.search("zzz", &SearchScope::All).unwrap().is_empty());
}

#[test]
fn test_results_are_matching_subset() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);
    let highlight = Highlight::from_style(HighlightStyle::Brackets);

    for keyword in ["dune", "e", "FRANK", "sci-fi", "d2"] {
        let results = catalog.search(keyword, &SearchScope::All).unwrap();
        let matcher = KeywordMatcher::new(keyword).unwrap();

        let expected = catalog
            .items()
            .iter()
            .filter(|item| item.locate().iter().any(|(_, v)| matcher.is_match(v)))
            .count();
        assert_eq!(results.len(), expected, "keyword {:?}", keyword);

        for view in &results {
            let matched = view
                .iter()
                .any(|(_, value)| matcher.is_match(&highlight.strip(value)));
            assert!(matched, "keyword {:?}", keyword);
        }
    }
}

#[test]
fn test_search_leaves_catalog_unchanged() {
    let temp = TempDir::new().unwrap();
    let catalog = open_sample(&temp);
    let before: Vec<_> = catalog.items().to_vec();

    catalog.search("dune", &SearchScope::All).unwrap();

    assert_eq!(catalog.items(), before.as_slice());
}
