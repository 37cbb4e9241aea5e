//! Keyword matching and highlight decoration.
//!
//! Keywords are literal, case-insensitive substrings compiled into a
//! `regex`. Highlighting first computes the match spans and then builds a
//! new decorated string; the source text is never modified.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::domain::fields;
use crate::error::CatalogError;

/// Which fields of an item view a search scans
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Every field in the view
    #[default]
    All,

    /// Every contributor-role field (Author, Director, ...)
    Contributor,

    /// A single named field
    Field(String),
}

impl SearchScope {
    pub fn field(name: impl Into<String>) -> Self {
        SearchScope::Field(name.into())
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchScope::All => write!(f, "all fields"),
            SearchScope::Contributor => write!(f, "contributors"),
            SearchScope::Field(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for SearchScope {
    type Err = CatalogError;

    /// `contributor` and `all` select the special scopes; known field names
    /// are matched case-insensitively to their canonical spelling; anything
    /// else (a contributor role, say) is used verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CatalogError::InvalidArgument("Empty search field".into()));
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(SearchScope::All);
        }
        if s.eq_ignore_ascii_case(fields::CONTRIBUTOR) || s.eq_ignore_ascii_case("contributors") {
            return Ok(SearchScope::Contributor);
        }

        let canonical = fields::ALL
            .iter()
            .find(|name| name.eq_ignore_ascii_case(s))
            .map(|name| name.to_string())
            .unwrap_or_else(|| s.to_string());
        Ok(SearchScope::Field(canonical))
    }
}

/// Marker style for highlighted matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    /// Green background terminal escape
    #[default]
    Ansi,

    /// Square brackets, for output that is not a terminal
    Brackets,
}

impl FromStr for HighlightStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "ansi" | "color" => Ok(HighlightStyle::Ansi),
            "brackets" | "plain" => Ok(HighlightStyle::Brackets),
            _ => anyhow::bail!("Unknown highlight style: {}", s),
        }
    }
}

impl fmt::Display for HighlightStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightStyle::Ansi => write!(f, "ansi"),
            HighlightStyle::Brackets => write!(f, "brackets"),
        }
    }
}

/// Display-only decoration wrapped around matched substrings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    open: String,
    close: String,
}

impl Default for Highlight {
    fn default() -> Self {
        Self::from_style(HighlightStyle::default())
    }
}

impl Highlight {
    pub const ANSI_OPEN: &'static str = "\x1b[6;30;42m";
    pub const ANSI_CLOSE: &'static str = "\x1b[0m";

    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    pub fn from_style(style: HighlightStyle) -> Self {
        match style {
            HighlightStyle::Ansi => Self::new(Self::ANSI_OPEN, Self::ANSI_CLOSE),
            HighlightStyle::Brackets => Self::new("[", "]"),
        }
    }

    /// Wrap every occurrence of the keyword in `text`.
    ///
    /// Returns `None` when the keyword does not occur.
    pub fn apply(&self, text: &str, matcher: &KeywordMatcher) -> Option<String> {
        let spans = matcher.spans(text);
        if spans.is_empty() {
            return None;
        }
        Some(self.decorate(text, &spans))
    }

    /// Build a new string with each span wrapped in the markers.
    ///
    /// Spans must be sorted, non-overlapping and on char boundaries.
    pub fn decorate(&self, text: &str, spans: &[Range<usize>]) -> String {
        let extra = spans.len() * (self.open.len() + self.close.len());
        let mut out = String::with_capacity(text.len() + extra);
        let mut cursor = 0;

        for span in spans {
            out.push_str(&text[cursor..span.start]);
            out.push_str(&self.open);
            out.push_str(&text[span.clone()]);
            out.push_str(&self.close);
            cursor = span.end;
        }

        out.push_str(&text[cursor..]);
        out
    }

    /// Remove the markers again. Exact as long as the markers do not occur
    /// in the undecorated text.
    pub fn strip(&self, text: &str) -> String {
        text.replace(&self.open, "").replace(&self.close, "")
    }
}

/// Case-insensitive literal keyword, compiled once per search
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Regex,
}

impl KeywordMatcher {
    /// Compile `keyword` as a literal: pattern metacharacters are escaped.
    pub fn new(keyword: &str) -> Result<Self, CatalogError> {
        if keyword.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "Search keyword must not be empty".into(),
            ));
        }

        let regex = RegexBuilder::new(&regex::escape(keyword))
            .case_insensitive(true)
            .build()
            .map_err(|e| CatalogError::InvalidArgument(format!("Bad keyword: {}", e)))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte ranges of the non-overlapping occurrences, left to right.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        self.regex.find_iter(text).map(|m| m.range()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(keyword: &str) -> KeywordMatcher {
        KeywordMatcher::new(keyword).unwrap()
    }

    #[test]
    fn test_spans_case_insensitive() {
        assert_eq!(matcher("dune").spans("Dune and DUNE"), vec![0..4, 9..13]);
        assert!(matcher("dunes").spans("Dune").is_empty());
    }

    #[test]
    fn test_spans_non_overlapping() {
        assert_eq!(matcher("aa").spans("aaaa"), vec![0..2, 2..4]);
    }

    #[test]
    fn test_spans_multibyte() {
        let text = "Les Misérables, MISÉRABLES";
        let spans = matcher("misérables").spans(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(&text[spans[1].clone()], "MISÉRABLES");
    }

    #[test]
    fn test_keyword_is_literal() {
        assert!(matcher("D.ne").spans("Dune").is_empty());
        assert_eq!(matcher("c++").spans("C++ Primer"), vec![0..3]);
        assert!(matcher("(a|b)*").is_match("x(A|B)*y"));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        assert!(matches!(
            KeywordMatcher::new(""),
            Err(CatalogError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_apply_wraps_every_occurrence() {
        let hl = Highlight::from_style(HighlightStyle::Brackets);
        assert_eq!(
            hl.apply("Dune and dune", &matcher("DUNE")).as_deref(),
            Some("[Dune] and [dune]")
        );
        assert_eq!(hl.apply("Emma", &matcher("dune")), None);
    }

    #[test]
    fn test_ansi_markers() {
        let hl = Highlight::default();
        assert_eq!(
            hl.apply("Dune", &matcher("un")).as_deref(),
            Some("D\x1b[6;30;42mun\x1b[0me")
        );
    }

    #[test]
    fn test_strip_reverses_decoration() {
        let hl = Highlight::default();
        let decorated = hl.apply("Frank Herbert", &matcher("herb")).unwrap();
        assert_eq!(hl.strip(&decorated), "Frank Herbert");
    }

    #[test]
    fn test_is_match() {
        assert!(matcher("HERBERT").is_match("Frank Herbert"));
        assert!(!matcher("Asimov").is_match("Frank Herbert"));
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!("contributor".parse::<SearchScope>().unwrap(), SearchScope::Contributor);
        assert_eq!("Contributor".parse::<SearchScope>().unwrap(), SearchScope::Contributor);
        assert_eq!("ALL".parse::<SearchScope>().unwrap(), SearchScope::All);
        assert_eq!("upc".parse::<SearchScope>().unwrap(), SearchScope::field("UPC"));
        assert_eq!("title".parse::<SearchScope>().unwrap(), SearchScope::field("Title"));
        assert_eq!("Director".parse::<SearchScope>().unwrap(), SearchScope::field("Director"));
        assert!("  ".parse::<SearchScope>().is_err());
    }

    #[test]
    fn test_highlight_style_parsing() {
        assert_eq!("ANSI".parse::<HighlightStyle>().unwrap(), HighlightStyle::Ansi);
        assert_eq!("brackets".parse::<HighlightStyle>().unwrap(), HighlightStyle::Brackets);
        assert!("neon".parse::<HighlightStyle>().is_err());
    }
}
