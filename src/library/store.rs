//! Backing store: a JSON array of flat item records on disk.
//!
//! Writes go through a temporary file in the same directory followed by a
//! rename, so a crash mid-write leaves the previous contents in place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::domain::Record;
use crate::error::{CatalogError, Result};

/// Indentation used when rewriting the store
const INDENT: &[u8] = b"    ";

/// File-backed record list
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and parse every record in the store.
    pub fn read_records(&self) -> Result<Vec<Record>> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| CatalogError::io(&self.path, e))?;
        parse_records(&content)
    }

    /// Replace the store contents with `records`.
    pub fn write_records(&self, records: &[Record]) -> Result<()> {
        let json = to_pretty_json(records)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CatalogError::io(dir, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| CatalogError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| CatalogError::io(&self.path, e.error))?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "Catalog store written");
        Ok(())
    }
}

/// Parse store contents into flat records.
///
/// The top level must be an array and every element an object.
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

    let Value::Array(elements) = value else {
        return Err(CatalogError::Parse(
            "expected a JSON array of item records".into(),
        ));
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| match element {
            Value::Object(record) => Ok(record),
            other => Err(CatalogError::Parse(format!(
                "record {} is not an object: {}",
                index, other
            ))),
        })
        .collect()
}

fn to_pretty_json(records: &[Record]) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records
        .serialize(&mut ser)
        .map_err(|e| CatalogError::Parse(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| CatalogError::Parse(e.to_string()))
}
