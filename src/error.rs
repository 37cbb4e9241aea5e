//! Error taxonomy for catalog operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the catalog library.
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// Errors surfaced by catalog and item operations.
///
/// None of these are recovered internally: every error is a rejected
/// operation and leaves the in-memory catalog as it was.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Malformed catalog data: {0}")]
    Parse(String),

    #[error("{kind} record is missing required field `{field}`")]
    MissingField { kind: String, field: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    pub(crate) fn missing(kind: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            kind: kind.into(),
            field: field.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
