//! Bulk-load row sources for the external triple table.
//!
//! The persistent store behind the core is a relational table
//! `triples(subject TEXT, predicate TEXT, object TEXT)` owned by an external
//! collaborator; the core only ever reads a bounded prefix of it at
//! construction. [`RowSource`] is that interface contract, with HTTP and
//! local-file realizations; load failures are reported to the caller, which
//! logs them and continues with an empty store.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SourceError;

/// Maximum rows read from a source in one bulk load.
pub const DEFAULT_ROW_LIMIT: usize = 10_000;

/// One row of the external triple table.
#[derive(Debug, Clone, Deserialize)]
pub struct TripleRow {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// A readable source of triple rows.
pub trait RowSource {
    /// Fetch up to `limit` rows.
    fn fetch_rows(&self, limit: usize) -> Result<Vec<TripleRow>, SourceError>;

    /// Human-readable description of where the rows come from.
    fn describe(&self) -> String;
}

/// Rows served over HTTP as a JSON array.
#[derive(Debug, Clone)]
pub struct HttpRowSource {
    url: String,
}

impl HttpRowSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl RowSource for HttpRowSource {
    fn fetch_rows(&self, limit: usize) -> Result<Vec<TripleRow>, SourceError> {
        let response = ureq::get(&self.url)
            .call()
            .map_err(|e| SourceError::Fetch {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        let rows: Vec<TripleRow> =
            response
                .into_json()
                .map_err(|e| SourceError::MalformedRows {
                    message: e.to_string(),
                })?;
        Ok(truncated(rows, limit))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Rows read from a local JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RowSource for JsonFileSource {
    fn fetch_rows(&self, limit: usize) -> Result<Vec<TripleRow>, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;
        let rows: Vec<TripleRow> =
            serde_json::from_str(&text).map_err(|e| SourceError::MalformedRows {
                message: e.to_string(),
            })?;
        Ok(truncated(rows, limit))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed in-memory rows, mainly for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticRows {
    rows: Vec<TripleRow>,
}

impl StaticRows {
    pub fn new(rows: Vec<TripleRow>) -> Self {
        Self { rows }
    }
}

impl RowSource for StaticRows {
    fn fetch_rows(&self, limit: usize) -> Result<Vec<TripleRow>, SourceError> {
        Ok(truncated(self.rows.clone(), limit))
    }

    fn describe(&self) -> String {
        format!("static({} rows)", self.rows.len())
    }
}

/// Resolve a connection string into a source: `http(s)` URLs fetch over the
/// network, anything else (optionally `file://`-prefixed) is a local path.
pub fn resolve(connection: &str) -> Box<dyn RowSource> {
    if connection.starts_with("http://") || connection.starts_with("https://") {
        Box::new(HttpRowSource::new(connection))
    } else {
        let path = connection.strip_prefix("file://").unwrap_or(connection);
        Box::new(JsonFileSource::new(path))
    }
}

fn truncated(mut rows: Vec<TripleRow>, limit: usize) -> Vec<TripleRow> {
    rows.truncate(limit);
    rows
}
