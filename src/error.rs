//! Diagnostic error types for the reasoning core.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. Expected failure modes
//! (unprovable goals, unmatched patterns, malformed SPARQL) are structured
//! results, not errors; these types cover the genuinely exceptional paths:
//! the process boundary, the bulk-load source, and the embedded query
//! subsystem before its failures are shaped into a `QueryResult`.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the reasoning core.
///
/// Each variant wraps a subsystem-specific error, preserving the diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum CongoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Request(#[from] RequestError),
}

// ---------------------------------------------------------------------------
// Query subsystem errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum QueryError {
    #[error("SPARQL error: {message}")]
    #[diagnostic(
        code(congo::query::sparql),
        help("The SPARQL query failed. Check the query syntax.")
    )]
    Sparql { message: String },

    #[error("invalid IRI in triple: {value}")]
    #[diagnostic(
        code(congo::query::invalid_iri),
        help(
            "The term could not be used as an IRI in the SPARQL store. \
             References must be absolute, URI-shaped identifiers."
        )
    )]
    InvalidIri { value: String },
}

// ---------------------------------------------------------------------------
// Bulk-load source errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SourceError {
    #[error("fetch from {url} failed: {message}")]
    #[diagnostic(
        code(congo::source::fetch),
        help(
            "The external triple source could not be reached. The store \
             continues empty; verify the connection string in CLOUD_DB_URL."
        )
    )]
    Fetch { url: String, message: String },

    #[error("I/O error reading {path}: {source}")]
    #[diagnostic(
        code(congo::source::io),
        help("Check that the row file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rows: {message}")]
    #[diagnostic(
        code(congo::source::rows),
        help(
            "Rows must be a JSON array of objects with subject, predicate, \
             and object string fields."
        )
    )]
    MalformedRows { message: String },
}

// ---------------------------------------------------------------------------
// Process-boundary errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RequestError {
    #[error("malformed JSON request: {message}")]
    #[diagnostic(
        code(congo::request::json),
        help(
            "The --json payload could not be parsed. Check for valid JSON \
             and the field names documented in the subcommand help."
        )
    )]
    MalformedJson { message: String },

    #[error("missing required field: {field}")]
    #[diagnostic(
        code(congo::request::missing_field),
        help("Provide the field either as a flag or inside the --json payload.")
    )]
    MissingField { field: String },
}

/// Convenience alias for functions returning core results.
pub type CongoResult<T> = std::result::Result<T, CongoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_converts_to_congo_error() {
        let err = QueryError::Sparql {
            message: "bad syntax".into(),
        };
        let congo: CongoError = err.into();
        assert!(matches!(congo, CongoError::Query(QueryError::Sparql { .. })));
    }

    #[test]
    fn source_error_converts_to_congo_error() {
        let err = SourceError::MalformedRows {
            message: "not an array".into(),
        };
        let congo: CongoError = err.into();
        assert!(matches!(
            congo,
            CongoError::Source(SourceError::MalformedRows { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = SourceError::Fetch {
            url: "http://db.example".into(),
            message: "connection refused".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("http://db.example"));
        assert!(msg.contains("connection refused"));
    }
}
