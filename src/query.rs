//! Structured query results.
//!
//! [`QueryResult`] is the single result shape for every query form: pattern
//! and path lookups, the SPARQL forms, and natural-language translation.
//! Query-subsystem failures are carried inside the result (`success=false`,
//! an `error` query type, and the message in `bindings`) rather than raised.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::Triple;

/// What kind of query produced a [`QueryResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Select,
    Construct,
    Pattern,
    Path,
    Ask,
    NaturalLanguage,
    Error,
}

/// A triple rendered for the process boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripleRecord {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl From<&Triple> for TripleRecord {
    fn from(triple: &Triple) -> Self {
        Self {
            subject: triple.subject.as_str().to_string(),
            predicate: triple.predicate.as_str().to_string(),
            object: triple.object.to_string(),
            context: triple.context.clone(),
        }
    }
}

/// One row of variable bindings.
pub type Binding = BTreeMap<String, String>;

/// Result of a graph query.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub success: bool,
    pub query: String,
    pub query_type: QueryType,
    pub triples: Vec<TripleRecord>,
    pub bindings: Vec<Binding>,
    pub count: usize,
}

impl QueryResult {
    fn with_triples(query: String, query_type: QueryType, triples: &[Triple]) -> Self {
        let records: Vec<TripleRecord> = triples.iter().map(TripleRecord::from).collect();
        Self {
            success: true,
            query,
            query_type,
            count: records.len(),
            triples: records,
            bindings: Vec::new(),
        }
    }

    /// Successful pattern query.
    pub fn pattern(query: String, triples: &[Triple]) -> Self {
        Self::with_triples(query, QueryType::Pattern, triples)
    }

    /// Successful path query.
    pub fn path(query: String, triples: &[Triple]) -> Self {
        Self::with_triples(query, QueryType::Path, triples)
    }

    /// Successful SPARQL CONSTRUCT / DESCRIBE query.
    pub fn construct(query: String, triples: &[Triple]) -> Self {
        Self::with_triples(query, QueryType::Construct, triples)
    }

    /// Successful natural-language query.
    pub fn natural(query: String, triples: Vec<TripleRecord>) -> Self {
        Self {
            success: true,
            query,
            query_type: QueryType::NaturalLanguage,
            count: triples.len(),
            triples,
            bindings: Vec::new(),
        }
    }

    /// Successful SPARQL SELECT query.
    pub fn select(query: String, bindings: Vec<Binding>) -> Self {
        Self {
            success: true,
            query,
            query_type: QueryType::Select,
            triples: Vec::new(),
            count: bindings.len(),
            bindings,
        }
    }

    /// Successful SPARQL ASK query.
    pub fn ask(query: String, answer: bool) -> Self {
        let mut binding = Binding::new();
        binding.insert("result".to_string(), answer.to_string());
        Self {
            success: true,
            query,
            query_type: QueryType::Ask,
            triples: Vec::new(),
            bindings: vec![binding],
            count: 1,
        }
    }

    /// A failed query with the error carried in `bindings`.
    pub fn error(query: String, query_type: QueryType, message: String) -> Self {
        let mut binding = Binding::new();
        binding.insert("error".to_string(), message);
        Self {
            success: false,
            query,
            query_type,
            triples: Vec::new(),
            bindings: vec![binding],
            count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_result_counts_triples() {
        let triples = vec![
            Triple::from_raw("a", "r", "b"),
            Triple::from_raw("a", "r", "c"),
        ];
        let result = QueryResult::pattern("pattern(a, r, None)".into(), &triples);
        assert!(result.success);
        assert_eq!(result.query_type, QueryType::Pattern);
        assert_eq!(result.count, 2);
        assert_eq!(
            result.triples[0].subject,
            "http://congoriver.ai/ontology#a"
        );
    }

    #[test]
    fn error_result_carries_message() {
        let result = QueryResult::error(
            "SELECT WHERE {".into(),
            QueryType::Error,
            "parse failure".into(),
        );
        assert!(!result.success);
        assert_eq!(result.count, 0);
        assert_eq!(result.bindings[0].get("error").unwrap(), "parse failure");
    }

    #[test]
    fn serializes_snake_case_query_types() {
        let result = QueryResult::ask("ASK {}".into(), true);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["query_type"], "ask");
        assert_eq!(json["bindings"][0]["result"], "true");

        let nl = QueryResult::natural("what is sky".into(), Vec::new());
        let json = serde_json::to_value(&nl).unwrap();
        assert_eq!(json["query_type"], "natural_language");
    }

    #[test]
    fn context_is_omitted_when_absent() {
        let triples = vec![Triple::from_raw("a", "r", "b")];
        let result = QueryResult::pattern("q".into(), &triples);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["triples"][0].get("context").is_none());
    }
}
