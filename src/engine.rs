//! Engine facade: top-level API for the reasoning core.
//!
//! The `Engine` owns the triple store and the SPARQL facade, bulk-loads the
//! optional external row source at construction, and shapes every query
//! into a [`QueryResult`]. One engine serves one request; nothing survives
//! it.

use crate::graph::sparql::{SparqlEngine, SparqlOutcome};
use crate::graph::store::TripleStore;
use crate::graph::{GraphStats, Triple};
use crate::proof::{Fact, ProofSearcher, ProofStrategy, ProofTree};
use crate::query::{QueryResult, QueryType, TripleRecord};
use crate::rules::Rule;
use crate::source::{self, DEFAULT_ROW_LIMIT, RowSource};
use crate::term::{Iri, Term};

/// Configuration for the reasoning engine.
///
/// The connection string is threaded through explicitly; reading it from
/// the process environment is the caller's business.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Connection string for the external triple table. `None` starts empty.
    pub db_url: Option<String>,
    /// Maximum rows read during the bulk load.
    pub max_load_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_url: None,
            max_load_rows: DEFAULT_ROW_LIMIT,
        }
    }
}

/// The symbolic reasoning engine.
///
/// Owns the triple store and its SPARQL mirror; serves pattern, path,
/// SPARQL, and natural-language queries plus proof search.
pub struct Engine {
    config: EngineConfig,
    store: TripleStore,
    sparql: Option<SparqlEngine>,
}

impl Engine {
    /// Create an engine, bulk-loading from the configured source if any.
    pub fn new(config: EngineConfig) -> Self {
        let sparql = match SparqlEngine::in_memory() {
            Ok(engine) => Some(engine),
            Err(e) => {
                tracing::warn!(error = %e, "SPARQL subsystem unavailable");
                None
            }
        };
        let mut engine = Self {
            store: TripleStore::new(),
            sparql,
            config,
        };
        if let Some(url) = engine.config.db_url.clone() {
            let source = source::resolve(&url);
            engine.bulk_load(source.as_ref());
        }
        engine
    }

    /// Create an engine and bulk-load from an explicit source.
    pub fn with_source(config: EngineConfig, source: &dyn RowSource) -> Self {
        let mut engine = Self::new(EngineConfig {
            db_url: None,
            ..config
        });
        engine.bulk_load(source);
        engine
    }

    /// Load up to the configured row limit from a source. Failures are
    /// logged and leave the store as it was; the load is never fatal.
    fn bulk_load(&mut self, source: &dyn RowSource) {
        match source.fetch_rows(self.config.max_load_rows) {
            Ok(rows) => {
                let loaded = self.add_triples(
                    rows.iter()
                        .map(|r| Triple::from_raw(&r.subject, &r.predicate, &r.object)),
                );
                tracing::info!(loaded, source = %source.describe(), "bulk-loaded triples");
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    source = %source.describe(),
                    "could not load from database; starting empty"
                );
            }
        }
    }

    /// Insert a triple into the store and its SPARQL mirror.
    /// Returns `true` if the triple was new.
    pub fn add_triple(&mut self, triple: Triple) -> bool {
        if !self.store.insert(triple.clone()) {
            return false;
        }
        if let Some(ref sparql) = self.sparql
            && let Err(e) = sparql.insert(&triple)
        {
            tracing::debug!(error = %e, "triple not mirrored to SPARQL store");
        }
        true
    }

    /// Insert a batch of triples. Returns the number of new ones.
    pub fn add_triples(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize {
        triples
            .into_iter()
            .filter(|t| self.add_triple(t.clone()))
            .count()
    }

    /// Wildcard triple-pattern query; `None` positions are wildcards.
    ///
    /// Bare subject/predicate names are namespaced; an object that does not
    /// start with `http` is treated as a string literal.
    pub fn query_pattern(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> QueryResult {
        let s = subject.map(Iri::resolve);
        let p = predicate.map(Iri::resolve);
        let o = object.map(|o| {
            if o.starts_with("http") {
                Term::Reference(Iri::absolute(o))
            } else {
                Term::String(o.to_string())
            }
        });

        let triples = self.store.match_pattern(s.as_ref(), p.as_ref(), o.as_ref());
        let query = format!(
            "pattern({}, {}, {})",
            subject.unwrap_or("None"),
            predicate.unwrap_or("None"),
            object.unwrap_or("None"),
        );
        QueryResult::pattern(query, &triples)
    }

    /// Follow a predicate path from a start node.
    pub fn query_path(&self, start: &str, path: &[String]) -> QueryResult {
        let predicates: Vec<Iri> = path.iter().map(|p| Iri::resolve(p)).collect();
        let triples = self.store.path(&Iri::resolve(start), &predicates);
        QueryResult::path(format!("path({start}, {path:?})"), &triples)
    }

    /// Run a SPARQL query. Failures come back as an error-typed result.
    pub fn query_sparql(&self, query: &str) -> QueryResult {
        let Some(ref sparql) = self.sparql else {
            return QueryResult::error(
                query.to_string(),
                QueryType::Error,
                "SPARQL subsystem unavailable".to_string(),
            );
        };
        match sparql.evaluate(query) {
            Ok(SparqlOutcome::Solutions(rows)) => QueryResult::select(query.to_string(), rows),
            Ok(SparqlOutcome::Graph(triples)) => {
                QueryResult::construct(query.to_string(), &triples)
            }
            Ok(SparqlOutcome::Boolean(answer)) => QueryResult::ask(query.to_string(), answer),
            Err(e) => QueryResult::error(query.to_string(), QueryType::Error, e.to_string()),
        }
    }

    /// Translate a natural-language query with string heuristics.
    ///
    /// Handles "properties of X", "what relates to X", "everything about X" /
    /// "what is X", and "find X that Y". Anything else fails with an
    /// explanatory binding; nothing here consults a language model.
    pub fn query_natural(&self, nl_query: &str) -> QueryResult {
        let lower = nl_query.to_lowercase();

        if lower.contains("properties of") {
            let entity = tail_entity(&lower, "properties of");
            return self.query_pattern(Some(&entity), Some("has_property"), None);
        }

        if lower.contains("relates to") || lower.contains("related to") {
            let marker = if lower.contains("relates to") {
                "relates to"
            } else {
                "related to"
            };
            let entity = tail_entity(&lower, marker);

            // Both directions of the relation.
            let outgoing = self.query_pattern(Some(&entity), Some("relates_to"), None);
            let incoming = self.query_pattern(None, Some("relates_to"), Some(&entity));
            let mut combined: Vec<TripleRecord> = outgoing.triples;
            combined.extend(incoming.triples);
            return QueryResult::natural(nl_query.to_string(), combined);
        }

        if lower.contains("everything about") || lower.contains("what is") {
            let marker = if lower.contains("everything about") {
                "everything about"
            } else {
                "what is"
            };
            let entity = tail_entity(&lower, marker);
            return self.query_pattern(Some(&entity), None, None);
        }

        if lower.contains("find") && lower.contains("that") {
            let predicate_part = lower
                .split("that")
                .nth(1)
                .unwrap_or("")
                .trim()
                .trim_matches(['?', '.']);
            let words: Vec<&str> = predicate_part.split_whitespace().collect();
            if !words.is_empty() {
                let predicate = if words.len() >= 2 {
                    words[..2].join("_")
                } else {
                    words[0].to_string()
                };
                return self.query_pattern(None, Some(&predicate), None);
            }
        }

        QueryResult::error(
            nl_query.to_string(),
            QueryType::NaturalLanguage,
            "Could not parse natural language query. Try SPARQL or pattern matching."
                .to_string(),
        )
    }

    /// Attempt to prove a goal from facts and rules.
    pub fn prove(
        &self,
        goal: &str,
        facts: &[Fact],
        rules: &[Rule],
        strategy: ProofStrategy,
    ) -> ProofTree {
        ProofSearcher::new().search(goal, facts, rules, strategy)
    }

    /// Store statistics.
    pub fn stats(&self) -> GraphStats {
        self.store.stats()
    }

    /// The underlying triple store.
    pub fn store(&self) -> &TripleStore {
        &self.store
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("triples", &self.store.len())
            .field("sparql", &self.sparql.is_some())
            .finish()
    }
}

/// The entity after the last occurrence of a marker, with surrounding
/// whitespace and trailing question marks / periods stripped.
fn tail_entity(text: &str, marker: &str) -> String {
    text.rsplit(marker)
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(['?', '.'])
        .to_string()
}
