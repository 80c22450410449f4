//! Embedded SPARQL query subsystem backed by oxigraph.
//!
//! The in-memory [`TripleStore`](super::store::TripleStore) is the source of
//! truth; this facade mirrors its triples into an oxigraph store so SELECT,
//! CONSTRUCT, and ASK queries can run against the same data. Failures are
//! typed results; the engine shapes them into error `QueryResult`s at the
//! boundary.

use std::collections::BTreeMap;

use oxigraph::model::vocab::xsd;
use oxigraph::model::{GraphNameRef, Literal, NamedNode, Quad, Subject, Term as OxTerm};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::QueryError;
use crate::term::{Iri, Term};

use super::Triple;
use super::store::TripleStore;

/// Outcome of a SPARQL evaluation, one variant per query form.
#[derive(Debug, Clone)]
pub enum SparqlOutcome {
    /// SELECT solutions: one binding map per row.
    Solutions(Vec<BTreeMap<String, String>>),
    /// CONSTRUCT / DESCRIBE triples.
    Graph(Vec<Triple>),
    /// ASK answer.
    Boolean(bool),
}

/// In-memory SPARQL-capable RDF store.
pub struct SparqlEngine {
    store: Store,
}

impl SparqlEngine {
    /// Create an empty in-memory store.
    pub fn in_memory() -> Result<Self, QueryError> {
        let store = Store::new().map_err(|e| QueryError::Sparql {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Insert a triple into the SPARQL store.
    pub fn insert(&self, triple: &Triple) -> Result<(), QueryError> {
        let subject = named_node(&triple.subject)?;
        let predicate = named_node(&triple.predicate)?;
        let object = object_to_ox(&triple.object)?;
        let quad = Quad::new(subject, predicate, object, GraphNameRef::DefaultGraph);
        self.store.insert(&quad).map_err(|e| QueryError::Sparql {
            message: format!("insert failed: {e}"),
        })?;
        Ok(())
    }

    /// Mirror every triple of an in-memory store.
    ///
    /// Returns the number of triples mirrored; triples whose terms cannot be
    /// expressed as IRIs are skipped and logged.
    pub fn sync_from(&self, store: &TripleStore) -> usize {
        let mut count = 0;
        for triple in store.all_triples() {
            match self.insert(&triple) {
                Ok(()) => count += 1,
                Err(e) => tracing::debug!(error = %e, "skipping triple in SPARQL sync"),
            }
        }
        count
    }

    /// Evaluate a SPARQL query.
    pub fn evaluate(&self, query: &str) -> Result<SparqlOutcome, QueryError> {
        let results = self.store.query(query).map_err(|e| QueryError::Sparql {
            message: format!("SPARQL query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| QueryError::Sparql {
                        message: format!("solution error: {e}"),
                    })?;
                    let mut row = BTreeMap::new();
                    for (var, value) in solution.iter() {
                        row.insert(var.as_str().to_string(), render_term(value));
                    }
                    rows.push(row);
                }
                Ok(SparqlOutcome::Solutions(rows))
            }
            QueryResults::Graph(triples) => {
                let mut out = Vec::new();
                for triple in triples {
                    let triple = triple.map_err(|e| QueryError::Sparql {
                        message: format!("graph result error: {e}"),
                    })?;
                    out.push(Triple::new(
                        subject_to_iri(&triple.subject),
                        Iri::absolute(triple.predicate.as_str()),
                        object_from_ox(&triple.object),
                    ));
                }
                Ok(SparqlOutcome::Graph(out))
            }
            QueryResults::Boolean(answer) => Ok(SparqlOutcome::Boolean(answer)),
        }
    }
}

impl std::fmt::Debug for SparqlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlEngine").finish()
    }
}

fn named_node(iri: &Iri) -> Result<NamedNode, QueryError> {
    NamedNode::new(iri.as_str()).map_err(|_| QueryError::InvalidIri {
        value: iri.as_str().to_string(),
    })
}

fn object_to_ox(term: &Term) -> Result<OxTerm, QueryError> {
    Ok(match term {
        Term::Reference(iri) => named_node(iri)?.into(),
        Term::Integer(i) => Literal::from(*i).into(),
        Term::Float(f) => Literal::from(*f).into(),
        Term::String(s) => Literal::from(s.as_str()).into(),
    })
}

fn object_from_ox(term: &OxTerm) -> Term {
    match term {
        OxTerm::NamedNode(n) => Term::Reference(Iri::absolute(n.as_str())),
        OxTerm::Literal(l) => {
            let datatype = l.datatype();
            if datatype == xsd::INTEGER {
                l.value()
                    .parse()
                    .map(Term::Integer)
                    .unwrap_or_else(|_| Term::String(l.value().to_string()))
            } else if datatype == xsd::DOUBLE || datatype == xsd::DECIMAL {
                l.value()
                    .parse()
                    .map(Term::Float)
                    .unwrap_or_else(|_| Term::String(l.value().to_string()))
            } else {
                Term::String(l.value().to_string())
            }
        }
        other => Term::String(other.to_string()),
    }
}

fn subject_to_iri(subject: &Subject) -> Iri {
    match subject {
        Subject::NamedNode(n) => Iri::absolute(n.as_str()),
        other => Iri::absolute(other.to_string()),
    }
}

/// Plain string form of a solution term: IRIs print bare, literals print
/// their value.
fn render_term(term: &OxTerm) -> String {
    match term {
        OxTerm::NamedNode(n) => n.as_str().to_string(),
        OxTerm::Literal(l) => l.value().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(triples: &[(&str, &str, &str)]) -> SparqlEngine {
        let engine = SparqlEngine::in_memory().unwrap();
        for (s, p, o) in triples {
            engine.insert(&Triple::from_raw(s, p, o)).unwrap();
        }
        engine
    }

    #[test]
    fn select_returns_bindings() {
        let engine = engine_with(&[("sky", "is_a", "blue"), ("sea", "is_a", "deep")]);
        let outcome = engine
            .evaluate("SELECT ?s ?o WHERE { ?s <http://congoriver.ai/ontology#is_a> ?o }")
            .unwrap();
        match outcome {
            SparqlOutcome::Solutions(rows) => {
                assert_eq!(rows.len(), 2);
                assert!(rows.iter().any(|r| r.get("o").is_some_and(|v| v == "blue")));
            }
            other => panic!("expected solutions, got {other:?}"),
        }
    }

    #[test]
    fn select_renders_iris_bare() {
        let engine = engine_with(&[("sky", "is_a", "blue")]);
        let outcome = engine.evaluate("SELECT ?s WHERE { ?s ?p ?o }").unwrap();
        match outcome {
            SparqlOutcome::Solutions(rows) => {
                assert_eq!(
                    rows[0].get("s").unwrap(),
                    "http://congoriver.ai/ontology#sky"
                );
            }
            other => panic!("expected solutions, got {other:?}"),
        }
    }

    #[test]
    fn construct_returns_triples() {
        let engine = engine_with(&[("sky", "is_a", "blue")]);
        let outcome = engine
            .evaluate("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }")
            .unwrap();
        match outcome {
            SparqlOutcome::Graph(triples) => {
                assert_eq!(triples.len(), 1);
                assert_eq!(triples[0].object, Term::String("blue".into()));
            }
            other => panic!("expected graph, got {other:?}"),
        }
    }

    #[test]
    fn ask_answers_boolean() {
        let engine = engine_with(&[("sky", "is_a", "blue")]);
        let yes = engine
            .evaluate("ASK { <http://congoriver.ai/ontology#sky> ?p ?o }")
            .unwrap();
        assert!(matches!(yes, SparqlOutcome::Boolean(true)));

        let no = engine
            .evaluate("ASK { <http://congoriver.ai/ontology#sea> ?p ?o }")
            .unwrap();
        assert!(matches!(no, SparqlOutcome::Boolean(false)));
    }

    #[test]
    fn malformed_query_is_a_typed_error() {
        let engine = engine_with(&[]);
        let err = engine.evaluate("SELECT WHERE {").unwrap_err();
        assert!(matches!(err, QueryError::Sparql { .. }));
    }

    #[test]
    fn numeric_objects_round_trip() {
        let engine = engine_with(&[("x", "count", "3"), ("x", "ratio", "0.5")]);
        let outcome = engine
            .evaluate("CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }")
            .unwrap();
        match outcome {
            SparqlOutcome::Graph(triples) => {
                assert!(triples.iter().any(|t| t.object == Term::Integer(3)));
                assert!(triples.iter().any(|t| t.object == Term::Float(0.5)));
            }
            other => panic!("expected graph, got {other:?}"),
        }
    }

    #[test]
    fn sync_from_mirrors_store() {
        let mut store = TripleStore::new();
        store.insert(Triple::from_raw("a", "r", "b"));
        store.insert(Triple::from_raw("b", "r", "c"));

        let engine = SparqlEngine::in_memory().unwrap();
        assert_eq!(engine.sync_from(&store), 2);

        let outcome = engine.evaluate("SELECT ?s WHERE { ?s ?p ?o }").unwrap();
        match outcome {
            SparqlOutcome::Solutions(rows) => assert_eq!(rows.len(), 2),
            other => panic!("expected solutions, got {other:?}"),
        }
    }
}
