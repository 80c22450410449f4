//! In-memory triple store with per-position indexing.
//!
//! Uses `petgraph` for the graph structure: nodes are terms, edges carry the
//! predicate. Subject queries walk outgoing edges, object queries walk
//! incoming edges, predicate queries use a secondary index, so any pattern
//! with at least one bound position avoids a full scan.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::term::{Iri, Term};

use super::{GraphStats, Triple};

/// Edge payload: the predicate and the triple's context tag.
#[derive(Debug, Clone)]
struct EdgeData {
    predicate: Iri,
    context: Option<String>,
}

/// Multiset-suppressing triple store.
///
/// Inserting the same `(s, p, o)` twice stores one triple. Query ordering is
/// unspecified but stable within one process for a fixed input.
#[derive(Debug, Default)]
pub struct TripleStore {
    graph: DiGraph<Term, EdgeData>,
    node_index: HashMap<Term, NodeIndex>,
    predicate_index: HashMap<Iri, Vec<EdgeIndex>>,
    seen: HashSet<Triple>,
}

impl TripleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, term: &Term) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(term) {
            return idx;
        }
        let idx = self.graph.add_node(term.clone());
        self.node_index.insert(term.clone(), idx);
        idx
    }

    /// Insert a triple. Returns `true` if it was new, `false` if an equal
    /// triple was already stored.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.seen.contains(&triple) {
            return false;
        }
        let subj_idx = self.ensure_node(&Term::Reference(triple.subject.clone()));
        let obj_idx = self.ensure_node(&triple.object);
        let edge = self.graph.add_edge(
            subj_idx,
            obj_idx,
            EdgeData {
                predicate: triple.predicate.clone(),
                context: triple.context.clone(),
            },
        );
        self.predicate_index
            .entry(triple.predicate.clone())
            .or_default()
            .push(edge);
        self.seen.insert(triple);
        true
    }

    /// Insert a batch of triples. Returns the number of newly stored ones.
    pub fn insert_many(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize {
        triples
            .into_iter()
            .filter(|t| self.insert(t.clone()))
            .count()
    }

    /// Wildcard pattern lookup.
    ///
    /// Any of the three positions may be `None` (wildcard). Returns every
    /// stored triple whose bound positions are structurally equal to the
    /// provided terms. Unknown terms simply yield an empty result.
    pub fn match_pattern(
        &self,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<Triple> {
        if let Some(s) = subject {
            let Some(&idx) = self.node_index.get(&Term::Reference(s.clone())) else {
                return Vec::new();
            };
            self.graph
                .edges_directed(idx, Direction::Outgoing)
                .filter(|e| predicate.is_none_or(|p| &e.weight().predicate == p))
                .filter(|e| object.is_none_or(|o| self.graph.node_weight(e.target()) == Some(o)))
                .filter_map(|e| self.edge_triple(e.source(), e.target(), e.weight()))
                .collect()
        } else if let Some(o) = object {
            let Some(&idx) = self.node_index.get(o) else {
                return Vec::new();
            };
            self.graph
                .edges_directed(idx, Direction::Incoming)
                .filter(|e| predicate.is_none_or(|p| &e.weight().predicate == p))
                .filter_map(|e| self.edge_triple(e.source(), e.target(), e.weight()))
                .collect()
        } else if let Some(p) = predicate {
            self.predicate_index
                .get(p)
                .into_iter()
                .flatten()
                .filter_map(|&edge| {
                    let (src, dst) = self.graph.edge_endpoints(edge)?;
                    self.edge_triple(src, dst, self.graph.edge_weight(edge)?)
                })
                .collect()
        } else {
            self.all_triples()
        }
    }

    /// Follow a predicate path from a start node.
    ///
    /// Begins with the singleton frontier `{start}`; for each predicate in
    /// order, replaces the frontier with the set of objects reachable over
    /// that predicate and emits every triple consumed. Stops early with the
    /// triples collected so far once the frontier empties.
    pub fn path(&self, start: &Iri, predicates: &[Iri]) -> Vec<Triple> {
        let mut triples = Vec::new();
        let mut frontier: Vec<NodeIndex> = match self
            .node_index
            .get(&Term::Reference(start.clone()))
        {
            Some(&idx) => vec![idx],
            None => return triples,
        };

        for predicate in predicates {
            let mut next = Vec::new();
            let mut next_seen: HashSet<NodeIndex> = HashSet::new();
            for &node in &frontier {
                for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                    if &edge.weight().predicate != predicate {
                        continue;
                    }
                    if let Some(triple) =
                        self.edge_triple(edge.source(), edge.target(), edge.weight())
                    {
                        let continuation = self.continuation_node(&triple.object);
                        triples.push(triple);
                        if let Some(obj_node) = continuation
                            && next_seen.insert(obj_node)
                        {
                            next.push(obj_node);
                        }
                    }
                }
            }
            frontier = next;
            if frontier.is_empty() {
                break;
            }
        }

        triples
    }

    /// The node a traversal continues from after landing on an object.
    ///
    /// References continue from their own node; a string literal continues
    /// from the node its name denotes, when one exists. Numeric literals
    /// end the branch.
    fn continuation_node(&self, object: &Term) -> Option<NodeIndex> {
        match object {
            Term::Reference(_) => self.node_index.get(object).copied(),
            Term::String(name) => self
                .node_index
                .get(&Term::Reference(Iri::resolve(name)))
                .copied(),
            Term::Integer(_) | Term::Float(_) => None,
        }
    }

    /// Every stored triple, in insertion order.
    pub fn all_triples(&self) -> Vec<Triple> {
        self.graph
            .edge_references()
            .filter_map(|e| self.edge_triple(e.source(), e.target(), e.weight()))
            .collect()
    }

    /// Triple count and per-position distinct cardinalities.
    pub fn stats(&self) -> GraphStats {
        let mut subjects = HashSet::new();
        let mut predicates = HashSet::new();
        let mut objects = HashSet::new();
        for triple in &self.seen {
            subjects.insert(&triple.subject);
            predicates.insert(&triple.predicate);
            objects.insert(&triple.object);
        }
        GraphStats {
            triple_count: self.seen.len(),
            unique_subjects: subjects.len(),
            unique_predicates: predicates.len(),
            unique_objects: objects.len(),
        }
    }

    /// Number of stored triples.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether the store holds no triples.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn edge_triple(&self, source: NodeIndex, target: NodeIndex, data: &EdgeData) -> Option<Triple> {
        let subject = match self.graph.node_weight(source)? {
            Term::Reference(iri) => iri.clone(),
            // Subjects are references by construction.
            _ => return None,
        };
        let object = self.graph.node_weight(target)?.clone();
        Some(Triple {
            subject,
            predicate: data.predicate.clone(),
            object,
            context: data.context.clone(),
        })
    }
}
