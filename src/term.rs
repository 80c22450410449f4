//! Core term types for the reasoning core.
//!
//! Every position in a triple holds a [`Term`]: a reference (URI-shaped
//! identifier) or a scalar literal. Classification happens once, at parse
//! time; the rest of the crate works with the tagged variants.

use serde::{Deserialize, Serialize};

/// Default namespace for bare names (`cr:`).
pub const DEFAULT_NS: &str = "http://congoriver.ai/ontology#";

/// An absolute identifier, conventionally URI-shaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Wrap an already-absolute identifier without namespacing.
    pub fn absolute(iri: impl Into<String>) -> Self {
        Iri(iri.into())
    }

    /// Resolve a name into a reference: strings starting with `http` are
    /// taken as-is, bare names are expanded under the `cr:` namespace.
    pub fn resolve(name: &str) -> Self {
        if name.starts_with("http") {
            Iri(name.to_string())
        } else {
            Iri(format!("{DEFAULT_NS}{name}"))
        }
    }

    /// The full identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A term: a reference or a scalar literal.
#[derive(Debug, Clone)]
pub enum Term {
    /// An identifier denoting an entity.
    Reference(Iri),
    /// An integer literal.
    Integer(i64),
    /// A floating-point literal.
    Float(f64),
    /// A string literal.
    String(String),
}

impl Term {
    /// Classify a raw string into a term.
    ///
    /// A string starting with `http` is a reference. Otherwise a dot-free
    /// string that parses as an integer is an integer literal, and a string
    /// containing a dot that parses as a float is a float literal.
    /// Everything else is a string literal.
    pub fn from_string(s: &str) -> Self {
        if s.starts_with("http") {
            return Term::Reference(Iri::absolute(s));
        }
        if s.contains('.') {
            if let Ok(f) = s.parse::<f64>() {
                return Term::Float(f);
            }
        } else if let Ok(i) = s.parse::<i64>() {
            return Term::Integer(i);
        }
        Term::String(s.to_string())
    }

    /// Build a reference term, namespacing bare names under `cr:`.
    pub fn reference(name: &str) -> Self {
        Term::Reference(Iri::resolve(name))
    }

    /// Whether this term is a reference.
    pub fn is_reference(&self) -> bool {
        matches!(self, Term::Reference(_))
    }
}

// Floats compare and hash by bit pattern so Term stays usable as a map key.
// Canonical terms never hold NaN: a dot-free "nan"/"inf" fails the integer
// parse and falls through to a string literal.
impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Reference(a), Term::Reference(b)) => a == b,
            (Term::Integer(a), Term::Integer(b)) => a == b,
            (Term::Float(a), Term::Float(b)) => a.to_bits() == b.to_bits(),
            (Term::String(a), Term::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl std::hash::Hash for Term {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Term::Reference(iri) => {
                0u8.hash(state);
                iri.hash(state);
            }
            Term::Integer(i) => {
                1u8.hash(state);
                i.hash(state);
            }
            Term::Float(f) => {
                2u8.hash(state);
                f.to_bits().hash(state);
            }
            Term::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl std::fmt::Display for Term {
    /// Canonical string form: references print their full identifier,
    /// literals their natural form. Floats always carry a decimal point so
    /// re-parsing classifies them as floats again.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Reference(iri) => f.write_str(iri.as_str()),
            Term::Integer(i) => write!(f, "{i}"),
            Term::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Term::String(s) => f.write_str(s),
        }
    }
}
