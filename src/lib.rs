// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # congo-core
//!
//! The symbolic reasoning core of the Congo neuro-symbolic question-answering
//! system: an in-memory triple store with pattern and path queries, and a
//! proof search engine producing transparent reasoning traces.
//!
//! ## Architecture
//!
//! - **Term model** (`term`): tagged reference/literal terms, canonicalized once at parse
//! - **Triple store** (`graph`): petgraph-backed store with per-position indices,
//!   plus a SPARQL facade over `oxigraph`
//! - **Rule engine** (`rules`): premise/conclusion templates with single-letter variables
//! - **Proof searcher** (`proof`): forward saturation and depth-limited backward chaining
//! - **Engine facade** (`engine`): owns the store, shapes every query into a `QueryResult`
//!
//! ## Library usage
//!
//! ```
//! use congo_core::engine::{Engine, EngineConfig};
//! use congo_core::graph::Triple;
//!
//! let mut engine = Engine::new(EngineConfig::default());
//! engine.add_triple(Triple::from_raw("sky", "is_a", "blue"));
//! let result = engine.query_pattern(Some("sky"), None, None);
//! assert_eq!(result.count, 1);
//! ```

pub mod engine;
pub mod error;
pub mod graph;
pub mod proof;
pub mod query;
pub mod request;
pub mod rules;
pub mod source;
pub mod term;
