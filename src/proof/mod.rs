//! Proof search: transparent reasoning traces over facts and rules.
//!
//! The searcher attempts to prove a goal proposition from a set of known
//! facts and inference rules, producing a [`ProofTree`] whose steps read in
//! dependency order (sub-proofs before the steps that use them). Failure is
//! a result (`success = false`), never an error.

pub mod backward;
pub mod forward;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rules::Rule;

/// Recursion and saturation bound for proof search.
pub const MAX_DEPTH: usize = 10;

/// Proof search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofStrategy {
    /// Data-driven saturation: facts forward to conclusions.
    Forward,
    /// Goal-driven recursion: goal backward to premises.
    #[default]
    Backward,
    /// Accepted for boundary compatibility; runs backward chaining.
    Resolution,
}

impl ProofStrategy {
    /// Parse a strategy name; unrecognized names fall back to backward.
    pub fn parse_lenient(name: &str) -> Self {
        match name {
            "forward" => ProofStrategy::Forward,
            "backward" => ProofStrategy::Backward,
            "resolution" => ProofStrategy::Resolution,
            _ => ProofStrategy::Backward,
        }
    }
}

impl std::fmt::Display for ProofStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofStrategy::Forward => f.write_str("forward"),
            ProofStrategy::Backward => f.write_str("backward"),
            ProofStrategy::Resolution => f.write_str("resolution"),
        }
    }
}

/// A known proposition with confidence and provenance.
#[derive(Debug, Clone)]
pub struct Fact {
    /// The proposition string.
    pub proposition: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
    /// Where this fact came from.
    pub source: String,
}

impl Fact {
    /// A given fact with full confidence.
    pub fn given(proposition: impl Into<String>) -> Self {
        Self {
            proposition: proposition.into(),
            confidence: 1.0,
            source: "given".to_string(),
        }
    }

    /// Set the confidence, clamped into `[0, 1]`.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

// Facts are keyed by proposition alone.
impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.proposition == other.proposition
    }
}

impl Eq for Fact {}

impl std::hash::Hash for Fact {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.proposition.hash(state);
    }
}

/// One inference application in a proof.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProofStep {
    /// The derived proposition.
    pub conclusion: String,
    /// The premises the rule consumed.
    pub premises: Vec<String>,
    /// Name of the applied rule (`given_fact` for base facts).
    pub rule_name: String,
    /// Confidence of the application.
    pub confidence: f32,
}

/// A complete proof attempt with its inference steps.
#[derive(Debug, Clone, Serialize)]
pub struct ProofTree {
    /// The proposition the search tried to prove.
    pub goal: String,
    /// Whether the goal was reached.
    pub success: bool,
    /// The strategy that actually ran.
    pub strategy: ProofStrategy,
    /// Steps in reading order: sub-proofs before their dependents.
    pub steps: Vec<ProofStep>,
    /// Minimum confidence among the steps; 1.0 when there are none.
    pub confidence: f32,
    /// Rounds completed (forward) or recursion depth reached (backward).
    pub depth: usize,
}

impl ProofTree {
    pub(crate) fn failure(goal: &str, strategy: ProofStrategy, depth: usize) -> Self {
        Self {
            goal: goal.to_string(),
            success: false,
            strategy,
            steps: Vec::new(),
            confidence: 1.0,
            depth,
        }
    }
}

/// Minimum step confidence, 1.0 for an empty step list.
pub(crate) fn aggregate_confidence(steps: &[ProofStep]) -> f32 {
    steps.iter().map(|s| s.confidence).fold(1.0_f32, f32::min)
}

/// Bounded proof searcher.
///
/// Stateless between calls: the backward cycle guard (the set of goals on
/// the current recursion stack) is created fresh inside [`search`] on every
/// invocation.
///
/// [`search`]: ProofSearcher::search
#[derive(Debug, Clone)]
pub struct ProofSearcher {
    max_depth: usize,
}

impl ProofSearcher {
    /// Searcher with the default depth bound.
    pub fn new() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }

    /// Searcher with a custom depth bound.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Attempt to prove `goal` from `facts` under `rules`.
    pub fn search(
        &self,
        goal: &str,
        facts: &[Fact],
        rules: &[Rule],
        strategy: ProofStrategy,
    ) -> ProofTree {
        let known: HashSet<String> = facts.iter().map(|f| f.proposition.clone()).collect();
        tracing::debug!(
            goal,
            %strategy,
            facts = known.len(),
            rules = rules.len(),
            "starting proof search"
        );

        match strategy {
            ProofStrategy::Forward => forward::chain(goal, &known, rules, self.max_depth),
            ProofStrategy::Backward => backward::chain(goal, &known, rules, self.max_depth),
            ProofStrategy::Resolution => {
                // Clausal resolution is not implemented; run backward
                // chaining and report the strategy that actually ran.
                tracing::warn!("resolution strategy requested; running backward chaining");
                backward::chain(goal, &known, rules, self.max_depth)
            }
        }
    }
}

impl Default for ProofSearcher {
    fn default() -> Self {
        Self::new()
    }
}
