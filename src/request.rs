//! Typed request structures for the process boundary.
//!
//! JSON stops here: these deserialize the `--json` payloads and convert
//! into the strongly typed internal representations. Defaults mirror the
//! wire contract (rules default to name "rule" and full confidence; an
//! absent or unknown strategy runs backward chaining).

use serde::Deserialize;

use crate::graph::Triple;
use crate::proof::{Fact, ProofStrategy};
use crate::rules::Rule;

/// A triple row supplied at the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct TripleInput {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(default)]
    pub context: Option<String>,
}

impl From<TripleInput> for Triple {
    fn from(input: TripleInput) -> Self {
        let triple = Triple::from_raw(&input.subject, &input.predicate, &input.object);
        match input.context {
            Some(context) => triple.with_context(context),
            None => triple,
        }
    }
}

/// A wildcard pattern query; absent positions are wildcards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternRequest {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub predicate: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
    /// Triples to populate the store with before querying.
    #[serde(default)]
    pub triples: Vec<TripleInput>,
}

/// A path query: follow `path` predicates from `start`.
#[derive(Debug, Clone, Deserialize)]
pub struct PathRequest {
    pub start: String,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub triples: Vec<TripleInput>,
}

/// An inference rule supplied at the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleInput {
    #[serde(default)]
    pub premises: Vec<String>,
    pub conclusion: String,
    #[serde(default = "default_rule_name")]
    pub name: String,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_rule_name() -> String {
    "rule".to_string()
}

fn default_confidence() -> f32 {
    1.0
}

impl From<RuleInput> for Rule {
    fn from(input: RuleInput) -> Self {
        Rule::new(input.premises, input.conclusion)
            .named(input.name)
            .with_confidence(input.confidence)
    }
}

/// A proof request.
#[derive(Debug, Clone, Deserialize)]
pub struct ProveRequest {
    pub goal: String,
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub rules: Vec<RuleInput>,
    #[serde(default)]
    pub strategy: Option<String>,
}

impl ProveRequest {
    /// The requested strategy; absent or unknown names run backward.
    pub fn strategy(&self) -> ProofStrategy {
        self.strategy
            .as_deref()
            .map(ProofStrategy::parse_lenient)
            .unwrap_or_default()
    }

    /// Fact strings as given facts.
    pub fn facts(&self) -> Vec<Fact> {
        self.facts.iter().map(Fact::given).collect()
    }

    /// Rule inputs as internal rules.
    pub fn rules(&self) -> Vec<Rule> {
        self.rules.iter().cloned().map(Rule::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_input_defaults() {
        let rule: RuleInput =
            serde_json::from_str(r#"{"premises": ["a"], "conclusion": "b"}"#).unwrap();
        assert_eq!(rule.name, "rule");
        assert_eq!(rule.confidence, 1.0);

        let rule = Rule::from(rule);
        assert_eq!(rule.premises, vec!["a".to_string()]);
        assert_eq!(rule.conclusion, "b");
    }

    #[test]
    fn prove_request_defaults() {
        let req: ProveRequest = serde_json::from_str(r#"{"goal": "p"}"#).unwrap();
        assert!(req.facts.is_empty());
        assert!(req.rules.is_empty());
        assert_eq!(req.strategy(), ProofStrategy::Backward);
    }

    #[test]
    fn unknown_strategy_falls_back_to_backward() {
        let req: ProveRequest =
            serde_json::from_str(r#"{"goal": "p", "strategy": "induction"}"#).unwrap();
        assert_eq!(req.strategy(), ProofStrategy::Backward);

        let req: ProveRequest =
            serde_json::from_str(r#"{"goal": "p", "strategy": "forward"}"#).unwrap();
        assert_eq!(req.strategy(), ProofStrategy::Forward);
    }

    #[test]
    fn triple_input_converts_with_context() {
        let input: TripleInput = serde_json::from_str(
            r#"{"subject": "sky", "predicate": "is_a", "object": "blue", "context": "weather"}"#,
        )
        .unwrap();
        let triple = Triple::from(input);
        assert_eq!(triple.context.as_deref(), Some("weather"));
        assert_eq!(triple.subject.as_str(), "http://congoriver.ai/ontology#sky");
    }

    #[test]
    fn pattern_request_positions_default_to_wildcards() {
        let req: PatternRequest = serde_json::from_str(r#"{"subject": "alpha"}"#).unwrap();
        assert_eq!(req.subject.as_deref(), Some("alpha"));
        assert!(req.predicate.is_none());
        assert!(req.object.is_none());
        assert!(req.triples.is_empty());
    }
}
