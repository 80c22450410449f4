//! Inference rules and variable-aware pattern matching.
//!
//! A rule is a set of premise templates and a conclusion template. Patterns
//! are whitespace-tokenized strings; a token that is a single uppercase
//! ASCII letter is a universal variable, everything else is literal. A match
//! produces a binding environment; instantiation substitutes an environment
//! back into the templates.

use std::collections::BTreeMap;

/// A binding environment: variable token to the concrete token it matched.
pub type Bindings = BTreeMap<String, String>;

/// Whether a token is a pattern variable (single uppercase ASCII letter).
pub fn is_variable(token: &str) -> bool {
    token.len() == 1 && token.as_bytes()[0].is_ascii_uppercase()
}

/// Match a pattern against a fact string.
///
/// Both are split on whitespace and walked in parallel. A variable binds to
/// the fact token at its position and may only rebind to the same token; a
/// literal token must equal the fact token. Returns the binding environment
/// on success.
pub fn match_pattern(pattern: &str, fact: &str) -> Option<Bindings> {
    let pattern_tokens: Vec<&str> = pattern.split_whitespace().collect();
    let fact_tokens: Vec<&str> = fact.split_whitespace().collect();
    if pattern_tokens.len() != fact_tokens.len() {
        return None;
    }

    let mut bindings = Bindings::new();
    for (p, f) in pattern_tokens.iter().zip(&fact_tokens) {
        if is_variable(p) {
            match bindings.get(*p) {
                Some(bound) if bound != f => return None,
                Some(_) => {}
                None => {
                    bindings.insert((*p).to_string(), (*f).to_string());
                }
            }
        } else if p != f {
            return None;
        }
    }
    Some(bindings)
}

/// Substitute a binding environment into a template; unbound variables and
/// literal tokens are copied verbatim.
pub fn substitute(template: &str, bindings: &Bindings) -> String {
    template
        .split_whitespace()
        .map(|token| {
            if is_variable(token) {
                bindings.get(token).map(String::as_str).unwrap_or(token)
            } else {
                token
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A logical inference rule: premises entail the conclusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Premise templates, in the order they must be proved.
    pub premises: Vec<String>,
    /// Conclusion template.
    pub conclusion: String,
    /// Rule name, recorded in proof steps.
    pub name: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

impl Rule {
    /// Create a rule with the default name and full confidence.
    pub fn new(premises: Vec<String>, conclusion: impl Into<String>) -> Self {
        Self {
            premises,
            conclusion: conclusion.into(),
            name: "rule".to_string(),
            confidence: 1.0,
        }
    }

    /// Set the rule name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the confidence, clamped into `[0, 1]`.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Whether the conclusion matches a goal, exactly or via variables.
    pub fn matches_goal(&self, goal: &str) -> bool {
        self.conclusion == goal || match_pattern(&self.conclusion, goal).is_some()
    }

    /// Binding environment under which the conclusion matches the goal.
    pub fn goal_bindings(&self, goal: &str) -> Option<Bindings> {
        match_pattern(&self.conclusion, goal)
    }

    /// Produce a concrete rule by substituting a binding environment into
    /// every premise and the conclusion. Name and confidence are preserved.
    pub fn instantiate(&self, bindings: &Bindings) -> Rule {
        Rule {
            premises: self
                .premises
                .iter()
                .map(|p| substitute(p, bindings))
                .collect(),
            conclusion: substitute(&self.conclusion, bindings),
            name: self.name.clone(),
            confidence: self.confidence,
        }
    }
}
