//! Forward chaining: data-driven saturation from facts to conclusions.

use std::collections::HashSet;

use crate::rules::Rule;

use super::{ProofStep, ProofStrategy, ProofTree, aggregate_confidence};

/// Saturate the fact set round by round until the goal is derived, nothing
/// changes, or the round bound is hit.
///
/// A rule fires when every premise is known and its conclusion is new.
/// `depth` on the returned tree is the number of completed rounds; a goal
/// already among the given facts succeeds immediately with zero steps.
pub(crate) fn chain(
    goal: &str,
    facts: &HashSet<String>,
    rules: &[Rule],
    max_depth: usize,
) -> ProofTree {
    let mut known = facts.clone();
    let mut steps: Vec<ProofStep> = Vec::new();

    if known.contains(goal) {
        return ProofTree {
            goal: goal.to_string(),
            success: true,
            strategy: ProofStrategy::Forward,
            steps,
            confidence: 1.0,
            depth: 0,
        };
    }

    let mut changed = true;
    let mut rounds = 0;

    while changed && rounds < max_depth {
        changed = false;
        rounds += 1;

        for rule in rules {
            if rule.premises.iter().all(|p| known.contains(p))
                && !known.contains(&rule.conclusion)
            {
                known.insert(rule.conclusion.clone());
                steps.push(ProofStep {
                    conclusion: rule.conclusion.clone(),
                    premises: rule.premises.clone(),
                    rule_name: rule.name.clone(),
                    confidence: rule.confidence,
                });
                changed = true;

                if rule.conclusion == goal {
                    let confidence = aggregate_confidence(&steps);
                    return ProofTree {
                        goal: goal.to_string(),
                        success: true,
                        strategy: ProofStrategy::Forward,
                        steps,
                        confidence,
                        depth: rounds,
                    };
                }
            }
        }
    }

    let confidence = aggregate_confidence(&steps);
    ProofTree {
        goal: goal.to_string(),
        success: false,
        strategy: ProofStrategy::Forward,
        steps,
        confidence,
        depth: rounds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(facts: &[&str]) -> HashSet<String> {
        facts.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn two_step_saturation_reaches_goal() {
        let rules = vec![
            Rule::new(vec!["a".into(), "b".into()], "c").named("r1"),
            Rule::new(vec!["c".into()], "d").named("r2"),
        ];
        let tree = chain("d", &known(&["a", "b"]), &rules, 10);

        assert!(tree.success);
        assert!(tree.depth <= 2);
        assert_eq!(tree.steps.len(), 2);
        assert_eq!(tree.steps[0].conclusion, "c");
        assert_eq!(tree.steps[1].conclusion, "d");
    }

    #[test]
    fn goal_among_facts_succeeds_with_zero_steps() {
        let tree = chain("a", &known(&["a"]), &[], 10);
        assert!(tree.success);
        assert!(tree.steps.is_empty());
        assert_eq!(tree.depth, 0);
        assert_eq!(tree.confidence, 1.0);
    }

    #[test]
    fn unreachable_goal_fails_after_fixpoint() {
        let rules = vec![Rule::new(vec!["a".into()], "b").named("r1")];
        let tree = chain("z", &known(&["a"]), &rules, 10);

        assert!(!tree.success);
        assert_eq!(tree.steps.len(), 1);
        // Round 1 derives b, round 2 changes nothing.
        assert_eq!(tree.depth, 2);
    }

    #[test]
    fn saturated_set_emits_no_new_steps() {
        let rules = vec![
            Rule::new(vec!["a".into(), "b".into()], "c"),
            Rule::new(vec!["c".into()], "d"),
        ];
        let first = chain("z", &known(&["a", "b"]), &rules, 10);
        assert_eq!(first.steps.len(), 2);

        // Re-run with every derived conclusion already known.
        let mut saturated = known(&["a", "b"]);
        for step in &first.steps {
            saturated.insert(step.conclusion.clone());
        }
        let second = chain("z", &saturated, &rules, 10);
        assert!(second.steps.is_empty());
    }

    #[test]
    fn confidence_is_minimum_over_steps() {
        let rules = vec![
            Rule::new(vec!["a".into()], "b").named("weak").with_confidence(0.6),
            Rule::new(vec!["b".into()], "c").named("strong").with_confidence(0.9),
        ];
        let tree = chain("c", &known(&["a"]), &rules, 10);
        assert!(tree.success);
        assert!((tree.confidence - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn round_bound_stops_long_chains() {
        // A linear chain needs one round per hop with this rule ordering:
        // the rule list is walked in order, so x9 <- ... <- x0 derives one
        // new fact per round.
        let rules: Vec<Rule> = (0..9)
            .rev()
            .map(|i| Rule::new(vec![format!("x{i}")], format!("x{}", i + 1)))
            .collect();
        let tree = chain("x9", &known(&["x0"]), &rules, 3);
        assert!(!tree.success);
        assert_eq!(tree.depth, 3);
    }
}
