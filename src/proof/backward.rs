//! Backward chaining: goal-driven recursion from a goal to supporting facts.
//!
//! The cycle guard is the set of goals on the current recursion stack:
//! pushed on entry, popped on exit, so a goal rejected inside one branch
//! stays provable for its siblings.

use std::collections::HashSet;

use crate::rules::Rule;

use super::{ProofStep, ProofStrategy, ProofTree, aggregate_confidence};

/// Prove a goal by recursive backward chaining.
pub(crate) fn chain(
    goal: &str,
    facts: &HashSet<String>,
    rules: &[Rule],
    max_depth: usize,
) -> ProofTree {
    let mut in_progress = HashSet::new();
    prove(goal, facts, rules, 0, max_depth, &mut in_progress)
}

fn prove(
    goal: &str,
    facts: &HashSet<String>,
    rules: &[Rule],
    depth: usize,
    max_depth: usize,
    in_progress: &mut HashSet<String>,
) -> ProofTree {
    if depth > max_depth {
        return ProofTree::failure(goal, ProofStrategy::Backward, depth);
    }
    // A goal already being proved further up the stack is circular.
    if !in_progress.insert(goal.to_string()) {
        return ProofTree::failure(goal, ProofStrategy::Backward, depth);
    }

    let tree = prove_guarded(goal, facts, rules, depth, max_depth, in_progress);
    in_progress.remove(goal);
    tree
}

fn prove_guarded(
    goal: &str,
    facts: &HashSet<String>,
    rules: &[Rule],
    depth: usize,
    max_depth: usize,
    in_progress: &mut HashSet<String>,
) -> ProofTree {
    // Base case: the goal is a known fact.
    if facts.contains(goal) {
        return ProofTree {
            goal: goal.to_string(),
            success: true,
            strategy: ProofStrategy::Backward,
            steps: vec![ProofStep {
                conclusion: goal.to_string(),
                premises: Vec::new(),
                rule_name: "given_fact".to_string(),
                confidence: 1.0,
            }],
            confidence: 1.0,
            depth,
        };
    }

    // Conclusions are matched by string equality; rules with variables in
    // their conclusion are inert here.
    for rule in rules.iter().filter(|r| r.conclusion == goal) {
        let mut steps: Vec<ProofStep> = Vec::new();
        let mut all_proved = true;

        for premise in &rule.premises {
            let subproof = prove(premise, facts, rules, depth + 1, max_depth, in_progress);
            if !subproof.success {
                all_proved = false;
                break;
            }
            steps.extend(subproof.steps);
        }

        if all_proved {
            steps.push(ProofStep {
                conclusion: goal.to_string(),
                premises: rule.premises.clone(),
                rule_name: rule.name.clone(),
                confidence: rule.confidence,
            });
            let confidence = aggregate_confidence(&steps);
            return ProofTree {
                goal: goal.to_string(),
                success: true,
                strategy: ProofStrategy::Backward,
                steps,
                confidence,
                depth,
            };
        }
    }

    ProofTree::failure(goal, ProofStrategy::Backward, depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(facts: &[&str]) -> HashSet<String> {
        facts.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn direct_fact_proves_in_one_step() {
        let tree = chain("sky is_a blue", &known(&["sky is_a blue"]), &[], 10);

        assert!(tree.success);
        assert_eq!(tree.steps.len(), 1);
        let step = &tree.steps[0];
        assert_eq!(step.conclusion, "sky is_a blue");
        assert!(step.premises.is_empty());
        assert_eq!(step.rule_name, "given_fact");
        assert_eq!(step.confidence, 1.0);
        assert_eq!(tree.confidence, 1.0);
    }

    #[test]
    fn single_rule_chain_orders_subproof_first() {
        let rules = vec![
            Rule::new(vec!["socrates is_a man".into()], "socrates is_a mortal")
                .named("r1")
                .with_confidence(0.9),
        ];
        let tree = chain(
            "socrates is_a mortal",
            &known(&["socrates is_a man"]),
            &rules,
            10,
        );

        assert!(tree.success);
        assert_eq!(tree.steps.len(), 2);
        assert_eq!(tree.steps[0].rule_name, "given_fact");
        assert_eq!(tree.steps[0].conclusion, "socrates is_a man");
        assert_eq!(tree.steps[1].rule_name, "r1");
        assert_eq!(tree.steps[1].conclusion, "socrates is_a mortal");
        assert!((tree.confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn final_step_concludes_the_goal() {
        let rules = vec![
            Rule::new(vec!["a".into()], "b").named("ab"),
            Rule::new(vec!["b".into()], "c").named("bc"),
        ];
        let tree = chain("c", &known(&["a"]), &rules, 10);
        assert!(tree.success);
        assert_eq!(tree.steps.last().unwrap().conclusion, "c");
    }

    #[test]
    fn cyclic_rules_terminate_without_proof() {
        let rules = vec![
            Rule::new(vec!["q".into()], "p").named("qp"),
            Rule::new(vec!["p".into()], "q").named("pq"),
        ];
        let tree = chain("p", &known(&[]), &rules, 10);

        assert!(!tree.success);
        assert!(tree.steps.is_empty());
    }

    #[test]
    fn self_referential_rule_terminates() {
        let rules = vec![Rule::new(vec!["p".into()], "p").named("loop")];
        let tree = chain("p", &known(&[]), &rules, 10);
        assert!(!tree.success);
    }

    #[test]
    fn depth_bound_cuts_deep_chains() {
        let rules: Vec<Rule> = (0..20)
            .map(|i| Rule::new(vec![format!("x{i}")], format!("x{}", i + 1)))
            .collect();
        let tree = chain("x20", &known(&["x0"]), &rules, 5);
        assert!(!tree.success);

        // The same chain proves once the bound allows it.
        let tree = chain("x4", &known(&["x0"]), &rules, 5);
        assert!(tree.success);
        assert_eq!(tree.steps.len(), 5);
    }

    #[test]
    fn failed_branch_does_not_poison_siblings() {
        // Both premises of "r" bottom out in the same fact "s". With a
        // shared visited cache the second premise would be rejected; the
        // stack guard must let it prove.
        let rules = vec![
            Rule::new(vec!["p".into(), "q".into()], "r").named("join"),
            Rule::new(vec!["s".into()], "p").named("sp"),
            Rule::new(vec!["s".into()], "q").named("sq"),
        ];
        let tree = chain("r", &known(&["s"]), &rules, 10);

        assert!(tree.success);
        assert_eq!(tree.steps.len(), 5);
        assert_eq!(tree.steps.last().unwrap().rule_name, "join");
    }

    #[test]
    fn first_matching_rule_that_proves_wins() {
        let rules = vec![
            Rule::new(vec!["missing".into()], "goal").named("dead_end"),
            Rule::new(vec!["a".into()], "goal").named("viable").with_confidence(0.8),
        ];
        let tree = chain("goal", &known(&["a"]), &rules, 10);

        assert!(tree.success);
        assert_eq!(tree.steps.last().unwrap().rule_name, "viable");
        assert!((tree.confidence - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn variable_conclusions_are_inert() {
        // String-equality conclusion matching: a rule concluding "X is_a
        // mortal" never fires for a concrete goal.
        let rules = vec![Rule::new(vec!["socrates is_a man".into()], "X is_a mortal")];
        let tree = chain("socrates is_a mortal", &known(&["socrates is_a man"]), &rules, 10);
        assert!(!tree.success);
    }

    #[test]
    fn confidence_is_minimum_across_subproofs() {
        let rules = vec![
            Rule::new(vec!["a".into()], "b").named("weak").with_confidence(0.4),
            Rule::new(vec!["b".into()], "c").named("strong").with_confidence(0.95),
        ];
        let tree = chain("c", &known(&["a"]), &rules, 10);
        assert!(tree.success);
        assert!((tree.confidence - 0.4).abs() < f32::EPSILON);
    }
}
