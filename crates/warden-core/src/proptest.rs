//! Property-based tests for dependency resolution.
//!
//! These tests use proptest to verify that:
//! - resolved order respects every declared dependency
//! - resolution is deterministic for a fixed input
//! - cycles of any length are rejected

use crate::error::EngineError;
use crate::resolver::resolve;
use crate::rule::BoxedRule;
use crate::test_support::{names, passing};
use proptest::prelude::*;
use std::collections::HashMap;

// ============================================================================
// Strategies
// ============================================================================

/// Acyclic rule sets: rule `i` may only depend on rules `0..i`, then the list
/// is shuffled so input order carries no hint.
fn arb_dag() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    (0usize..12).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(any::<bool>(), n), n)
            .prop_map(move |matrix| {
                (0..n)
                    .map(|i| {
                        let deps = (0..i)
                            .filter(|&j| matrix[i][j])
                            .map(|j| format!("rule{}", j))
                            .collect();
                        (format!("rule{}", i), deps)
                    })
                    .collect::<Vec<_>>()
            })
            .prop_shuffle()
    })
}

fn build(graph: &[(String, Vec<String>)]) -> Vec<BoxedRule<str>> {
    graph.iter()
        .map(|(name, deps)| {
            let deps: Vec<&str> = deps.iter().map(String::as_str).collect();
            passing(name, &deps)
        })
        .collect()
}

proptest! {
    #[test]
    fn resolved_order_respects_dependencies(graph in arb_dag()) {
        let resolved = resolve(build(&graph)).unwrap();
        let order = names(&resolved);
        prop_assert_eq!(order.len(), graph.len());

        let position: HashMap<&str, usize> =
            order.iter().enumerate().map(|(i, name)| (*name, i)).collect();

        for (name, deps) in &graph {
            for dep in deps {
                prop_assert!(
                    position[dep.as_str()] < position[name.as_str()],
                    "{} must come after {}", name, dep
                );
            }
        }
    }

    #[test]
    fn resolution_is_deterministic(graph in arb_dag()) {
        let first: Vec<String> = names(&resolve(build(&graph)).unwrap())
            .into_iter()
            .map(String::from)
            .collect();
        let second: Vec<String> = names(&resolve(build(&graph)).unwrap())
            .into_iter()
            .map(String::from)
            .collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn cycles_of_any_length_are_rejected(len in 1usize..8, extra in 0usize..4) {
        // rule i depends on rule (i + 1) % len; rule 0 with len 1 depends on itself.
        let mut graph: Vec<(String, Vec<String>)> = (0..len)
            .map(|i| (format!("cycle{}", i), vec![format!("cycle{}", (i + 1) % len)]))
            .collect();
        graph.extend((0..extra).map(|i| (format!("free{}", i), Vec::new())));

        let is_cycle = matches!(
            resolve(build(&graph)),
            Err(EngineError::CyclicDependency { .. })
        );
        prop_assert!(is_cycle);
    }
}
