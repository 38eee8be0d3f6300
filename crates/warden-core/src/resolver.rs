//! Dependency resolution for sibling rules.
//!
//! Rules reference each other by name. The resolver builds a transient
//! index-based graph (edge: dependency -> dependent) and orders it with
//! Kahn's algorithm. Among rules that are ready at the same step, the one
//! given first wins, so the output is reproducible for a fixed input.
//!
//! Resolution fails closed: an unknown dependency, a duplicate name or a cycle
//! is an error and no partial order is returned.

use std::collections::{BTreeSet, HashMap};

use crate::error::{EngineError, EngineResult};
use crate::rule::BoxedRule;

/// Reorder `rules` so every rule follows all of its dependencies.
pub fn resolve<S: ?Sized>(rules: Vec<BoxedRule<S>>) -> EngineResult<Vec<BoxedRule<S>>> {
    let order = resolve_order(&rules)?;

    let mut slots: Vec<Option<BoxedRule<S>>> = rules.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect())
}

/// Evaluation order for `rules`, as indices into the slice.
pub fn resolve_order<S: ?Sized>(rules: &[BoxedRule<S>]) -> EngineResult<Vec<usize>> {
    let nodes: Vec<(&str, &[String])> = rules
        .iter()
        .map(|rule| (rule.name(), rule.dependencies()))
        .collect();
    order_nodes(&nodes)
}

/// Order `(name, dependencies)` pairs, returning indices into `nodes`.
pub fn order_nodes(nodes: &[(&str, &[String])]) -> EngineResult<Vec<usize>> {
    let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (index, (name, _)) in nodes.iter().enumerate() {
        if index_of.insert(*name, index).is_some() {
            return Err(EngineError::DuplicateRule {
                name: name.to_string(),
            });
        }
    }

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree = vec![0usize; nodes.len()];

    for (index, (name, dependencies)) in nodes.iter().enumerate() {
        for dependency in dependencies.iter() {
            let Some(&dependency_index) = index_of.get(dependency.as_str()) else {
                return Err(EngineError::UnknownDependency {
                    rule: name.to_string(),
                    dependency: dependency.clone(),
                });
            };
            dependents[dependency_index].push(index);
            in_degree[index] += 1;
        }
    }

    let mut ready: BTreeSet<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &dependent in &dependents[next] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < nodes.len() {
        let rules: Vec<String> = (0..nodes.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| nodes[i].0.to_string())
            .collect();
        tracing::debug!(unresolved = ?rules, "Rule dependency cycle");
        return Err(EngineError::CyclicDependency { rules });
    }

    tracing::debug!(
        order = ?order.iter().map(|&i| nodes[i].0).collect::<Vec<_>>(),
        "Resolved rule order"
    );

    Ok(order)
}
