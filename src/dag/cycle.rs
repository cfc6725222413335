// src/dag/cycle.rs

use std::collections::HashSet;

use tracing::{debug, error};

use crate::dag::graph::RecipeGraph;
use crate::types::TargetId;

/// Returns `true` iff no dependency cycle is reachable from `target`.
///
/// A detected cycle is reported through `tracing::error!`.
pub fn cycle_check(target: &str, graph: &RecipeGraph) -> bool {
    match find_cycle(target, graph) {
        None => {
            debug!(node = %target, "dependency graph is acyclic");
            true
        }
        Some(cycle) => {
            error!(
                node = %target,
                cycle = %cycle.join(" -> "),
                "circular dependency: {} is part of a dependency cycle",
                cycle[0]
            );
            false
        }
    }
}

/// Depth-first search for a cycle reachable from `target`.
///
/// Returns the cycle as a path whose first and last elements are the same
/// target, e.g. `["x", "y", "x"]`.
///
/// Only targets on the *active* path count: reaching a node again through a
/// different branch (a diamond) is fine. Fully explored nodes are skipped,
/// since nothing below them can lead back onto the current path.
pub fn find_cycle(target: &str, graph: &RecipeGraph) -> Option<Vec<TargetId>> {
    let mut on_path: HashSet<&str> = HashSet::new();
    let mut explored: HashSet<&str> = HashSet::new();
    // (node, index of the next dependency to visit)
    let mut stack: Vec<(&str, usize)> = vec![(target, 0)];
    on_path.insert(target);

    loop {
        let (node, next) = match stack.last_mut() {
            Some(frame) => {
                let next = graph
                    .dependencies_of(frame.0)
                    .get(frame.1)
                    .map(|d| d.as_str());
                frame.1 += 1;
                (frame.0, next)
            }
            None => return None,
        };

        let Some(dep) = next else {
            stack.pop();
            on_path.remove(node);
            explored.insert(node);
            continue;
        };

        if on_path.contains(dep) {
            let start = stack.iter().position(|(n, _)| *n == dep).unwrap_or(0);
            let mut cycle: Vec<TargetId> =
                stack[start..].iter().map(|(n, _)| n.to_string()).collect();
            cycle.push(dep.to_string());
            return Some(cycle);
        }

        if explored.contains(dep) || graph.is_leaf(dep) {
            continue;
        }

        on_path.insert(dep);
        stack.push((dep, 0));
    }
}
