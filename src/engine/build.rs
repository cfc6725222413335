// src/engine/build.rs

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{error, info};

use crate::dag::cycle::{cycle_check, find_cycle};
use crate::dag::graph::RecipeGraph;
use crate::dag::resolver::Resolver;
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::state::{self, StateLock, DEFAULT_STATE_FILE};
use crate::types::{RecipeStatus, TargetId};

/// Result of one `make_thing` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The target is up to date. Carries whether anything was rebuilt
    /// ([`RecipeStatus::Changed`]) or not ([`RecipeStatus::UpToDate`]).
    Built(RecipeStatus),
    /// A dependency cycle was found; nothing was built and the state file
    /// was not touched. The path starts and ends at the same target.
    CycleDetected(Vec<TargetId>),
    /// The target or one of its dependencies could not be made.
    Failed,
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Built(_))
    }
}

/// Build `target` on the real filesystem, persisting state at `state_path`
/// (default [`DEFAULT_STATE_FILE`]).
///
/// Returns `true` iff the target was built (or already up to date) and the
/// state was saved. Cycles, build failures and infrastructure errors (an
/// unreadable state file, a held state lock) are logged and yield `false`.
pub fn make_thing(target: &str, graph: &RecipeGraph, state_path: Option<&Path>) -> bool {
    let state_path = state_path.unwrap_or(Path::new(DEFAULT_STATE_FILE));

    // A cyclic graph never touches the disk, not even the lock file.
    if !cycle_check(target, graph) {
        return false;
    }

    let lock = match StateLock::acquire(state_path) {
        Ok(lock) => lock,
        Err(err) => {
            error!(error = %err, "cannot lock build state");
            return false;
        }
    };

    let outcome = make_thing_with(&RealFileSystem, target, graph, state_path);
    drop(lock);

    match outcome {
        Ok(outcome) => outcome.is_success(),
        Err(err) => {
            error!(node = %target, error = %err, "build aborted");
            false
        }
    }
}

/// Build `target` against an arbitrary [`FileSystem`].
///
/// Does not lock the state file; callers sharing a state file between
/// processes should hold a [`StateLock`] around this call.
///
/// State handling:
/// - cycle: state is neither loaded nor saved
/// - success: state is saved
/// - failure: state is saved as well. The failed node and everything above
///   it lose their recorded recipe. A node skipped by the failure loses its
///   record only if it depends on something that changed during this run,
///   since that change is now recorded and would otherwise go unnoticed.
pub fn make_thing_with(
    fs: &dyn FileSystem,
    target: &str,
    graph: &RecipeGraph,
    state_path: &Path,
) -> Result<BuildOutcome> {
    if let Some(cycle) = find_cycle(target, graph) {
        error!(
            node = %target,
            cycle = %cycle.join(" -> "),
            "circular dependency; refusing to build"
        );
        return Ok(BuildOutcome::CycleDetected(cycle));
    }

    let mut build_state = state::load_from(fs, state_path)?;

    let (status, statuses) = {
        let mut resolver = Resolver::new(graph, fs, &mut build_state);
        let status = resolver.resolve(target);
        (status, resolver.into_statuses())
    };

    if status.is_failure() {
        for node in stale_after_failure(target, graph, &statuses) {
            build_state.forget_recipe(&node);
        }
    }

    state::save_to(fs, state_path, &build_state)?;

    if status.is_failure() {
        error!(node = %target, "failed to make {}", target);
        Ok(BuildOutcome::Failed)
    } else {
        info!(node = %target, status = %status, "build finished");
        Ok(BuildOutcome::Built(status))
    }
}

/// Graph nodes reachable from `target` whose recorded recipe must be dropped
/// after a failed run.
///
/// Failed nodes always go. Nodes the run never reached go only if one of
/// their (transitive) dependencies resolved `Changed`: the new leaf stamps
/// and rebuilt outputs are saved, so next run they would look up to date.
fn stale_after_failure(
    target: &str,
    graph: &RecipeGraph,
    statuses: &HashMap<TargetId, RecipeStatus>,
) -> Vec<TargetId> {
    let reachable = graph.reachable_from(target);

    let mut tainted: HashSet<&str> = statuses
        .iter()
        .filter(|(_, status)| **status == RecipeStatus::Changed)
        .map(|(name, _)| name.as_str())
        .collect();

    let unvisited: Vec<&str> = reachable
        .iter()
        .map(|n| n.as_str())
        .filter(|n| !statuses.contains_key(*n))
        .collect();

    // The graph is acyclic here, so this settles within `unvisited.len()`
    // rounds.
    loop {
        let before = tainted.len();
        for node in &unvisited {
            if !tainted.contains(node)
                && graph
                    .dependencies_of(node)
                    .iter()
                    .any(|d| tainted.contains(d.as_str()))
            {
                tainted.insert(*node);
            }
        }
        if tainted.len() == before {
            break;
        }
    }

    reachable
        .iter()
        .filter(|node| match statuses.get(node.as_str()) {
            Some(status) => status.is_failure(),
            None => tainted.contains(node.as_str()),
        })
        .cloned()
        .collect()
}
