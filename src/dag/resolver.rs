// src/dag/resolver.rs

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::dag::graph::{Recipe, RecipeGraph};
use crate::exec::invoker;
use crate::fs::{FileSystem, RealFileSystem};
use crate::state::BuildState;
use crate::types::{RecipeStatus, TargetId};

/// Resolve `target` against the real filesystem.
///
/// Convenience wrapper around [`Resolver`] for callers that do not need a
/// custom [`FileSystem`].
pub fn resolve(target: &str, graph: &RecipeGraph, state: &mut BuildState) -> RecipeStatus {
    Resolver::new(graph, &RealFileSystem, state).resolve(target)
}

/// A graph node whose dependencies are being resolved.
#[derive(Debug)]
struct Frame<'g> {
    target: &'g str,
    recipe: &'g Recipe,
    /// Index into `recipe.deps` of the next dependency to visit.
    next_dep: usize,
    needs_rebuild: bool,
}

/// Decides which targets are stale and rebuilds them, dependencies first.
///
/// The walk is an explicit post-order traversal over a frame stack rather
/// than recursion, so deep graphs do not grow the call stack.
///
/// Every target is resolved at most once per `Resolver`: in a diamond the
/// shared node's action runs once and its leaf stamps are compared once,
/// and later visits reuse the first status.
pub struct Resolver<'g, 's> {
    graph: &'g RecipeGraph,
    fs: &'g dyn FileSystem,
    state: &'s mut BuildState,
    memo: HashMap<TargetId, RecipeStatus>,
}

impl<'g, 's> Resolver<'g, 's> {
    pub fn new(graph: &'g RecipeGraph, fs: &'g dyn FileSystem, state: &'s mut BuildState) -> Self {
        Self {
            graph,
            fs,
            state,
            memo: HashMap::new(),
        }
    }

    /// Status of every target resolved so far.
    pub fn statuses(&self) -> &HashMap<TargetId, RecipeStatus> {
        &self.memo
    }

    pub fn into_statuses(self) -> HashMap<TargetId, RecipeStatus> {
        self.memo
    }

    /// Resolve `target`, rebuilding whatever is stale beneath it.
    pub fn resolve(&mut self, target: &str) -> RecipeStatus {
        if let Some(status) = self.memo.get(target) {
            return *status;
        }

        let graph = self.graph;
        let Some((root, recipe)) = graph.get_entry(target) else {
            let status = self.check_leaf(target);
            self.memo.insert(target.to_string(), status);
            return status;
        };

        let mut in_progress: HashSet<&'g str> = HashSet::new();
        let mut stack: Vec<Frame<'g>> = vec![self.enter(root, recipe)];
        in_progress.insert(root.as_str());

        // Status of the frame that was just completed, waiting to be
        // delivered to the frame beneath it.
        let mut incoming: Option<RecipeStatus> = None;

        loop {
            if let Some(status) = incoming.take() {
                let Some(parent) = stack.last_mut() else {
                    return status;
                };

                match status {
                    RecipeStatus::FailedToMake => {
                        let failed = parent.target;
                        warn!(
                            node = %failed,
                            "a dependency could not be made; not building"
                        );
                        stack.pop();
                        in_progress.remove(failed);
                        self.settle(failed, &[], RecipeStatus::FailedToMake);
                        incoming = Some(RecipeStatus::FailedToMake);
                        continue;
                    }
                    RecipeStatus::Changed => parent.needs_rebuild = true,
                    RecipeStatus::UpToDate => {}
                }
            }

            let Some(frame) = stack.last_mut() else {
                // Unreachable: the root's status is returned above.
                return RecipeStatus::FailedToMake;
            };
            let recipe: &'g Recipe = frame.recipe;

            match recipe.deps.get(frame.next_dep) {
                Some(dep) => {
                    frame.next_dep += 1;
                    incoming = self.visit(dep.as_str(), &mut stack, &mut in_progress);
                }
                None => {
                    let Some(done) = stack.pop() else {
                        return RecipeStatus::FailedToMake;
                    };
                    in_progress.remove(done.target);
                    incoming = Some(self.finish(done));
                }
            }
        }
    }

    /// Visit one dependency of the frame on top of `stack`.
    ///
    /// Returns the dependency's status if it is already known (memoized or
    /// a leaf); otherwise pushes a new frame and returns `None`.
    fn visit(
        &mut self,
        dep: &'g str,
        stack: &mut Vec<Frame<'g>>,
        in_progress: &mut HashSet<&'g str>,
    ) -> Option<RecipeStatus> {
        if let Some(status) = self.memo.get(dep) {
            debug!(node = %dep, status = %status, "already resolved in this run");
            return Some(*status);
        }

        if in_progress.contains(dep) {
            error!(
                node = %dep,
                "circular dependency: {} depends on itself",
                dep
            );
            return Some(RecipeStatus::FailedToMake);
        }

        let graph = self.graph;
        match graph.get_entry(dep) {
            Some((key, recipe)) => {
                in_progress.insert(key.as_str());
                stack.push(self.enter(key.as_str(), recipe));
                None
            }
            None => {
                let status = self.check_leaf(dep);
                self.memo.insert(dep.to_string(), status);
                Some(status)
            }
        }
    }

    /// Start resolving a graph node: decide what forces a rebuild before
    /// looking at any dependency.
    fn enter(&self, target: &'g str, recipe: &'g Recipe) -> Frame<'g> {
        let mut needs_rebuild = false;

        if !self.fs.exists(Path::new(target)) {
            info!(node = %target, "target does not exist; it needs to be built");
            needs_rebuild = true;
        }

        if self.state.deps_changed(target, &recipe.deps) {
            info!(
                node = %target,
                old = ?self.state.recorded_deps(target),
                new = ?recipe.deps,
                "dependencies changed; rebuilding regardless of their state"
            );
            needs_rebuild = true;
        }

        debug!(node = %target, deps = ?recipe.deps, "checking dependencies");

        Frame {
            target,
            recipe,
            next_dep: 0,
            needs_rebuild,
        }
    }

    /// All dependencies of `frame` resolved without failure: rebuild if
    /// anything forced it, otherwise the node is up to date.
    fn finish(&mut self, frame: Frame<'g>) -> RecipeStatus {
        let Frame {
            target,
            recipe,
            needs_rebuild,
            ..
        } = frame;

        let status = if needs_rebuild {
            let code = invoker::invoke(target, recipe);
            if code == 0 {
                RecipeStatus::Changed
            } else {
                error!(
                    node = %target,
                    exit_code = code,
                    "building {} failed with error code {}",
                    target,
                    code
                );
                RecipeStatus::FailedToMake
            }
        } else {
            debug!(node = %target, "dependencies are up to date; target is up to date");
            RecipeStatus::UpToDate
        };

        self.settle(target, &recipe.deps, status);
        status
    }

    /// Memoize a graph node's status and update its recorded recipe:
    /// recorded on success, forgotten on failure so the next run rebuilds.
    fn settle(&mut self, target: &str, deps: &[TargetId], status: RecipeStatus) {
        if status.is_failure() {
            self.state.forget_recipe(target);
        } else {
            self.state.record_recipe(target, deps);
        }
        self.memo.insert(target.to_string(), status);
    }

    /// A target with no recipe: it must exist, and it is `Changed` whenever
    /// its stamp differs from (or is missing in) the recorded one.
    fn check_leaf(&mut self, target: &str) -> RecipeStatus {
        let stamp = match self.fs.modified(Path::new(target)) {
            Ok(Some(stamp)) => stamp,
            Ok(None) => {
                error!(node = %target, "no recipe to make {}", target);
                return RecipeStatus::FailedToMake;
            }
            Err(err) => {
                error!(node = %target, error = %err, "cannot read modification time");
                return RecipeStatus::FailedToMake;
            }
        };

        match self.state.record_file_stamp(target, stamp) {
            None => {
                info!(node = %target, "not seen before");
                RecipeStatus::Changed
            }
            Some(old) if old != stamp => {
                info!(
                    node = %target,
                    old = old.as_nanos(),
                    new = stamp.as_nanos(),
                    "modification time changed"
                );
                RecipeStatus::Changed
            }
            Some(_) => {
                debug!(node = %target, "up to date");
                RecipeStatus::UpToDate
            }
        }
    }
}
