// src/dag/graph.rs

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::exec::action::Action;
use crate::types::TargetId;

/// How to (re)build one non-leaf target.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Targets that must be resolved before this one, in order.
    pub deps: Vec<TargetId>,
    /// Step that produces the target from its dependencies.
    pub action: Arc<dyn Action>,
}

impl Recipe {
    pub fn new<I, D, A>(deps: I, action: A) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TargetId>,
        A: Action + 'static,
    {
        Self::with_shared_action(deps, Arc::new(action))
    }

    pub fn with_shared_action<I, D>(deps: I, action: Arc<dyn Action>) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TargetId>,
    {
        Self {
            deps: deps.into_iter().map(Into::into).collect(),
            action,
        }
    }
}

/// Mapping from target identifier to its recipe.
///
/// Targets without an entry are leaves: they are expected to exist on disk.
/// The graph is supplied fresh on every build and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct RecipeGraph {
    recipes: BTreeMap<TargetId, Recipe>,
}

impl RecipeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the recipe for `target`, returning the previous one.
    pub fn insert(&mut self, target: impl Into<TargetId>, recipe: Recipe) -> Option<Recipe> {
        self.recipes.insert(target.into(), recipe)
    }

    /// Builder-style [`RecipeGraph::insert`].
    pub fn with(mut self, target: impl Into<TargetId>, recipe: Recipe) -> Self {
        self.insert(target, recipe);
        self
    }

    pub fn get(&self, target: &str) -> Option<&Recipe> {
        self.recipes.get(target)
    }

    /// Like [`RecipeGraph::get`], but also hands back the graph-owned key.
    pub fn get_entry(&self, target: &str) -> Option<(&TargetId, &Recipe)> {
        self.recipes.get_key_value(target)
    }

    pub fn contains(&self, target: &str) -> bool {
        self.recipes.contains_key(target)
    }

    pub fn is_leaf(&self, target: &str) -> bool {
        !self.contains(target)
    }

    /// All targets that have a recipe, in sorted order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.recipes.keys().map(|s| s.as_str())
    }

    /// Immediate dependencies of a target (empty for leaves).
    pub fn dependencies_of(&self, target: &str) -> &[TargetId] {
        self.recipes
            .get(target)
            .map(|r| r.deps.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Every graph node (non-leaf) reachable from `target`, including
    /// `target` itself when it has a recipe. Terminates on cyclic graphs.
    pub fn reachable_from(&self, target: &str) -> Vec<TargetId> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![target];

        while let Some(name) = stack.pop() {
            let Some((key, recipe)) = self.get_entry(name) else {
                continue;
            };
            if !seen.insert(key.as_str()) {
                continue;
            }
            order.push(key.clone());
            stack.extend(recipe.deps.iter().rev().map(|d| d.as_str()));
        }

        order
    }
}

impl<T: Into<TargetId>> FromIterator<(T, Recipe)> for RecipeGraph {
    fn from_iter<I: IntoIterator<Item = (T, Recipe)>>(iter: I) -> Self {
        Self {
            recipes: iter.into_iter().map(|(t, r)| (t.into(), r)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::NoopAction;

    fn diamond() -> RecipeGraph {
        RecipeGraph::new()
            .with("top", Recipe::new(["left", "right"], NoopAction))
            .with("left", Recipe::new(["shared"], NoopAction))
            .with("right", Recipe::new(["shared"], NoopAction))
            .with("shared", Recipe::new(["shared.c"], NoopAction))
    }

    #[test]
    fn leaves_have_no_dependencies() {
        let graph = diamond();
        assert!(graph.is_leaf("shared.c"));
        assert!(graph.dependencies_of("shared.c").is_empty());
        assert_eq!(graph.dependencies_of("top"), ["left", "right"]);
    }

    #[test]
    fn reachable_visits_shared_node_once() {
        let graph = diamond();
        let reachable = graph.reachable_from("top");
        assert_eq!(reachable, vec!["top", "left", "shared", "right"]);
    }

    #[test]
    fn reachable_terminates_on_cycles() {
        let graph = RecipeGraph::new()
            .with("x", Recipe::new(["y"], NoopAction))
            .with("y", Recipe::new(["x"], NoopAction));
        assert_eq!(graph.reachable_from("x").len(), 2);
    }
}
