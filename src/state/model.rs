// src/state/model.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fs::FileStamp;
use crate::types::TargetId;

/// Metadata carried from one build run to the next.
///
/// Serialized as:
///
/// ```json
/// {
///   "recipes": { "a.o": { "deps": ["a.c"] } },
///   "fileids": { "a.c": 1700000000000000000 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildState {
    /// Dependency list each graph node was last successfully resolved with.
    #[serde(default)]
    pub recipes: BTreeMap<TargetId, RecordedRecipe>,

    /// Last observed modification stamp of each visited leaf.
    #[serde(default)]
    pub fileids: BTreeMap<TargetId, FileStamp>,
}

/// The persisted part of a recipe. Actions are not data and are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRecipe {
    pub deps: Vec<TargetId>,
}

impl BuildState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty() && self.fileids.is_empty()
    }

    /// Dependency list recorded for `target`, if any.
    pub fn recorded_deps(&self, target: &str) -> Option<&[TargetId]> {
        self.recipes.get(target).map(|r| r.deps.as_slice())
    }

    /// `true` if `deps` differs from what was recorded for `target`, or if
    /// nothing was recorded.
    pub fn deps_changed(&self, target: &str, deps: &[TargetId]) -> bool {
        self.recorded_deps(target) != Some(deps)
    }

    pub fn record_recipe(&mut self, target: &str, deps: &[TargetId]) {
        self.recipes.insert(
            target.to_string(),
            RecordedRecipe {
                deps: deps.to_vec(),
            },
        );
    }

    /// Drop the record for `target` so its next resolution rebuilds it.
    pub fn forget_recipe(&mut self, target: &str) -> bool {
        self.recipes.remove(target).is_some()
    }

    pub fn file_stamp(&self, target: &str) -> Option<FileStamp> {
        self.fileids.get(target).copied()
    }

    /// Record `stamp` for a leaf, returning the previous one.
    pub fn record_file_stamp(&mut self, target: &str, stamp: FileStamp) -> Option<FileStamp> {
        self.fileids.insert(target.to_string(), stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecorded_target_counts_as_changed() {
        let state = BuildState::new();
        assert!(state.deps_changed("a.o", &["a.c".into()]));
    }

    #[test]
    fn dependency_order_matters() {
        let mut state = BuildState::new();
        state.record_recipe("hw", &["a.o".into(), "b.o".into()]);

        assert!(!state.deps_changed("hw", &["a.o".into(), "b.o".into()]));
        assert!(state.deps_changed("hw", &["b.o".into(), "a.o".into()]));
        assert!(state.deps_changed("hw", &["a.o".into()]));
    }

    #[test]
    fn forget_removes_record() {
        let mut state = BuildState::new();
        state.record_recipe("a.o", &["a.c".into()]);

        assert!(state.forget_recipe("a.o"));
        assert!(!state.forget_recipe("a.o"));
        assert!(state.is_empty());
    }
}
