#![allow(dead_code)]

use smake::dag::{Recipe, RecipeGraph};
use smake::fs::mock::MockFileSystem;

use crate::recording_action::{new_log, InvocationLog, Output, RecordingAction};

/// Builder for a `RecipeGraph` whose actions all record into one shared log
/// and produce their outputs in a `MockFileSystem`.
pub struct GraphBuilder {
    fs: MockFileSystem,
    log: InvocationLog,
    graph: RecipeGraph,
}

impl GraphBuilder {
    pub fn new(fs: &MockFileSystem) -> Self {
        Self {
            fs: fs.clone(),
            log: new_log(),
            graph: RecipeGraph::new(),
        }
    }

    /// A recipe whose action succeeds and touches the target.
    pub fn recipe(mut self, target: &str, deps: &[&str]) -> Self {
        let action = RecordingAction::new(self.log.clone(), Output::Mock(self.fs.clone()));
        self.graph
            .insert(target, Recipe::new(deps.iter().copied(), action));
        self
    }

    /// A recipe whose action fails with `exit_code` and produces nothing.
    pub fn failing_recipe(mut self, target: &str, deps: &[&str], exit_code: i32) -> Self {
        let action = RecordingAction::failing(self.log.clone(), exit_code);
        self.graph
            .insert(target, Recipe::new(deps.iter().copied(), action));
        self
    }

    /// A leaf source file that exists in the mock filesystem.
    pub fn source(self, path: &str) -> Self {
        self.fs.add_file(path, format!("// {path}"));
        self
    }

    pub fn log(&self) -> InvocationLog {
        self.log.clone()
    }

    pub fn build(self) -> (RecipeGraph, InvocationLog) {
        (self.graph, self.log)
    }
}
