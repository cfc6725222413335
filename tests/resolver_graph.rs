use std::path::Path;

use smake::dag::{Recipe, RecipeGraph, Resolver};
use smake::exec::action::FnAction;
use smake::fs::mock::MockFileSystem;
use smake::fs::FileSystem;
use smake::state::BuildState;
use smake::types::{RecipeStatus, TargetId};
use smake_test_utils::builders::GraphBuilder;
use smake_test_utils::init_tracing;
use smake_test_utils::recording_action::{invocations_of, invoked_targets};

fn resolve(graph: &RecipeGraph, fs: &MockFileSystem, state: &mut BuildState, target: &str) -> RecipeStatus {
    Resolver::new(graph, fs, state).resolve(target)
}

#[test]
fn object_from_source_builds_once_then_is_up_to_date() {
    init_tracing();
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("a.c")
        .recipe("a.o", &["a.c"])
        .build();
    let mut state = BuildState::new();

    assert_eq!(resolve(&graph, &fs, &mut state, "a.o"), RecipeStatus::Changed);
    assert_eq!(invoked_targets(&log), vec!["a.o"]);
    assert!(fs.exists(Path::new("a.o")));

    assert_eq!(resolve(&graph, &fs, &mut state, "a.o"), RecipeStatus::UpToDate);
    assert_eq!(invocations_of(&log, "a.o"), 1);
}

#[test]
fn action_receives_target_and_ordered_deps() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("main.o")
        .source("b.o")
        .recipe("hw", &["main.o", "b.o"])
        .build();
    let mut state = BuildState::new();

    resolve(&graph, &fs, &mut state, "hw");

    let calls = log.lock().unwrap().clone();
    assert_eq!(calls, vec![("hw".to_string(), vec!["main.o".to_string(), "b.o".to_string()])]);
}

#[test]
fn missing_output_forces_rebuild() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("a.c")
        .recipe("a.o", &["a.c"])
        .build();
    let mut state = BuildState::new();
    resolve(&graph, &fs, &mut state, "a.o");

    fs.remove("a.o");
    assert_eq!(resolve(&graph, &fs, &mut state, "a.o"), RecipeStatus::Changed);
    assert_eq!(invocations_of(&log, "a.o"), 2);
}

#[test]
fn changed_dependency_list_forces_rebuild() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("a.c")
        .source("a.h")
        .recipe("a.o", &["a.c"])
        .build();
    let mut state = BuildState::new();
    resolve(&graph, &fs, &mut state, "a.o");
    resolve(&graph, &fs, &mut state, "a.h");

    // Same sources on disk, but a.o now also declares the header.
    let (graph, log2) = GraphBuilder::new(&fs).recipe("a.o", &["a.c", "a.h"]).build();
    assert_eq!(resolve(&graph, &fs, &mut state, "a.o"), RecipeStatus::Changed);
    assert_eq!(invocations_of(&log, "a.o"), 1);
    assert_eq!(invocations_of(&log2, "a.o"), 1);
    assert_eq!(
        state.recorded_deps("a.o"),
        Some(&["a.c".to_string(), "a.h".to_string()][..])
    );
}

#[test]
fn no_prior_record_forces_rebuild_even_if_output_exists() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("a.c")
        .source("a.o")
        .recipe("a.o", &["a.c"])
        .build();
    let mut state = BuildState::new();
    state.record_file_stamp("a.c", fs.stamp_of("a.c").unwrap());

    assert_eq!(resolve(&graph, &fs, &mut state, "a.o"), RecipeStatus::Changed);
    assert_eq!(invocations_of(&log, "a.o"), 1);
}

#[test]
fn changed_source_propagates_to_every_dependent() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("a.c")
        .source("b.c")
        .recipe("a.o", &["a.c"])
        .recipe("b.o", &["b.c"])
        .recipe("hw", &["a.o", "b.o"])
        .build();
    let mut state = BuildState::new();
    resolve(&graph, &fs, &mut state, "hw");
    log.lock().unwrap().clear();

    fs.touch("b.c");
    assert_eq!(resolve(&graph, &fs, &mut state, "hw"), RecipeStatus::Changed);
    assert_eq!(invoked_targets(&log), vec!["b.o", "hw"]);
}

#[test]
fn everything_up_to_date_invokes_nothing() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("a.c")
        .source("b.c")
        .recipe("a.o", &["a.c"])
        .recipe("b.o", &["b.c"])
        .recipe("hw", &["a.o", "b.o"])
        .build();
    let mut state = BuildState::new();
    resolve(&graph, &fs, &mut state, "hw");
    log.lock().unwrap().clear();

    assert_eq!(resolve(&graph, &fs, &mut state, "hw"), RecipeStatus::UpToDate);
    assert!(invoked_targets(&log).is_empty());
}

#[test]
fn dependencies_build_before_dependents() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("main.c")
        .source("b.c")
        .recipe("main.o", &["main.c"])
        .recipe("b.o", &["b.c"])
        .recipe("hw", &["main.o", "b.o"])
        .build();
    let mut state = BuildState::new();

    resolve(&graph, &fs, &mut state, "hw");
    assert_eq!(invoked_targets(&log), vec!["main.o", "b.o", "hw"]);
}

#[test]
fn failed_dependency_stops_siblings_and_dependent() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("a.c")
        .source("c.c")
        .recipe("a.o", &["a.c"])
        .failing_recipe("b.o", &["b.c"], 1)
        .recipe("c.o", &["c.c"])
        .recipe("hw", &["a.o", "b.o", "c.o"])
        .build();
    let mut state = BuildState::new();

    // b.c does not exist: b.o fails without running its action.
    assert_eq!(resolve(&graph, &fs, &mut state, "hw"), RecipeStatus::FailedToMake);
    assert_eq!(invoked_targets(&log), vec!["a.o"]);
    // c.o is listed after the failure and must not have been looked at.
    assert!(state.file_stamp("c.c").is_none());
    assert!(state.recorded_deps("hw").is_none());
    assert!(state.recorded_deps("b.o").is_none());
    assert!(state.recorded_deps("a.o").is_some());
}

#[test]
fn failing_action_fails_target_and_dependents() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("a.c")
        .failing_recipe("a.o", &["a.c"], 2)
        .recipe("hw", &["a.o"])
        .build();
    let mut state = BuildState::new();

    assert_eq!(resolve(&graph, &fs, &mut state, "hw"), RecipeStatus::FailedToMake);
    assert_eq!(invoked_targets(&log), vec!["a.o"]);
    assert!(!fs.exists(Path::new("hw")));
}

#[test]
fn failed_target_is_retried_next_time() {
    let fs = MockFileSystem::new();
    let (graph, _) = GraphBuilder::new(&fs)
        .source("a.c")
        .failing_recipe("a.o", &["a.c"], 1)
        .build();
    let mut state = BuildState::new();
    resolve(&graph, &fs, &mut state, "a.o");

    // Fix the "compiler"; the source stamp is already recorded, but the
    // failed target has no record and is rebuilt.
    fs.touch("a.o");
    let (graph, log) = GraphBuilder::new(&fs).recipe("a.o", &["a.c"]).build();
    assert_eq!(resolve(&graph, &fs, &mut state, "a.o"), RecipeStatus::Changed);
    assert_eq!(invocations_of(&log, "a.o"), 1);
}

#[test]
fn diamond_runs_shared_action_once() {
    init_tracing();
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("shared.c")
        .recipe("shared", &["shared.c"])
        .recipe("left", &["shared"])
        .recipe("right", &["shared"])
        .recipe("top", &["left", "right"])
        .build();
    let mut state = BuildState::new();
    resolve(&graph, &fs, &mut state, "top");
    log.lock().unwrap().clear();

    fs.touch("shared.c");
    assert_eq!(resolve(&graph, &fs, &mut state, "top"), RecipeStatus::Changed);

    assert_eq!(invocations_of(&log, "shared"), 1);
    // Both branches still see the change.
    assert_eq!(invoked_targets(&log), vec!["shared", "left", "right", "top"]);
}

#[test]
fn diamond_over_a_leaf_rebuilds_both_branches() {
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("config.h")
        .recipe("left.o", &["config.h"])
        .recipe("right.o", &["config.h"])
        .recipe("app", &["left.o", "right.o"])
        .build();
    let mut state = BuildState::new();
    resolve(&graph, &fs, &mut state, "app");
    log.lock().unwrap().clear();

    fs.touch("config.h");
    resolve(&graph, &fs, &mut state, "app");

    assert_eq!(invoked_targets(&log), vec!["left.o", "right.o", "app"]);
}

#[test]
fn closure_actions_work_as_recipes() {
    let fs = MockFileSystem::new();
    fs.add_file("in.txt", "data");
    let producer = fs.clone();
    let graph = RecipeGraph::new().with(
        "out.txt",
        Recipe::new(
            ["in.txt"],
            FnAction::new("copy", move |target: &str, deps: &[TargetId]| {
                let Ok(contents) = producer.read_to_string(Path::new(&deps[0])) else {
                    return 1;
                };
                match producer.write(Path::new(target), contents.as_bytes()) {
                    Ok(()) => 0,
                    Err(_) => 1,
                }
            }),
        ),
    );
    let mut state = BuildState::new();

    assert_eq!(resolve(&graph, &fs, &mut state, "out.txt"), RecipeStatus::Changed);
    assert_eq!(fs.read_to_string(Path::new("out.txt")).unwrap(), "data");
}
