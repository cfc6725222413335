use smake::dag::{cycle_check, find_cycle, Recipe, RecipeGraph};
use smake::exec::NoopAction;
use smake::fs::mock::MockFileSystem;
use smake::fs::FileSystem;
use smake::types::RecipeStatus;
use smake::{make_thing_with, BuildOutcome};
use smake_test_utils::builders::GraphBuilder;
use smake_test_utils::init_tracing;
use smake_test_utils::recording_action::invoked_targets;

fn noop(deps: &[&str]) -> Recipe {
    Recipe::new(deps.iter().copied(), NoopAction)
}

#[test]
fn diamond_is_not_a_cycle() {
    let graph = RecipeGraph::new()
        .with("top", noop(&["left", "right"]))
        .with("left", noop(&["shared"]))
        .with("right", noop(&["shared"]))
        .with("shared", noop(&["shared.c"]));

    assert!(cycle_check("top", &graph));
}

#[test]
fn two_node_cycle_is_detected() {
    let graph = RecipeGraph::new()
        .with("x", noop(&["y"]))
        .with("y", noop(&["x"]));

    assert!(!cycle_check("x", &graph));
    assert_eq!(find_cycle("y", &graph), Some(vec!["y".into(), "x".into(), "y".into()]));
}

#[test]
fn cycle_unreachable_from_target_is_ignored() {
    let graph = RecipeGraph::new()
        .with("app", noop(&["app.c"]))
        .with("x", noop(&["y"]))
        .with("y", noop(&["x"]));

    assert!(cycle_check("app", &graph));
}

#[test]
fn cycle_behind_a_leaf_sibling_is_found() {
    let graph = RecipeGraph::new()
        .with("all", noop(&["readme.txt", "lib"]))
        .with("lib", noop(&["util"]))
        .with("util", noop(&["lib"]));

    assert!(!cycle_check("all", &graph));
}

#[test]
fn cycle_aborts_build_before_any_action() {
    init_tracing();
    let fs = MockFileSystem::new();
    let (graph, log) = GraphBuilder::new(&fs)
        .source("z.c")
        .recipe("z", &["z.c"])
        .recipe("x", &["z", "y"])
        .recipe("y", &["x"])
        .build();

    let outcome = make_thing_with(&fs, "x", &graph, "recipes.aux".as_ref()).unwrap();

    match outcome {
        BuildOutcome::CycleDetected(cycle) => {
            assert_eq!(cycle.first(), cycle.last());
            assert!(cycle.contains(&"x".to_string()));
        }
        other => panic!("expected CycleDetected, got {:?}", other),
    }
    assert!(invoked_targets(&log).is_empty());
    assert!(!fs.exists("recipes.aux".as_ref()));
}

#[test]
fn leaf_only_build_needs_no_graph() {
    let fs = MockFileSystem::new();
    fs.add_file("notes.txt", "hi");

    let outcome = make_thing_with(&fs, "notes.txt", &RecipeGraph::new(), "s.json".as_ref()).unwrap();
    assert_eq!(outcome, BuildOutcome::Built(RecipeStatus::Changed));
}
