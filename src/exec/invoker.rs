// src/exec/invoker.rs

use tracing::{info, warn};

use crate::dag::graph::Recipe;
use crate::types::ExitCode;

/// Hand a stale target's action its target and dependency list and return
/// the action's exit code.
///
/// This is the only place the resolver touches an action; it treats the
/// returned integer as the sole signal of success (`0`).
pub fn invoke(target: &str, recipe: &Recipe) -> ExitCode {
    info!(
        node = %target,
        action = %recipe.action.describe(),
        "rebuilding target"
    );

    let code = recipe.action.invoke(target, &recipe.deps);
    if code != 0 {
        warn!(node = %target, exit_code = code, "action failed");
    }
    code
}
