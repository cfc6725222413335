// src/exec/action.rs

use std::fmt::Debug;

use crate::types::{ExitCode, TargetId};

/// A rebuild step for one target.
///
/// Implementations must not panic or return errors across this boundary:
/// anything that prevents the step from running at all is reported as a
/// nonzero exit code (see [`crate::types::EXIT_SPAWN_FAILED`]).
pub trait Action: Debug {
    /// Rebuild `target` from `deps` (the recipe's dependency list, in order).
    fn invoke(&self, target: &str, deps: &[TargetId]) -> ExitCode;

    /// Short human-readable description used in logs.
    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

/// Action that does nothing and always succeeds.
///
/// Useful for phony aggregate targets whose only purpose is to depend on
/// other targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAction;

impl Action for NoopAction {
    fn invoke(&self, _target: &str, _deps: &[TargetId]) -> ExitCode {
        0
    }

    fn describe(&self) -> String {
        "noop".to_string()
    }
}

/// Adapter so plain closures can be used as actions by programmatic callers.
pub struct FnAction<F> {
    name: String,
    func: F,
}

impl<F> FnAction<F>
where
    F: Fn(&str, &[TargetId]) -> ExitCode,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Debug for FnAction<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnAction").field("name", &self.name).finish()
    }
}

impl<F> Action for FnAction<F>
where
    F: Fn(&str, &[TargetId]) -> ExitCode,
{
    fn invoke(&self, target: &str, deps: &[TargetId]) -> ExitCode {
        (self.func)(target, deps)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_action_forwards_arguments() {
        let action = FnAction::new("check", |target: &str, deps: &[TargetId]| {
            if target == "hw" && deps.len() == 2 { 0 } else { 3 }
        });

        assert_eq!(action.invoke("hw", &["a.o".into(), "b.o".into()]), 0);
        assert_eq!(action.invoke("hw", &[]), 3);
        assert_eq!(action.describe(), "check");
    }

    #[test]
    fn noop_always_succeeds() {
        assert_eq!(NoopAction.invoke("all", &["x".into()]), 0);
    }
}
