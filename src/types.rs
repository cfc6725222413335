// src/types.rs

use std::fmt;

/// Identifier of a buildable or checkable thing. Doubles as a filesystem
/// path when the target is a real file.
pub type TargetId = String;

/// Integer status returned by an action. `0` is success.
pub type ExitCode = i32;

/// Sentinel exit code used when an action could not be run at all.
pub const EXIT_SPAWN_FAILED: ExitCode = -1;

/// Outcome of resolving a single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeStatus {
    /// Nothing this target depends on moved since the last run.
    UpToDate,
    /// The target was rebuilt, or (for a leaf) its stamp moved.
    Changed,
    /// The target could not be produced, or a dependency could not.
    FailedToMake,
}

impl RecipeStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, RecipeStatus::FailedToMake)
    }
}

impl fmt::Display for RecipeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecipeStatus::UpToDate => "up-to-date",
            RecipeStatus::Changed => "changed",
            RecipeStatus::FailedToMake => "failed-to-make",
        };
        f.write_str(s)
    }
}
