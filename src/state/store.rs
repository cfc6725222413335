// src/state/store.rs

use std::path::Path;

use tracing::{debug, info};

use crate::errors::{Result, SmakeError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::state::model::BuildState;

/// State file used when the caller does not name one.
pub const DEFAULT_STATE_FILE: &str = "recipes.aux";

/// Load the build state from `path` on the real filesystem.
///
/// A missing file yields an empty state.
pub fn load(path: impl AsRef<Path>) -> Result<BuildState> {
    load_from(&RealFileSystem, path.as_ref())
}

/// Save the build state to `path` on the real filesystem, overwriting it.
pub fn save(path: impl AsRef<Path>, state: &BuildState) -> Result<()> {
    save_to(&RealFileSystem, path.as_ref(), state)
}

pub fn load_from(fs: &dyn FileSystem, path: &Path) -> Result<BuildState> {
    if !fs.exists(path) {
        debug!(path = ?path, "no build state on disk; starting empty");
        return Ok(BuildState::new());
    }

    let contents = fs.read_to_string(path)?;
    let state: BuildState =
        serde_json::from_str(&contents).map_err(|source| SmakeError::StateFormat {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        path = ?path,
        recipes = state.recipes.len(),
        fileids = state.fileids.len(),
        "loaded build state"
    );
    Ok(state)
}

pub fn save_to(fs: &dyn FileSystem, path: &Path, state: &BuildState) -> Result<()> {
    let json = serde_json::to_string_pretty(state).map_err(|source| SmakeError::StateFormat {
        path: path.to_path_buf(),
        source,
    })?;
    fs.write(path, json.as_bytes())?;

    info!(
        path = ?path,
        recipes = state.recipes.len(),
        fileids = state.fileids.len(),
        "stored build state"
    );
    Ok(())
}
