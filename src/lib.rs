// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod state;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, Command};
use crate::config::{default_config_path, load_and_validate, ConfigFile};
use crate::fs::{FileSystem, RealFileSystem};

pub use crate::dag::{cycle_check, resolve, Recipe, RecipeGraph};
pub use crate::engine::{make_thing, make_thing_with, BuildOutcome};
pub use crate::exec::Action;
pub use crate::types::{RecipeStatus, TargetId};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - recipe file loading
/// - the `build` / `clean` subcommands
/// - the engine's `make_thing`
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = args.file.clone().unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading recipe file {:?}", config_path))?;
    debug!(path = ?config_path, recipes = cfg.recipe.len(), "recipe file loaded");

    match args.command() {
        Command::Clean => {
            let removed = clean(&RealFileSystem, cfg.targets());
            info!(removed, "clean finished");
            Ok(())
        }
        Command::Build { target } => {
            let target = resolve_target(target, &cfg)?;
            let state_path = args
                .state
                .clone()
                .unwrap_or_else(|| PathBuf::from(&cfg.config.state_file));
            build(&target, &cfg, &state_path)
        }
    }
}

fn resolve_target(cli_target: Option<String>, cfg: &ConfigFile) -> Result<String> {
    cli_target
        .or_else(|| cfg.config.default_target.clone())
        .ok_or_else(|| anyhow!("no target given and [config].default_target is not set"))
}

fn build(target: &str, cfg: &ConfigFile, state_path: &Path) -> Result<()> {
    let graph = cfg.recipe_graph();
    info!(node = %target, state = ?state_path, "building");

    if make_thing(target, &graph, Some(state_path)) {
        Ok(())
    } else {
        Err(anyhow!("failed to make '{}'", target))
    }
}

/// Remove every file named by `targets`, ignoring ones that are already
/// gone. Returns how many files were removed.
///
/// Removal errors are logged and skipped so one unwritable file does not
/// stop the rest from being cleaned.
pub fn clean<'a>(fs: &dyn FileSystem, targets: impl IntoIterator<Item = &'a str>) -> usize {
    let mut removed = 0;
    for target in targets {
        match fs.remove_file(Path::new(target)) {
            Ok(true) => {
                info!(node = %target, "removed");
                removed += 1;
            }
            Ok(false) => debug!(node = %target, "nothing to remove"),
            Err(err) => warn!(node = %target, error = %err, "could not remove"),
        }
    }
    removed
}
