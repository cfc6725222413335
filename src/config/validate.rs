// src/config/validate.rs

use crate::config::model::{ActionConfig, ConfigFile, RawConfigFile};
use crate::errors::{Result, SmakeError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SmakeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.recipe))
    }
}

/// Checks:
/// - there is at least one recipe
/// - `[config]` values are usable
/// - target and dependency names are non-empty
/// - actions are complete (shell commands non-empty, compile has a source)
///
/// Cycles are deliberately left to the build itself, which checks the part
/// of the graph reachable from the requested target.
fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_recipes(cfg)?;
    validate_global_config(cfg)?;
    validate_recipes(cfg)?;
    Ok(())
}

fn ensure_has_recipes(cfg: &RawConfigFile) -> Result<()> {
    if cfg.recipe.is_empty() {
        return Err(SmakeError::ConfigError(
            "recipe file must contain at least one [recipe.<target>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.state_file.trim().is_empty() {
        return Err(SmakeError::ConfigError(
            "[config].state_file must not be empty".to_string(),
        ));
    }

    if let Some(ref target) = cfg.config.default_target {
        if !cfg.recipe.contains_key(target) {
            return Err(SmakeError::TargetNotFound(format!(
                "[config].default_target '{}' has no recipe",
                target
            )));
        }
    }

    Ok(())
}

fn validate_recipes(cfg: &RawConfigFile) -> Result<()> {
    for (name, recipe) in cfg.recipe.iter() {
        if name.trim().is_empty() {
            return Err(SmakeError::ConfigError(
                "recipe target names must not be empty".to_string(),
            ));
        }

        if recipe.deps.iter().any(|d| d.trim().is_empty()) {
            return Err(SmakeError::ConfigError(format!(
                "recipe '{}' has an empty dependency name in `deps`",
                name
            )));
        }

        match &recipe.action {
            ActionConfig::Shell { cmd } if cmd.trim().is_empty() => {
                return Err(SmakeError::ConfigError(format!(
                    "recipe '{}' has an empty shell `cmd`",
                    name
                )));
            }
            ActionConfig::Compile { .. } if recipe.deps.is_empty() => {
                return Err(SmakeError::ConfigError(format!(
                    "recipe '{}' compiles its first dependency but has no `deps`",
                    name
                )));
            }
            _ => {}
        }
    }
    Ok(())
}
