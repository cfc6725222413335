// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Build outcomes (stale, failed, cyclic) are not errors; they are reported
//! through [`crate::types::RecipeStatus`] and [`crate::engine::BuildOutcome`].
//! `SmakeError` covers the infrastructure around a build: reading the recipe
//! file, loading and saving the state file, and locking it.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmakeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown target: {0}")]
    TargetNotFound(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Malformed build state in {path:?}: {source}")]
    StateFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Build state {0:?} is locked by another smake process")]
    StateLocked(PathBuf),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SmakeError>;
