// src/config/mod.rs

//! Recipe file loading and validation for the `smake` front end.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a recipe file from disk (`loader.rs`).
//! - Validate basic invariants before anything is built (`validate.rs`).
//!
//! The engine itself never reads this file; it only sees the
//! [`crate::dag::RecipeGraph`] produced by [`ConfigFile::recipe_graph`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, DEFAULT_RECIPE_FILE};
pub use model::{ActionConfig, ConfigFile, ConfigSection, RawConfigFile, RecipeConfig};
