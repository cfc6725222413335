// src/state/mod.rs

//! Persisted build state.
//!
//! Responsibilities:
//! - Define the on-disk data model (`model.rs`).
//! - Load and save it as JSON (`store.rs`).
//! - Serialize concurrent runs against the same state file (`lock.rs`).

pub mod lock;
pub mod model;
pub mod store;

pub use lock::StateLock;
pub use model::{BuildState, RecordedRecipe};
pub use store::{load, load_from, save, save_to, DEFAULT_STATE_FILE};
