// src/engine/mod.rs

//! Build driver.
//!
//! Ties together, for one requested target:
//! - the cycle check over the reachable graph
//! - loading the previous build state
//! - dependency resolution and rebuilds
//! - persisting the updated state

pub mod build;

pub use build::{make_thing, make_thing_with, BuildOutcome};
