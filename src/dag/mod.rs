// src/dag/mod.rs

//! Recipe graph, cycle detection and staleness resolution.
//!
//! - [`graph`] holds the caller-supplied mapping from target to [`Recipe`].
//! - [`cycle`] validates that the part of the graph reachable from a target
//!   is acyclic; it must run before anything is built.
//! - [`resolver`] walks dependencies in post-order, decides what is stale
//!   and runs the rebuild actions.

pub mod cycle;
pub mod graph;
pub mod resolver;

pub use cycle::{cycle_check, find_cycle};
pub use graph::{Recipe, RecipeGraph};
pub use resolver::{resolve, Resolver};
