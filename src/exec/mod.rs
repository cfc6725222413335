// src/exec/mod.rs

//! Action execution layer.
//!
//! The resolver never looks inside an action; it hands the target and its
//! dependency list to [`invoke`] and reads back an integer exit code.
//!
//! - [`action`] defines the [`Action`] capability trait, the no-op action
//!   and a closure adapter.
//! - [`command`] holds the concrete kinds backed by OS processes
//!   (compile, link, shell).
//! - [`invoker`] is the boundary the resolver calls.

pub mod action;
pub mod command;
pub mod invoker;

pub use action::{Action, NoopAction};
pub use command::{CompileAction, LinkAction, ShellAction};
pub use invoker::invoke;
