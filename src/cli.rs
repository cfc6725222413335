// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `smake`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "smake",
    version,
    about = "Rebuild only what is stale, in dependency order.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the recipe file (TOML).
    ///
    /// Default: `SMAKE_FILE`, or `Smakefile.toml` in the current directory.
    #[arg(long, short = 'f', value_name = "PATH", global = true)]
    pub file: Option<PathBuf>,

    /// Build state file; overrides `[config].state_file`.
    #[arg(long, value_name = "PATH", global = true)]
    pub state: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SMAKE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl CliArgs {
    /// The subcommand to run; a bare `smake` builds the default target.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Build { target: None })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Bring a target up to date.
    Build {
        /// Target to build; defaults to `[config].default_target`.
        #[arg(value_name = "TARGET")]
        target: Option<String>,
    },
    /// Delete every file named by a recipe target.
    Clean,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
