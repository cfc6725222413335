// src/exec/command.rs

use std::process::Command;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::exec::action::Action;
use crate::types::{ExitCode, TargetId, EXIT_SPAWN_FAILED};

/// Default compiler / linker driver.
pub const DEFAULT_COMPILER: &str = "gcc";

/// Default flags passed to [`CompileAction`].
pub const DEFAULT_COMPILE_FLAGS: &[&str] = &["-Wall", "-Wextra", "-g"];

/// Compile the first dependency into the target object file:
/// `<compiler> <deps[0]> -c -o <target> <flags...>`.
#[derive(Debug, Clone)]
pub struct CompileAction {
    pub compiler: String,
    pub flags: Vec<String>,
}

impl Default for CompileAction {
    fn default() -> Self {
        Self {
            compiler: DEFAULT_COMPILER.to_string(),
            flags: DEFAULT_COMPILE_FLAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CompileAction {
    /// The compiler invocation for `target`, or `None` without a source.
    pub fn command(&self, target: &str, deps: &[TargetId]) -> Option<Command> {
        let source = deps.first()?;
        let mut cmd = Command::new(&self.compiler);
        cmd.arg(source)
            .arg("-c")
            .arg("-o")
            .arg(target)
            .args(&self.flags);
        Some(cmd)
    }
}

impl Action for CompileAction {
    fn invoke(&self, target: &str, deps: &[TargetId]) -> ExitCode {
        let Some(cmd) = self.command(target, deps) else {
            error!(node = %target, "compile action needs a source file as its first dependency");
            return EXIT_SPAWN_FAILED;
        };
        run_command(target, cmd)
    }

    fn describe(&self) -> String {
        format!("compile with {}", self.compiler)
    }
}

/// Link all dependencies into the target: `<linker> <deps...> -o <target>`.
#[derive(Debug, Clone)]
pub struct LinkAction {
    pub linker: String,
    pub flags: Vec<String>,
}

impl Default for LinkAction {
    fn default() -> Self {
        Self {
            linker: DEFAULT_COMPILER.to_string(),
            flags: Vec::new(),
        }
    }
}

impl Action for LinkAction {
    fn invoke(&self, target: &str, deps: &[TargetId]) -> ExitCode {
        let mut cmd = Command::new(&self.linker);
        cmd.args(deps).arg("-o").arg(target).args(&self.flags);
        run_command(target, cmd)
    }

    fn describe(&self) -> String {
        format!("link with {}", self.linker)
    }
}

/// Run an arbitrary shell command line.
///
/// The target and its space-separated dependencies are exported as the
/// `TARGET` and `DEPS` environment variables.
#[derive(Debug, Clone)]
pub struct ShellAction {
    pub cmd: String,
}

impl ShellAction {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }
}

impl Action for ShellAction {
    fn invoke(&self, target: &str, deps: &[TargetId]) -> ExitCode {
        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };
        cmd.env("TARGET", target).env("DEPS", deps.join(" "));
        run_command(target, cmd)
    }

    fn describe(&self) -> String {
        format!("sh: {}", self.cmd)
    }
}

/// Run a prepared command to completion and map its status to an exit code.
///
/// Spawn errors and signal terminations become [`EXIT_SPAWN_FAILED`]; they
/// are logged here so nothing but the integer crosses the action boundary.
fn run_command(target: &str, cmd: Command) -> ExitCode {
    match run_command_inner(target, cmd) {
        Ok(code) => code,
        Err(err) => {
            error!(node = %target, error = %err, "action execution error");
            EXIT_SPAWN_FAILED
        }
    }
}

fn run_command_inner(target: &str, mut cmd: Command) -> Result<ExitCode> {
    info!(node = %target, command = ?cmd, "running action");

    let status = cmd
        .status()
        .with_context(|| format!("spawning process for target '{}'", target))?;

    let code = status.code().unwrap_or(EXIT_SPAWN_FAILED);
    debug!(
        node = %target,
        exit_code = code,
        success = status.success(),
        "action process exited"
    );

    if status.success() { Ok(0) } else { Ok(code) }
}
