use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use smake::exec::Action;
use smake::fs::mock::MockFileSystem;
use smake::types::{ExitCode, TargetId};

/// Where a successful [`RecordingAction`] "produces" its target.
#[derive(Debug, Clone)]
pub enum Output {
    /// Nothing is written; the target stays absent.
    None,
    /// Touch the target in an in-memory filesystem.
    Mock(MockFileSystem),
    /// Write the target as a real file under this directory.
    Dir(PathBuf),
}

/// Shared log of `(target, deps)` pairs, in invocation order.
pub type InvocationLog = Arc<Mutex<Vec<(TargetId, Vec<TargetId>)>>>;

/// An action that:
/// - records every invocation into a shared log
/// - produces its target (see [`Output`]) and returns `exit_code`
#[derive(Debug, Clone)]
pub struct RecordingAction {
    log: InvocationLog,
    output: Output,
    exit_code: ExitCode,
}

impl RecordingAction {
    pub fn new(log: InvocationLog, output: Output) -> Self {
        Self {
            log,
            output,
            exit_code: 0,
        }
    }

    /// A failing action never produces its target.
    pub fn failing(log: InvocationLog, exit_code: ExitCode) -> Self {
        Self {
            log,
            output: Output::None,
            exit_code,
        }
    }
}

impl Action for RecordingAction {
    fn invoke(&self, target: &str, deps: &[TargetId]) -> ExitCode {
        self.log
            .lock()
            .unwrap()
            .push((target.to_string(), deps.to_vec()));

        if self.exit_code != 0 {
            return self.exit_code;
        }

        match &self.output {
            Output::None => {}
            Output::Mock(fs) => fs.touch(target),
            Output::Dir(dir) => {
                let path = dir.join(Path::new(target));
                if std::fs::write(&path, target.as_bytes()).is_err() {
                    return 1;
                }
            }
        }
        0
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

pub fn new_log() -> InvocationLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Targets invoked so far, in order.
pub fn invoked_targets(log: &InvocationLog) -> Vec<TargetId> {
    log.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
}

/// How many times `target` was invoked.
pub fn invocations_of(log: &InvocationLog, target: &str) -> usize {
    log.lock().unwrap().iter().filter(|(t, _)| t == target).count()
}
