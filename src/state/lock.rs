// src/state/lock.rs

//! Advisory lock around a state file.
//!
//! A build reads the state once, mutates it while resolving, and writes it
//! back at the end. Two runs against the same file would lose each other's
//! updates, so a run holds `<state file>.lock` exclusively for its whole
//! duration. The lock is released when the guard is dropped.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::errors::{Result, SmakeError};

#[derive(Debug)]
pub struct StateLock {
    file: File,
    path: PathBuf,
}

impl StateLock {
    /// Try to take the lock for `state_path` without blocking.
    ///
    /// Fails with [`SmakeError::StateLocked`] if another process holds it.
    pub fn acquire(state_path: impl AsRef<Path>) -> Result<Self> {
        let path = lock_path_for(state_path.as_ref());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = ?path, "acquired state lock");
                Ok(Self { file, path })
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Err(SmakeError::StateLocked(path)),
            Err(e) => Err(SmakeError::IoError(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!(path = ?self.path, "released state lock");
    }
}

/// `recipes.aux` -> `recipes.aux.lock`
pub fn lock_path_for(state_path: &Path) -> PathBuf {
    let mut name = OsString::from(state_path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
