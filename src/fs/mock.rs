// src/fs/mock.rs

use super::{FileStamp, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct MockFile {
    contents: Vec<u8>,
    modified: FileStamp,
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, MockFile>,
    /// Logical clock; every write or touch advances it so stamps always move.
    clock: u64,
}

impl MockState {
    fn tick(&mut self) -> FileStamp {
        self.clock += 1;
        FileStamp::from_nanos(self.clock)
    }
}

/// In-memory filesystem with a logical modification clock.
///
/// Clones share the same underlying files, so an action closure can hold a
/// clone and "produce" its output while the resolver looks at the original.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        let modified = state.tick();
        state.files.insert(
            path.as_ref().to_path_buf(),
            MockFile {
                contents: content.into(),
                modified,
            },
        );
    }

    /// Bump the modification stamp of `path`, creating an empty file if it
    /// does not exist yet.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        let modified = state.tick();
        state
            .files
            .entry(path.as_ref().to_path_buf())
            .and_modify(|f| f.modified = modified)
            .or_insert(MockFile {
                contents: Vec::new(),
                modified,
            });
    }

    pub fn set_modified(&self, path: impl AsRef<Path>, stamp: FileStamp) {
        let mut state = self.state.lock().unwrap();
        if let Some(file) = state.files.get_mut(path.as_ref()) {
            file.modified = stamp;
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.state.lock().unwrap().files.remove(path.as_ref());
    }

    pub fn stamp_of(&self, path: impl AsRef<Path>) -> Option<FileStamp> {
        let state = self.state.lock().unwrap();
        state.files.get(path.as_ref()).map(|f| f.modified)
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.state.lock().unwrap().files.contains_key(path)
    }

    fn modified(&self, path: &Path) -> Result<Option<FileStamp>> {
        Ok(self.stamp_of(path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.state.lock().unwrap();
        match state.files.get(path) {
            Some(file) => String::from_utf8(file.contents.clone())
                .map_err(|e| anyhow!("Invalid UTF-8: {}", e)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<bool> {
        Ok(self.state.lock().unwrap().files.remove(path).is_some())
    }
}
