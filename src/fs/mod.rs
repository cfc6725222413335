// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

pub mod mock;

/// Modification stamp of a file, in nanoseconds since the Unix epoch.
///
/// Stored in the `fileids` table of the build state, so the only operation
/// that matters is equality. Written as an integer number of nanoseconds.
/// On load a floating-point number is read as seconds, which is how other
/// tools record `st_mtime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FileStamp(u64);

impl FileStamp {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }

    /// Times before the epoch collapse to zero; times past `u64::MAX`
    /// nanoseconds saturate.
    pub fn from_system_time(time: SystemTime) -> Self {
        let nanos = time
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Self(nanos)
    }
}

impl<'de> Deserialize<'de> for FileStamp {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StampVisitor;

        impl<'de> Visitor<'de> for StampVisitor {
            type Value = FileStamp;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("integer nanoseconds or fractional seconds since the Unix epoch")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<FileStamp, E> {
                Ok(FileStamp(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<FileStamp, E> {
                Ok(FileStamp(u64::try_from(v).unwrap_or(0)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<FileStamp, E> {
                if !v.is_finite() {
                    return Err(E::custom(format!("timestamp {v} is not finite")));
                }
                // `as` saturates: negative seconds become 0.
                Ok(FileStamp((v * 1e9).round() as u64))
            }
        }

        deserializer.deserialize_any(StampVisitor)
    }
}

/// Abstract filesystem interface.
///
/// The resolver only ever asks "does it exist" and "when was it last
/// modified"; the state store and `clean` need read, write and remove.
pub trait FileSystem: Debug {
    fn exists(&self, path: &Path) -> bool;

    /// Modification stamp of `path`, or `None` if nothing is there.
    fn modified(&self, path: &Path) -> Result<Option<FileStamp>>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Create or truncate `path`, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Remove a file. Returns `false` if there was nothing to remove.
    fn remove_file(&self, path: &Path) -> Result<bool>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn modified(&self, path: &Path) -> Result<Option<FileStamp>> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading metadata of {:?}", path));
            }
        };
        let mtime = metadata
            .modified()
            .with_context(|| format!("reading modification time of {:?}", path))?;
        Ok(Some(FileStamp::from_system_time(mtime)))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
            }
        }
        let mut file =
            fs::File::create(path).with_context(|| format!("creating file {:?}", path))?;
        file.write_all(contents)
            .with_context(|| format!("writing to file {:?}", path))?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("removing file {:?}", path)),
        }
    }
}
