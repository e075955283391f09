//! Whole-file write lock for the record store.
//!
//! The store is rewritten in full on every save, so writers are serialized
//! with an exclusive advisory lock on a sibling `<store>.lock` file. The lock
//! is released when the [`StoreLock`] is dropped.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{Result, StoreError};

#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Lock file path for a store: the store's file name with `.lock` appended.
    pub fn lock_path(store_path: &Path) -> PathBuf {
        let mut name = store_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("store"));
        name.push(".lock");
        store_path.with_file_name(name)
    }

    /// Take the exclusive lock without waiting.
    ///
    /// Fails with [`StoreError::Locked`] if another writer holds it.
    pub fn acquire(store_path: &Path) -> Result<Self> {
        let path = Self::lock_path(store_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| StoreError::Io {
                operation: "open lock file",
                path: path.clone(),
                source,
            })?;
        match file.try_lock_exclusive() {
            Ok(()) => {}
            Err(err) if err.kind() == fs2::lock_contended_error().kind() => {
                return Err(StoreError::Locked { path });
            }
            Err(source) => {
                return Err(StoreError::Io {
                    operation: "lock",
                    path,
                    source,
                });
            }
        }
        debug!(path = %path.display(), "store lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            debug!(path = %self.path.display(), error = %err, "failed to release store lock");
        }
    }
}
