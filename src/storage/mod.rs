//! Storage layer for shared coordination state.
//!
//! The arena directory is process-wide mutable state, so it is modeled as an
//! explicit interface rather than scattered `std::fs` calls: the protocol
//! only ever creates directories, overwrites whole files, refreshes
//! timestamps, lists, renames, and deletes. `DiskStorage` is the real thing;
//! `MemoryStorage` is a shared-handle fake with a virtual clock so election,
//! scheduling, and staleness can be tested deterministically.

mod disk;
mod memory;

#[cfg(test)]
mod tests;

pub use disk::DiskStorage;
pub use memory::MemoryStorage;

use crate::error::Result;
use std::path::Path;
use std::time::Duration;

/// Keyed-path storage for all shared coordination state.
///
/// Writes are whole-file overwrites; the file is the unit of atomicity.
/// There is no compare-and-swap. Concurrent overwrites of the same file are
/// possible during the bootstrap race window and are tolerated by the
/// protocol, not prevented here.
pub trait Storage {
    /// Create `dir` and any missing parents. Existing directories are fine.
    fn create_dir_all(&self, dir: &Path) -> Result<()>;

    /// Create `dir` exclusively. Returns `false` without error if it already
    /// exists, meaning the caller lost a creation race and should defer.
    fn create_dir(&self, dir: &Path) -> Result<bool>;

    /// Full contents of `path`, or `None` if it does not exist.
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// Atomically overwrite `path` with `contents`.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Refresh `path`'s modification timestamp without changing its bytes.
    fn touch(&self, path: &Path) -> Result<()>;

    /// Time since `path` was last written or touched, or `None` if absent.
    fn age(&self, path: &Path) -> Result<Option<Duration>>;

    /// Remove a file. Returns `false` without error if it was already gone.
    fn remove(&self, path: &Path) -> Result<bool>;

    /// Names of the files directly inside `dir`, in a stable order.
    fn list(&self, dir: &Path) -> Result<Vec<String>>;

    /// Rename `from` to `to`; works for directories as well as files.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Recursively delete `path`. Absent paths are fine.
    fn remove_all(&self, path: &Path) -> Result<()>;

    /// Whether `path` exists at all.
    fn exists(&self, path: &Path) -> bool;
}
