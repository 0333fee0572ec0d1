//! In-memory storage fake with a virtual clock.
//!
//! Cloning a `MemoryStorage` returns another handle to the same store, the
//! way independent processes share one directory. Time only moves when a
//! test calls `advance`, which makes heartbeat and staleness behavior
//! deterministic without sleeping.

use super::Storage;
use crate::error::{Result, TurnstileError};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone)]
struct FileEntry {
    contents: String,
    written_at: Duration,
}

#[derive(Debug, Default)]
struct Inner {
    now: Duration,
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, FileEntry>,
}

/// Shared-handle in-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the virtual clock; every stored entry ages accordingly.
    pub fn advance(&self, by: Duration) {
        self.lock().now += by;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    fn missing_parent(inner: &Inner, path: &Path) -> bool {
        match path.parent() {
            Some(parent) => !parent.as_os_str().is_empty() && !inner.dirs.contains(parent),
            None => false,
        }
    }
}

impl Storage for MemoryStorage {
    fn create_dir_all(&self, dir: &Path) -> Result<()> {
        let mut inner = self.lock();
        let mut current = PathBuf::new();
        for component in dir.components() {
            current.push(component);
            inner.dirs.insert(current.clone());
        }
        Ok(())
    }

    fn create_dir(&self, dir: &Path) -> Result<bool> {
        let mut inner = self.lock();
        if inner.dirs.contains(dir) {
            return Ok(false);
        }
        if Self::missing_parent(&inner, dir) {
            return Err(TurnstileError::Storage(format!(
                "failed to create directory '{}': no parent",
                dir.display()
            )));
        }
        inner.dirs.insert(dir.to_path_buf());
        Ok(true)
    }

    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.lock().files.get(path).map(|f| f.contents.clone()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let mut inner = self.lock();
        if Self::missing_parent(&inner, path) {
            return Err(TurnstileError::Storage(format!(
                "failed to write '{}': no parent directory",
                path.display()
            )));
        }
        let entry = FileEntry {
            contents: contents.to_string(),
            written_at: inner.now,
        };
        inner.files.insert(path.to_path_buf(), entry);
        Ok(())
    }

    fn touch(&self, path: &Path) -> Result<()> {
        let mut inner = self.lock();
        let now = inner.now;
        match inner.files.get_mut(path) {
            Some(entry) => {
                entry.written_at = now;
                Ok(())
            }
            None => Err(TurnstileError::Storage(format!(
                "cannot touch missing file '{}'",
                path.display()
            ))),
        }
    }

    fn age(&self, path: &Path) -> Result<Option<Duration>> {
        let inner = self.lock();
        Ok(inner
            .files
            .get(path)
            .map(|f| inner.now.saturating_sub(f.written_at)))
    }

    fn remove(&self, path: &Path) -> Result<bool> {
        Ok(self.lock().files.remove(path).is_some())
    }

    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        let inner = self.lock();
        if !inner.dirs.contains(dir) {
            return Err(TurnstileError::Storage(format!(
                "failed to list '{}': no such directory",
                dir.display()
            )));
        }
        // BTreeMap iteration gives the stable listing order the scheduler
        // relies on for determinism.
        Ok(inner
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .filter_map(|name| name.to_str())
            .map(|name| name.to_string())
            .collect())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let mut inner = self.lock();

        if inner.files.contains_key(from) {
            let entry = inner.files.remove(from).expect("checked above");
            inner.files.insert(to.to_path_buf(), entry);
            return Ok(());
        }

        if !inner.dirs.contains(from) {
            return Err(TurnstileError::Storage(format!(
                "failed to rename '{}': no such entry",
                from.display()
            )));
        }
        if inner.dirs.contains(to) || inner.files.contains_key(to) {
            return Err(TurnstileError::Storage(format!(
                "failed to rename '{}' to '{}': destination exists",
                from.display(),
                to.display()
            )));
        }

        let remap = |path: &PathBuf| -> PathBuf {
            match path.strip_prefix(from) {
                Ok(rest) => to.join(rest),
                Err(_) => path.clone(),
            }
        };
        let dirs: BTreeSet<PathBuf> = inner.dirs.iter().map(|path| remap(path)).collect();
        let files: BTreeMap<PathBuf, FileEntry> = inner
            .files
            .iter()
            .map(|(path, entry)| (remap(path), entry.clone()))
            .collect();
        inner.dirs = dirs;
        inner.files = files;
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        let mut inner = self.lock();
        inner.dirs.retain(|dir| !dir.starts_with(path));
        inner.files.retain(|file, _| !file.starts_with(path));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.lock();
        inner.dirs.contains(path) || inner.files.contains_key(path)
    }
}
