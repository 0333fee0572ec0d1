//! Real filesystem storage.
//!
//! Overwrites are atomic: content goes to a hidden temp file in the same
//! directory, is synced, and then renamed over the target. On POSIX,
//! `rename()` replaces the destination atomically when source and target sit
//! on the same filesystem, which they do here by construction.

use super::Storage;
use crate::error::{Result, TurnstileError};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Storage backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStorage;

impl DiskStorage {
    pub fn new() -> Self {
        Self
    }
}

fn storage_err(op: &str, path: &Path, e: std::io::Error) -> TurnstileError {
    TurnstileError::Storage(format!("failed to {} '{}': {}", op, path.display(), e))
}

/// Temp file path in the same directory as the target.
///
/// The pid suffix keeps two processes racing to overwrite the same file from
/// clobbering each other's temp file; the final rename race itself is
/// tolerated by the protocol.
fn temp_path(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| TurnstileError::Storage(format!("invalid path '{}'", target.display())))?;
    Ok(parent.join(format!(".{}.{}.tmp", filename, std::process::id())))
}

impl Storage for DiskStorage {
    fn create_dir_all(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| storage_err("create directory", dir, e))
    }

    fn create_dir(&self, dir: &Path) -> Result<bool> {
        match fs::create_dir(dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(storage_err("create directory", dir, e)),
        }
    }

    fn read(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err("read", path, e)),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let temp = temp_path(path)?;

        let mut file = File::create(&temp).map_err(|e| storage_err("create", &temp, e))?;
        file.write_all(contents.as_bytes()).map_err(|e| {
            let _ = fs::remove_file(&temp);
            storage_err("write", &temp, e)
        })?;
        file.sync_all().map_err(|e| {
            let _ = fs::remove_file(&temp);
            storage_err("sync", &temp, e)
        })?;

        fs::rename(&temp, path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            storage_err("replace", path, e)
        })?;

        // Persist the directory entry as well.
        if let Some(parent) = path.parent()
            && let Ok(dir) = File::open(parent)
        {
            let _ = dir.sync_all();
        }

        Ok(())
    }

    fn touch(&self, path: &Path) -> Result<()> {
        // Rewriting the current bytes refreshes the modification timestamp
        // without a dependency on platform utimes support. The content is a
        // wire contract, so it must come back out unchanged.
        match self.read(path)? {
            Some(contents) => self.write(path, &contents),
            None => Err(TurnstileError::Storage(format!(
                "cannot touch missing file '{}'",
                path.display()
            ))),
        }
    }

    fn age(&self, path: &Path) -> Result<Option<Duration>> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_err("stat", path, e)),
        };
        let modified = metadata
            .modified()
            .map_err(|e| storage_err("read mtime of", path, e))?;
        // A file written "in the future" (clock skew) counts as age zero.
        Ok(Some(modified.elapsed().unwrap_or(Duration::ZERO)))
    }

    fn remove(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_err("remove", path, e)),
        }
    }

    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        let entries = fs::read_dir(dir).map_err(|e| storage_err("list", dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| storage_err("list", dir, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| storage_err("stat entry in", dir, e))?
                .is_file();
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).map_err(|e| storage_err("rename", from, e))
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err("recursively remove", path, e)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
