//! Tests for the storage layer, against both implementations.

use super::*;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// DiskStorage
// ---------------------------------------------------------------------------

#[test]
fn disk_write_and_read_back() {
    let temp = TempDir::new().unwrap();
    let storage = DiskStorage::new();
    let path = temp.path().join("record");

    storage.write(&path, "WAITING").unwrap();
    assert_eq!(storage.read(&path).unwrap(), Some("WAITING".to_string()));

    storage.write(&path, "READY_TO_RUN").unwrap();
    assert_eq!(
        storage.read(&path).unwrap(),
        Some("READY_TO_RUN".to_string())
    );
}

#[test]
fn disk_read_missing_is_none() {
    let temp = TempDir::new().unwrap();
    let storage = DiskStorage::new();
    assert_eq!(storage.read(&temp.path().join("absent")).unwrap(), None);
}

#[test]
fn disk_write_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let storage = DiskStorage::new();
    storage.write(&temp.path().join("record"), "ACTIVE").unwrap();

    assert_eq!(storage.list(temp.path()).unwrap(), vec!["record"]);
}

#[test]
fn disk_create_dir_reports_loser() {
    let temp = TempDir::new().unwrap();
    let storage = DiskStorage::new();
    let dir = temp.path().join("arena");

    assert!(storage.create_dir(&dir).unwrap());
    assert!(!storage.create_dir(&dir).unwrap());
}

#[test]
fn disk_remove_missing_is_false() {
    let temp = TempDir::new().unwrap();
    let storage = DiskStorage::new();

    let path = temp.path().join("record");
    storage.write(&path, "WAITING").unwrap();
    assert!(storage.remove(&path).unwrap());
    assert!(!storage.remove(&path).unwrap());
}

#[test]
fn disk_list_skips_directories() {
    let temp = TempDir::new().unwrap();
    let storage = DiskStorage::new();

    storage.write(&temp.path().join("master"), "123").unwrap();
    storage.create_dir(&temp.path().join("subdir")).unwrap();

    assert_eq!(storage.list(temp.path()).unwrap(), vec!["master"]);
}

#[test]
fn disk_rename_then_remove_all() {
    let temp = TempDir::new().unwrap();
    let storage = DiskStorage::new();
    let dir = temp.path().join("arena");
    let aside = temp.path().join("arena.stale.1");

    storage.create_dir(&dir).unwrap();
    storage.write(&dir.join("master"), "123").unwrap();

    storage.rename(&dir, &aside).unwrap();
    assert!(!storage.exists(&dir));
    assert!(storage.exists(&aside.join("master")));

    storage.remove_all(&aside).unwrap();
    assert!(!storage.exists(&aside));

    // Removing an absent tree is fine.
    storage.remove_all(&aside).unwrap();
}

#[test]
fn disk_touch_refreshes_age_and_keeps_bytes() {
    let temp = TempDir::new().unwrap();
    let storage = DiskStorage::new();
    let path = temp.path().join("master");

    storage.write(&path, "4242").unwrap();
    std::thread::sleep(Duration::from_millis(50));
    let before = storage.age(&path).unwrap().unwrap();
    assert!(before >= Duration::from_millis(40));

    storage.touch(&path).unwrap();
    let after = storage.age(&path).unwrap().unwrap();
    assert!(after < before);
    assert_eq!(storage.read(&path).unwrap(), Some("4242".to_string()));
}

#[test]
fn disk_age_of_missing_is_none() {
    let temp = TempDir::new().unwrap();
    let storage = DiskStorage::new();
    assert_eq!(storage.age(&temp.path().join("absent")).unwrap(), None);
    assert!(storage.touch(&temp.path().join("absent")).is_err());
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

fn mem_with_dir(dir: &str) -> MemoryStorage {
    let storage = MemoryStorage::new();
    storage.create_dir_all(Path::new(dir)).unwrap();
    storage
}

#[test]
fn memory_clone_shares_state() {
    let a = mem_with_dir("/arena");
    let b = a.clone();

    a.write(Path::new("/arena/master"), "1").unwrap();
    assert_eq!(
        b.read(Path::new("/arena/master")).unwrap(),
        Some("1".to_string())
    );
}

#[test]
fn memory_virtual_clock_ages_entries() {
    let storage = mem_with_dir("/arena");
    let path = Path::new("/arena/master");

    storage.write(path, "1").unwrap();
    assert_eq!(storage.age(path).unwrap(), Some(Duration::ZERO));

    storage.advance(Duration::from_secs(10));
    assert_eq!(storage.age(path).unwrap(), Some(Duration::from_secs(10)));

    storage.touch(path).unwrap();
    assert_eq!(storage.age(path).unwrap(), Some(Duration::ZERO));
    assert_eq!(storage.read(path).unwrap(), Some("1".to_string()));
}

#[test]
fn memory_create_dir_semantics() {
    let storage = mem_with_dir("/root");
    assert!(storage.create_dir(Path::new("/root/arena")).unwrap());
    assert!(!storage.create_dir(Path::new("/root/arena")).unwrap());
    assert!(storage.create_dir(Path::new("/nowhere/arena")).is_err());
}

#[test]
fn memory_write_requires_parent_dir() {
    let storage = MemoryStorage::new();
    assert!(storage.write(Path::new("/gone/record"), "WAITING").is_err());
}

#[test]
fn memory_list_is_sorted_and_scoped() {
    let storage = mem_with_dir("/arena");
    storage.create_dir_all(Path::new("/other")).unwrap();
    storage.write(Path::new("/arena/30"), "WAITING").unwrap();
    storage.write(Path::new("/arena/12"), "WAITING").unwrap();
    storage.write(Path::new("/other/99"), "WAITING").unwrap();

    assert_eq!(storage.list(Path::new("/arena")).unwrap(), vec!["12", "30"]);
    assert!(storage.list(Path::new("/missing")).is_err());
}

#[test]
fn memory_rename_moves_children() {
    let storage = mem_with_dir("/arena");
    storage.write(Path::new("/arena/master"), "1").unwrap();
    storage.write(Path::new("/arena/7"), "WAITING").unwrap();

    storage
        .rename(Path::new("/arena"), Path::new("/arena.stale.9"))
        .unwrap();

    assert!(!storage.exists(Path::new("/arena")));
    assert_eq!(
        storage.read(Path::new("/arena.stale.9/master")).unwrap(),
        Some("1".to_string())
    );

    storage.remove_all(Path::new("/arena.stale.9")).unwrap();
    assert!(!storage.exists(Path::new("/arena.stale.9/master")));
    assert!(!storage.exists(Path::new("/arena.stale.9")));
}

#[test]
fn memory_rename_refuses_existing_destination() {
    let storage = mem_with_dir("/a");
    storage.create_dir_all(Path::new("/b")).unwrap();
    assert!(storage.rename(Path::new("/a"), Path::new("/b")).is_err());
    assert!(storage.rename(Path::new("/gone"), Path::new("/c")).is_err());
}
