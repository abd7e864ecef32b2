use std::fs;
use std::sync::Arc;

use feed_core::{SeenSet, MAX_SEEN};
use feed_engine::{
    FileSessionStore, MemorySessionStore, SeenStore, SessionStore, StoreError, SEEN_STORAGE_KEY,
};
use tempfile::TempDir;

#[test]
fn file_store_creates_missing_dir_and_replaces_records() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("session");
    let store = FileSessionStore::new(dir.clone());
    assert!(!dir.exists());

    store.set("viewed", "[1]").unwrap();
    assert!(dir.is_dir());
    assert_eq!(store.get("viewed").unwrap().as_deref(), Some("[1]"));

    store.set("viewed", "[1,2]").unwrap();
    assert_eq!(fs::read_to_string(dir.join("viewed.json")).unwrap(), "[1,2]");

    store.remove("viewed").unwrap();
    assert_eq!(store.get("viewed").unwrap(), None);
    // Removing twice is fine.
    store.remove("viewed").unwrap();
}

#[test]
fn file_store_rejects_path_like_keys() {
    let temp = TempDir::new().unwrap();
    let store = FileSessionStore::new(temp.path().to_path_buf());

    let err = store.set("../escape", "x").unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey(_)));
    assert!(store.get("").is_err());
}

#[test]
fn file_store_fails_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let store = FileSessionStore::new(file_path.clone());
    assert!(store.set("viewed", "[]").is_err());
    assert!(!file_path.with_file_name("viewed.json").exists());
}

#[test]
fn seen_store_round_trips() {
    let store = SeenStore::new(Arc::new(MemorySessionStore::new()), MAX_SEEN);
    let seen = SeenSet::from_ids([9, 4, 7, 1], MAX_SEEN);

    store.persist(&seen).unwrap();

    assert_eq!(store.load(), seen);
}

#[test]
fn seen_store_round_trips_through_files() {
    let temp = TempDir::new().unwrap();
    let sessions = Arc::new(FileSessionStore::new(temp.path().to_path_buf()));
    let store = SeenStore::new(sessions, MAX_SEEN);
    let seen = SeenSet::from_ids(1..=MAX_SEEN as i64, MAX_SEEN);

    store.persist(&seen).unwrap();

    let raw = fs::read_to_string(temp.path().join(format!("{SEEN_STORAGE_KEY}.json"))).unwrap();
    assert!(raw.starts_with("[1,2,3,"));
    assert_eq!(store.load(), seen);
}

#[test]
fn seen_store_missing_record_is_empty() {
    let store = SeenStore::new(Arc::new(MemorySessionStore::new()), MAX_SEEN);
    assert!(store.load().is_empty());
}

#[test]
fn seen_store_truncates_oversized_payload() {
    let sessions = Arc::new(MemorySessionStore::new());
    let ids: Vec<i64> = (1..=700).collect();
    sessions
        .set(SEEN_STORAGE_KEY, &serde_json::to_string(&ids).unwrap())
        .unwrap();
    let store = SeenStore::new(sessions, MAX_SEEN);

    let seen = store.load();

    assert_eq!(seen.len(), MAX_SEEN);
    assert_eq!(seen.oldest(), Some(201));
    assert_eq!(seen.newest(), Some(700));
}

#[test]
fn seen_store_discards_corrupt_record() {
    let sessions = Arc::new(MemorySessionStore::new());
    sessions.set(SEEN_STORAGE_KEY, "[1, 2, \"three\"").unwrap();
    let store = SeenStore::new(sessions.clone(), MAX_SEEN);

    assert!(store.load().is_empty());
    assert_eq!(sessions.get(SEEN_STORAGE_KEY).unwrap(), None);
}

#[test]
fn seen_store_clear_removes_record() {
    let sessions = Arc::new(MemorySessionStore::new());
    let store = SeenStore::new(sessions.clone(), MAX_SEEN);
    store.persist(&SeenSet::from_ids([1, 2], MAX_SEEN)).unwrap();

    store.clear().unwrap();

    assert_eq!(sessions.get(SEEN_STORAGE_KEY).unwrap(), None);
    assert!(store.load().is_empty());
}

#[test]
fn independent_keys_do_not_share_history() {
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let grid = SeenStore::with_key(sessions.clone(), "grid", MAX_SEEN);
    let other = SeenStore::with_key(sessions, "other", MAX_SEEN);

    grid.persist(&SeenSet::from_ids([1], MAX_SEEN)).unwrap();

    assert!(other.load().is_empty());
    assert_eq!(grid.load().len(), 1);
}
