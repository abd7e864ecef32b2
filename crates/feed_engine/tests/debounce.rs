use std::sync::{mpsc, Arc};
use std::time::Duration;

use feed_core::{SeenSet, MAX_SEEN};
use feed_engine::{
    DebouncedWriter, MemorySessionStore, SeenStore, SessionStore, StoreError, SEEN_STORAGE_KEY,
};

const DEBOUNCE: Duration = Duration::from_millis(300);

fn writer() -> (DebouncedWriter, Arc<MemorySessionStore>) {
    let sessions = Arc::new(MemorySessionStore::new());
    let store = SeenStore::new(sessions.clone(), MAX_SEEN);
    (DebouncedWriter::new(store, DEBOUNCE), sessions)
}

fn stored(sessions: &MemorySessionStore) -> Option<String> {
    sessions.get(SEEN_STORAGE_KEY).unwrap()
}

#[tokio::test(start_paused = true)]
async fn writes_once_after_the_quiet_window() {
    let (mut writer, sessions) = writer();

    writer.schedule(SeenSet::from_ids([1, 2], MAX_SEEN));
    assert!(writer.is_pending());

    tokio::time::sleep(Duration::from_millis(299)).await;
    assert_eq!(stored(&sessions), None);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(stored(&sessions).as_deref(), Some("[1,2]"));
    assert!(!writer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn burst_of_schedules_coalesces_into_last_snapshot() {
    let (mut writer, sessions) = writer();

    writer.schedule(SeenSet::from_ids([1], MAX_SEEN));
    tokio::time::sleep(Duration::from_millis(200)).await;
    writer.schedule(SeenSet::from_ids([1, 2], MAX_SEEN));
    tokio::time::sleep(Duration::from_millis(200)).await;
    // The first timer was restarted, nothing written yet.
    assert_eq!(stored(&sessions), None);

    tokio::time::sleep(Duration::from_millis(101)).await;
    assert_eq!(stored(&sessions).as_deref(), Some("[1,2]"));
}

#[tokio::test(start_paused = true)]
async fn flush_writes_immediately() {
    let (mut writer, sessions) = writer();

    writer.schedule(SeenSet::from_ids([5], MAX_SEEN));
    assert!(writer.flush());
    assert_eq!(stored(&sessions).as_deref(), Some("[5]"));

    // Nothing left for the timer or a second flush.
    assert!(!writer.flush());
    sessions.remove(SEEN_STORAGE_KEY).unwrap();
    tokio::time::sleep(DEBOUNCE * 2).await;
    assert_eq!(stored(&sessions), None);
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_the_pending_write() {
    let (mut writer, sessions) = writer();

    writer.schedule(SeenSet::from_ids([5], MAX_SEEN));
    writer.cancel();
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert!(!writer.is_pending());
    assert_eq!(stored(&sessions), None);
}

/// Store whose writes take a while and announce when they begin.
struct SlowStore {
    inner: MemorySessionStore,
    write_started: mpsc::Sender<()>,
}

impl SessionStore for SlowStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _ = self.write_started.send(());
        std::thread::sleep(Duration::from_millis(200));
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn clear_during_running_write_leaves_no_record() {
    let (write_started, started_rx) = mpsc::channel();
    let sessions = Arc::new(SlowStore {
        inner: MemorySessionStore::new(),
        write_started,
    });
    let store = SeenStore::new(sessions.clone(), MAX_SEEN);
    let mut writer = DebouncedWriter::new(store, Duration::from_millis(10));

    writer.schedule(SeenSet::from_ids([1, 2, 3], MAX_SEEN));
    tokio::task::spawn_blocking(move || started_rx.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap()
        .expect("timer write started");

    writer.clear().unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(sessions.get(SEEN_STORAGE_KEY).unwrap(), None);
    assert!(!writer.is_pending());
}

#[tokio::test(start_paused = true)]
async fn clear_removes_record_and_pending_snapshot() {
    let (mut writer, sessions) = writer();
    sessions.set(SEEN_STORAGE_KEY, "[9]").unwrap();

    writer.schedule(SeenSet::from_ids([1, 2], MAX_SEEN));
    writer.clear().unwrap();
    tokio::time::sleep(DEBOUNCE * 2).await;

    assert_eq!(stored(&sessions), None);
    assert!(!writer.flush());
}
