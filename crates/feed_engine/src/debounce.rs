use std::sync::{Arc, Mutex};
use std::time::Duration;

use feed_core::SeenSet;
use feed_logging::feed_error;
use tokio_util::sync::CancellationToken;

use crate::{SeenStore, StoreError};

type Pending = Arc<Mutex<Option<SeenSet>>>;

/// Trailing-edge debounce for seen-set writes.
///
/// Each `schedule` replaces the pending snapshot and restarts the timer, so a
/// burst of page loads produces a single write `delay` after the last one.
/// `schedule` spawns onto the current tokio runtime.
///
/// The pending lock is held for the whole store write, so `flush` and `clear`
/// wait for a timer write that is already running.
pub struct DebouncedWriter {
    store: SeenStore,
    delay: Duration,
    pending: Pending,
    timer: Option<CancellationToken>,
}

impl DebouncedWriter {
    pub fn new(store: SeenStore, delay: Duration) -> Self {
        Self {
            store,
            delay,
            pending: Arc::new(Mutex::new(None)),
            timer: None,
        }
    }

    pub fn schedule(&mut self, seen: SeenSet) {
        *lock(&self.pending) = Some(seen);
        self.stop_timer();

        let token = CancellationToken::new();
        self.timer = Some(token.clone());
        let pending = self.pending.clone();
        let store = self.store.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let write = tokio::task::spawn_blocking(move || write_pending(&store, &pending));
                    if write.await.is_err() {
                        feed_error!("Seen-set write task failed");
                    }
                }
            }
        });
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.pending).is_some()
    }

    /// Writes the pending snapshot now. Returns whether anything was written.
    pub fn flush(&mut self) -> bool {
        self.stop_timer();
        write_pending(&self.store, &self.pending)
    }

    /// Drops the pending snapshot without writing it.
    pub fn cancel(&mut self) {
        self.stop_timer();
        lock(&self.pending).take();
    }

    /// Drops the pending snapshot and removes the stored record.
    ///
    /// A write already in progress finishes first and is then removed.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.stop_timer();
        let mut pending = lock(&self.pending);
        pending.take();
        self.store.clear()
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

fn lock(pending: &Pending) -> std::sync::MutexGuard<'_, Option<SeenSet>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_pending(store: &SeenStore, pending: &Pending) -> bool {
    let mut pending = lock(pending);
    let Some(seen) = pending.take() else {
        return false;
    };
    if let Err(err) = store.persist(&seen) {
        feed_error!("Failed to persist seen ids: {}", err);
    }
    true
}
