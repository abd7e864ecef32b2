use std::sync::Arc;

use feed_core::SeenSet;
use feed_logging::{feed_debug, feed_warn};

use crate::{SessionStore, StoreError};

pub const SEEN_STORAGE_KEY: &str = "viewedWallpaperIds";

/// Persists one feed's seen-set as a JSON array of ids.
#[derive(Clone)]
pub struct SeenStore {
    store: Arc<dyn SessionStore>,
    key: String,
    max_seen: usize,
}

impl SeenStore {
    pub fn new(store: Arc<dyn SessionStore>, max_seen: usize) -> Self {
        Self::with_key(store, SEEN_STORAGE_KEY, max_seen)
    }

    pub fn with_key(store: Arc<dyn SessionStore>, key: impl Into<String>, max_seen: usize) -> Self {
        Self {
            store,
            key: key.into(),
            max_seen,
        }
    }

    /// Writes at most `max_seen` of the most recent ids.
    pub fn persist(&self, seen: &SeenSet) -> Result<(), StoreError> {
        let payload = seen.trimmed_to(self.max_seen).to_json();
        self.store.set(&self.key, &payload)?;
        feed_debug!("Persisted {} seen id(s) under {}", seen.len().min(self.max_seen), self.key);
        Ok(())
    }

    /// Reads the stored set, trimmed to `max_seen`.
    ///
    /// Missing, unreadable or corrupt records yield an empty set; a corrupt
    /// record is also removed.
    pub fn load(&self) -> SeenSet {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SeenSet::with_capacity(self.max_seen),
            Err(err) => {
                feed_warn!("Failed to read seen ids under {}: {}", self.key, err);
                return SeenSet::with_capacity(self.max_seen);
            }
        };

        match SeenSet::from_json(&raw, self.max_seen) {
            Ok(seen) => {
                feed_debug!("Loaded {} seen id(s) from {}", seen.len(), self.key);
                seen
            }
            Err(err) => {
                feed_warn!("Discarding corrupt seen ids under {}: {}", self.key, err);
                if let Err(err) = self.store.remove(&self.key) {
                    feed_warn!("Failed to remove corrupt record {}: {}", self.key, err);
                }
                SeenSet::with_capacity(self.max_seen)
            }
        }
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key)
    }
}
