use std::sync::Arc;
use std::time::Duration;

use feed_core::{Effect, FeedSettings, Msg};
use feed_engine::{CatalogSource, EngineEvent, EngineHandle, SeenStore, StopReason};
use feed_logging::{feed_debug, feed_info, feed_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(catalog: Arc<dyn CatalogSource>, seen_store: SeenStore, settings: FeedSettings) -> Self {
        Self {
            engine: EngineHandle::new(catalog, seen_store, settings),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match &effect {
                Effect::FetchPage {
                    ticket,
                    limit,
                    seen,
                    want_total,
                } => {
                    feed_info!(
                        "FetchPage ticket={:?} limit={} seen={} want_total={}",
                        ticket,
                        limit,
                        seen.len(),
                        want_total
                    );
                }
                Effect::ScheduleSave(seen) => {
                    feed_debug!("ScheduleSave seen={}", seen.len());
                }
                Effect::LoadSeen | Effect::ClearSaved | Effect::FlushSave => {
                    feed_debug!("{:?}", effect);
                }
            }
            self.engine.enqueue(effect);
        }
    }

    /// Waits for the next engine result and turns it into a core message.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        Some(match event {
            EngineEvent::SeenLoaded(seen) => Msg::SeenRestored(seen),
            EngineEvent::PageFetched {
                ticket,
                outcome,
                total,
            } => {
                if let StopReason::SourceFailed(err) = &outcome.stop {
                    feed_warn!(
                        "Page {:?} cut short by upstream failure ({} item(s) kept): {}",
                        ticket,
                        outcome.items.len(),
                        err
                    );
                }
                Msg::PageLoaded {
                    ticket,
                    items: outcome.items,
                    total,
                }
            }
        })
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}
