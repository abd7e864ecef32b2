use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use feed_core::{Effect, FeedSettings};
use feed_logging::{feed_error, feed_info, feed_warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::{fetch_unique_page, CatalogSource, DebouncedWriter, EngineEvent, SeenStore};

/// Executes feed effects on a worker thread that owns a tokio runtime.
///
/// Effects run one at a time in the order they were enqueued, so page
/// requests never overlap. Results come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: UnboundedSender<Effect>,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: thread::JoinHandle<()>,
}

impl EngineHandle {
    pub fn new(catalog: Arc<dyn CatalogSource>, seen_store: SeenStore, settings: FeedSettings) -> Self {
        let (cmd_tx, cmd_rx) = unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    feed_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(run_worker(catalog, seen_store, settings, cmd_rx, event_tx));
        });

        Self {
            cmd_tx,
            event_rx,
            worker,
        }
    }

    pub fn enqueue(&self, effect: Effect) {
        let _ = self.cmd_tx.send(effect);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Stops accepting effects, flushes any pending save and waits for the worker.
    pub fn shutdown(self) {
        let Self {
            cmd_tx,
            event_rx,
            worker,
        } = self;
        drop(cmd_tx);
        if worker.join().is_err() {
            feed_error!("Engine worker panicked");
        }
        drop(event_rx);
    }
}

async fn run_worker(
    catalog: Arc<dyn CatalogSource>,
    seen_store: SeenStore,
    settings: FeedSettings,
    mut cmd_rx: UnboundedReceiver<Effect>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut writer = DebouncedWriter::new(seen_store.clone(), settings.save_debounce);

    while let Some(effect) = cmd_rx.recv().await {
        match effect {
            Effect::LoadSeen => {
                let seen = seen_store.load();
                let _ = event_tx.send(EngineEvent::SeenLoaded(seen));
            }
            Effect::FetchPage {
                ticket,
                limit,
                seen,
                want_total,
            } => {
                let total = if want_total {
                    match catalog.total().await {
                        Ok(total) => Some(total),
                        Err(err) => {
                            feed_warn!("Catalog count unavailable: {}", err);
                            None
                        }
                    }
                } else {
                    None
                };
                let outcome = fetch_unique_page(catalog.as_ref(), limit, &seen, &settings).await;
                feed_info!(
                    "Page {:?}: {} item(s) in {} attempt(s), {:?}",
                    ticket,
                    outcome.items.len(),
                    outcome.attempts,
                    outcome.stop
                );
                let _ = event_tx.send(EngineEvent::PageFetched {
                    ticket,
                    outcome,
                    total,
                });
            }
            Effect::ScheduleSave(seen) => writer.schedule(seen),
            Effect::ClearSaved => {
                if let Err(err) = writer.clear() {
                    feed_error!("Failed to clear seen ids: {}", err);
                }
            }
            Effect::FlushSave => {
                writer.flush();
            }
        }
    }

    writer.flush();
}
