use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use feed_core::{update, FeedPhase, FeedSettings, FeedState, Msg};
use feed_engine::{CatalogSettings, FileSessionStore, RestCatalog, SeenStore};
use feed_logging::{feed_info, feed_warn};

use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::render;

/// Longest wait for a single engine result before giving up on the session.
const EVENT_TIMEOUT: Duration = Duration::from_secs(120);

pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let kind = config.feed;
    let mut settings = FeedSettings::for_kind(kind);
    if let Some(page_size) = config.page_size {
        settings.page_size = page_size;
    }

    let catalog = RestCatalog::new(CatalogSettings {
        base_url: config.base_url.clone(),
        api_key: config.api_key.clone(),
        request_timeout: config.request_timeout,
        ..CatalogSettings::default()
    })
    .context("invalid catalog settings")?;
    let sessions = Arc::new(FileSessionStore::new(config.state_dir.clone()));
    let seen_store = SeenStore::new(sessions, settings.max_seen);
    let runner = EffectRunner::new(Arc::new(catalog), seen_store, settings.clone());

    let mut session = Session {
        state: FeedState::with_settings(kind, settings),
        runner,
        printed: 0,
    };
    feed_info!("Entering {:?} feed, up to {} page(s)", kind, config.pages);

    session.dispatch(Msg::Start);
    if config.fresh {
        session.dispatch(Msg::Refresh);
    }

    loop {
        match session.state.phase() {
            FeedPhase::Populated if session.state.view().pages_loaded >= config.pages => break,
            FeedPhase::Populated => session.dispatch(Msg::LoadMore),
            FeedPhase::Exhausted | FeedPhase::Closed | FeedPhase::Empty => break,
            FeedPhase::Restoring | FeedPhase::Loading => {
                let Some(msg) = session.runner.next_msg(EVENT_TIMEOUT) else {
                    feed_warn!("No answer from engine within {:?}", EVENT_TIMEOUT);
                    break;
                };
                session.dispatch(msg);
            }
        }
    }

    session.dispatch(Msg::Teardown);
    session.runner.shutdown();
    Ok(())
}

struct Session {
    state: FeedState,
    runner: EffectRunner,
    printed: usize,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.render(&state);
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn render(&mut self, state: &FeedState) {
        let gallery = state.gallery();
        // A refresh empties the gallery; start printing from the top again.
        if gallery.len() < self.printed {
            self.printed = 0;
        }
        for wallpaper in &gallery[self.printed..] {
            println!("{}", render::wallpaper_line(wallpaper));
        }
        self.printed = gallery.len();
        if matches!(
            state.phase(),
            FeedPhase::Populated | FeedPhase::Exhausted | FeedPhase::Closed
        ) {
            println!("{}", render::status_line(&state.view()));
        }
    }
}
