use crate::{Effect, FeedPhase, FeedState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FeedState, msg: Msg) -> (FeedState, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if state.phase() != FeedPhase::Empty {
                return (state, Vec::new());
            }
            if state.kind().persists_seen() {
                state.begin_restore();
                vec![Effect::LoadSeen]
            } else {
                // Every entry into a non-persisted feed starts from scratch.
                state.reset();
                vec![state.begin_fetch()]
            }
        }
        Msg::SeenRestored(seen) => {
            if state.phase() != FeedPhase::Restoring {
                return (state, Vec::new());
            }
            state.install_seen(seen);
            vec![state.begin_fetch()]
        }
        Msg::LoadMore => {
            // Only one request per feed may be in flight.
            if state.phase() == FeedPhase::Populated {
                vec![state.begin_fetch()]
            } else {
                Vec::new()
            }
        }
        Msg::PageLoaded {
            ticket,
            items,
            total,
        } => {
            if !state.is_current(ticket) {
                return (state, Vec::new());
            }
            let delivered = !items.is_empty();
            state.apply_page(items, total);
            if state.kind().persists_seen() && delivered {
                vec![Effect::ScheduleSave(state.seen().clone())]
            } else {
                Vec::new()
            }
        }
        Msg::Refresh => {
            if matches!(state.phase(), FeedPhase::Empty | FeedPhase::Closed) {
                return (state, Vec::new());
            }
            state.reset();
            let mut effects = Vec::with_capacity(2);
            if state.kind().persists_seen() {
                effects.push(Effect::ClearSaved);
            }
            effects.push(state.begin_fetch());
            effects
        }
        Msg::Teardown => {
            if state.phase() == FeedPhase::Closed {
                return (state, Vec::new());
            }
            state.close();
            if state.kind().persists_seen() {
                vec![Effect::FlushSave]
            } else {
                Vec::new()
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
