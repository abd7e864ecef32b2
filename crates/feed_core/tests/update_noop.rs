use feed_core::{update, FeedKind, FeedState, Msg};

#[test]
fn update_is_noop() {
    let state = FeedState::new(FeedKind::Grid);
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn tick_is_noop() {
    let state = FeedState::new(FeedKind::Immersive);
    let (next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
