use feed_core::{SeenSet, Wallpaper, MAX_SEEN};

fn page(ids: impl IntoIterator<Item = i64>) -> Vec<Wallpaper> {
    ids.into_iter().map(Wallpaper::with_id).collect()
}

#[test]
fn update_is_idempotent_for_the_same_page() {
    let seen = SeenSet::from_ids(1..=10, MAX_SEEN);
    let batch = page([8, 11, 12]);

    let once = seen.with_page(&batch);
    let twice = once.with_page(&batch);

    assert_eq!(once, twice);
    assert_eq!(once.len(), 12);
}

#[test]
fn update_never_exceeds_capacity() {
    let seen = SeenSet::from_ids(1..=490, MAX_SEEN);
    let next = seen.with_page(&page(1_000..1_100));

    assert_eq!(next.len(), MAX_SEEN);
    assert_eq!(next.newest(), Some(1_099));
    // The original input is untouched.
    assert_eq!(seen.len(), 490);
}

#[test]
fn full_set_evicts_exactly_the_oldest_id() {
    let seen = SeenSet::from_ids(1..=MAX_SEEN as i64, MAX_SEEN);
    assert_eq!(seen.len(), MAX_SEEN);
    assert_eq!(seen.oldest(), Some(1));

    let next = seen.with_page(&page([10_000]));

    assert_eq!(next.len(), MAX_SEEN);
    assert!(!next.contains(1));
    assert_eq!(next.oldest(), Some(2));
    assert!(next.contains(10_000));
}

#[test]
fn oversized_stored_payload_keeps_most_recent_ids() {
    let ids: Vec<i64> = (1..=800).collect();
    let raw = serde_json::to_string(&ids).unwrap();

    let seen = SeenSet::from_json(&raw, MAX_SEEN).unwrap();

    assert_eq!(seen.len(), MAX_SEEN);
    assert_eq!(seen.oldest(), Some(301));
    assert_eq!(seen.newest(), Some(800));
}

#[test]
fn json_round_trip_preserves_order() {
    let seen = SeenSet::from_ids([42, 7, 19, 3], MAX_SEEN);
    let restored = SeenSet::from_json(&seen.to_json(), MAX_SEEN).unwrap();

    assert_eq!(restored, seen);
    assert_eq!(restored.iter().collect::<Vec<_>>(), vec![42, 7, 19, 3]);
}
