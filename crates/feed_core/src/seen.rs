use std::collections::{HashSet, VecDeque};

use crate::{ItemId, Wallpaper};

/// Upper bound on remembered ids per feed session.
pub const MAX_SEEN: usize = 500;

/// Insertion-ordered set of delivered ids with a fixed capacity.
///
/// Adding past capacity evicts the oldest ids first. Re-adding an id that is
/// already present does not refresh its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenSet {
    order: VecDeque<ItemId>,
    members: HashSet<ItemId>,
    capacity: usize,
}

impl Default for SeenSet {
    fn default() -> Self {
        Self::with_capacity(MAX_SEEN)
    }
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity.min(MAX_SEEN)),
            members: HashSet::with_capacity(capacity.min(MAX_SEEN)),
            capacity,
        }
    }

    /// Builds a set from ids listed oldest first, keeping only the last
    /// `capacity` entries of the list.
    pub fn from_ids<I>(ids: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        let ids: Vec<ItemId> = ids.into_iter().collect();
        let start = ids.len().saturating_sub(capacity);
        let mut set = Self::with_capacity(capacity);
        for id in &ids[start..] {
            if set.members.insert(*id) {
                set.order.push_back(*id);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.members.contains(&id)
    }

    /// Ids from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.order.iter().copied()
    }

    pub fn oldest(&self) -> Option<ItemId> {
        self.order.front().copied()
    }

    pub fn newest(&self) -> Option<ItemId> {
        self.order.back().copied()
    }

    /// The `n` most recently added ids, still ordered oldest first.
    pub fn recent(&self, n: usize) -> Vec<ItemId> {
        let skip = self.order.len().saturating_sub(n);
        self.order.iter().skip(skip).copied().collect()
    }

    /// Returns a new set with the page's ids unioned in and the result
    /// trimmed back to capacity. `self` is left untouched.
    pub fn with_page(&self, page: &[Wallpaper]) -> Self {
        self.with_ids(page.iter().map(|wallpaper| wallpaper.id))
    }

    pub fn with_ids<I>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        let mut next = self.clone();
        for id in ids {
            if next.members.insert(id) {
                next.order.push_back(id);
            }
        }
        next.trim();
        next
    }

    /// Returns a copy limited to `capacity`, dropping the oldest ids.
    pub fn trimmed_to(&self, capacity: usize) -> Self {
        let mut next = self.clone();
        next.capacity = capacity;
        next.trim();
        next
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// JSON array of ids, oldest first.
    pub fn to_json(&self) -> String {
        let ids: Vec<ItemId> = self.order.iter().copied().collect();
        // A Vec<i64> always serializes.
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parses a JSON array of ids, keeping the last `capacity` entries.
    pub fn from_json(raw: &str, capacity: usize) -> Result<Self, serde_json::Error> {
        let ids: Vec<ItemId> = serde_json::from_str(raw)?;
        Ok(Self::from_ids(ids, capacity))
    }

    fn trim(&mut self) {
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.members.remove(&evicted);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[ItemId]) -> Vec<Wallpaper> {
        ids.iter().copied().map(Wallpaper::with_id).collect()
    }

    #[test]
    fn union_keeps_first_position_of_existing_ids() {
        let seen = SeenSet::from_ids([1, 2, 3], 10);
        let next = seen.with_page(&page(&[2, 4]));
        assert_eq!(next.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn union_then_trim_drops_oldest() {
        let seen = SeenSet::from_ids([1, 2, 3], 3);
        let next = seen.with_page(&page(&[4, 5]));
        assert_eq!(next.iter().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(!next.contains(1));
        assert!(!next.contains(2));
    }

    #[test]
    fn union_is_computed_before_trimming() {
        // With capacity 1, [A, B, A] unions to {A, B}; the newest id is B.
        let seen = SeenSet::with_capacity(1);
        let next = seen.with_page(&page(&[7, 8, 7]));
        assert_eq!(next.iter().collect::<Vec<_>>(), vec![8]);
    }

    #[test]
    fn from_ids_slices_before_deduplicating() {
        let set = SeenSet::from_ids([1, 2, 2, 3], 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn recent_returns_tail_in_insertion_order() {
        let set = SeenSet::from_ids(1..=60, MAX_SEEN);
        let hint = set.recent(50);
        assert_eq!(hint.len(), 50);
        assert_eq!(hint.first(), Some(&11));
        assert_eq!(hint.last(), Some(&60));
        assert_eq!(SeenSet::new().recent(50), Vec::<ItemId>::new());
    }

    #[test]
    fn json_layout_is_plain_array() {
        let set = SeenSet::from_ids([5, 3, 9], MAX_SEEN);
        assert_eq!(set.to_json(), "[5,3,9]");
        assert_eq!(SeenSet::from_json("[5,3,9]", MAX_SEEN).unwrap(), set);
        assert!(SeenSet::from_json("{\"ids\":1}", MAX_SEEN).is_err());
    }
}
