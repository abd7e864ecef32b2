use std::collections::HashMap;

use crate::view_model::FeedViewModel;
use crate::{Effect, FeedKind, FeedSettings, FetchTicket, ItemId, PagingPolicy, SeenSet, Wallpaper};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedPhase {
    /// Not started, or just reset.
    #[default]
    Empty,
    /// Waiting for the persisted seen-set.
    Restoring,
    /// A page request is in flight.
    Loading,
    /// At least one page delivered; more may be requested.
    Populated,
    /// Catalog considered exhausted; only a refresh leaves this phase.
    Exhausted,
    /// The feed was torn down.
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    kind: FeedKind,
    settings: FeedSettings,
    phase: FeedPhase,
    seen: SeenSet,
    gallery: Vec<Wallpaper>,
    gallery_index: HashMap<ItemId, usize>,
    total: Option<u64>,
    last_page_len: Option<usize>,
    pages_loaded: usize,
    next_ticket: u64,
    in_flight: Option<FetchTicket>,
    dirty: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(FeedKind::Grid)
    }
}

impl FeedState {
    pub fn new(kind: FeedKind) -> Self {
        Self::with_settings(kind, FeedSettings::for_kind(kind))
    }

    pub fn with_settings(kind: FeedKind, settings: FeedSettings) -> Self {
        let seen = SeenSet::with_capacity(settings.max_seen);
        Self {
            kind,
            settings,
            phase: FeedPhase::Empty,
            seen,
            gallery: Vec::new(),
            gallery_index: HashMap::new(),
            total: None,
            last_page_len: None,
            pages_loaded: 0,
            next_ticket: 1,
            in_flight: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> FeedViewModel {
        FeedViewModel {
            kind: self.kind,
            phase: self.phase,
            gallery_len: self.gallery.len(),
            seen_len: self.seen.len(),
            total: self.total,
            last_page_len: self.last_page_len,
            pages_loaded: self.pages_loaded,
            has_more: matches!(self.phase, FeedPhase::Populated),
            dirty: self.dirty,
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Everything delivered since the last reset, deduplicated by id.
    pub fn gallery(&self) -> &[Wallpaper] {
        &self.gallery
    }

    pub fn in_flight(&self) -> Option<FetchTicket> {
        self.in_flight
    }

    /// Returns whether the view changed since the previous call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn begin_restore(&mut self) {
        self.phase = FeedPhase::Restoring;
        self.mark_dirty();
    }

    pub(crate) fn install_seen(&mut self, seen: SeenSet) {
        self.seen = seen.trimmed_to(self.settings.max_seen);
    }

    /// Moves to `Loading` and returns the request for the next page.
    pub(crate) fn begin_fetch(&mut self) -> Effect {
        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.phase = FeedPhase::Loading;
        self.mark_dirty();
        Effect::FetchPage {
            ticket,
            limit: self.settings.page_size,
            seen: self.seen.clone(),
            want_total: self.kind.uses_catalog_total() && self.total.is_none(),
        }
    }

    /// Whether `ticket` is the request currently awaited.
    pub(crate) fn is_current(&self, ticket: FetchTicket) -> bool {
        self.phase == FeedPhase::Loading && self.in_flight == Some(ticket)
    }

    /// Applies a current page and decides whether paging continues.
    pub(crate) fn apply_page(&mut self, items: Vec<Wallpaper>, total: Option<u64>) {
        self.in_flight = None;
        if total.is_some() {
            self.total = total;
        }

        self.seen = self.seen.with_page(&items);
        let page_len = items.len();
        self.merge_into_gallery(items);
        self.last_page_len = Some(page_len);
        self.pages_loaded += 1;

        let requested = self.settings.page_size.get();
        let stop = match self.kind {
            FeedKind::Grid => PagingPolicy::new(self.settings.exhaustion_ratio).should_stop(
                self.seen.len(),
                self.total,
                page_len,
                requested,
            ),
            FeedKind::Immersive => page_len == 0,
        };
        self.phase = if stop {
            FeedPhase::Exhausted
        } else {
            FeedPhase::Populated
        };
        self.mark_dirty();
    }

    /// Forgets the seen-set and gallery; any in-flight request becomes stale.
    pub(crate) fn reset(&mut self) {
        self.in_flight = None;
        self.seen.clear();
        self.gallery.clear();
        self.gallery_index.clear();
        self.last_page_len = None;
        self.pages_loaded = 0;
        self.phase = FeedPhase::Empty;
        self.mark_dirty();
    }

    pub(crate) fn close(&mut self) {
        self.in_flight = None;
        self.phase = FeedPhase::Closed;
        self.mark_dirty();
    }

    fn merge_into_gallery(&mut self, items: Vec<Wallpaper>) {
        for item in items {
            match self.gallery_index.get(&item.id) {
                // Keep the original slot, take the fresher payload.
                Some(&slot) => self.gallery[slot] = item,
                None => {
                    self.gallery_index.insert(item.id, self.gallery.len());
                    self.gallery.push(item);
                }
            }
        }
    }
}
