use std::num::NonZeroUsize;
use std::time::Duration;

use crate::MAX_SEEN;

/// Which consumer a feed session backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedKind {
    /// Infinite-scroll grid: large pages, seen-set restored from and saved to
    /// the session store, stops near catalog exhaustion.
    #[default]
    Grid,
    /// Full-screen viewer: small pages, fresh seen-set on every entry,
    /// nothing persisted, stops only when a page comes back empty.
    Immersive,
}

impl FeedKind {
    pub fn default_page_size(self) -> NonZeroUsize {
        match self {
            FeedKind::Grid => NonZeroUsize::new(32).unwrap_or(NonZeroUsize::MIN),
            FeedKind::Immersive => NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn persists_seen(self) -> bool {
        matches!(self, FeedKind::Grid)
    }

    /// Whether paging stops on the catalog-size heuristic.
    pub fn uses_catalog_total(self) -> bool {
        matches!(self, FeedKind::Grid)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(FeedKind::Grid),
            "immersive" => Some(FeedKind::Immersive),
            _ => None,
        }
    }
}

/// Tunables for unique-page fetching and paging.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub page_size: NonZeroUsize,
    /// Upstream round trips allowed per page.
    pub max_attempts: u32,
    /// Multiplier applied to the number of still-needed items per attempt.
    pub overfetch_factor: f64,
    /// How many of the most recent seen ids are forwarded as an exclusion hint.
    pub hint_window: usize,
    pub max_seen: usize,
    /// Fraction of the catalog after which the grid stops paging.
    pub exhaustion_ratio: f64,
    pub save_debounce: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self::for_kind(FeedKind::Grid)
    }
}

impl FeedSettings {
    pub fn for_kind(kind: FeedKind) -> Self {
        Self {
            page_size: kind.default_page_size(),
            max_attempts: 3,
            overfetch_factor: 1.5,
            hint_window: 50,
            max_seen: MAX_SEEN,
            exhaustion_ratio: 0.9,
            save_debounce: Duration::from_millis(300),
        }
    }
}
