use std::num::NonZeroUsize;

use crate::SeenSet;

/// Identifies one page request; results carrying any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read the persisted seen-set; answer with `Msg::SeenRestored`.
    LoadSeen,
    /// Fetch one unique page; answer with `Msg::PageLoaded`.
    FetchPage {
        ticket: FetchTicket,
        limit: NonZeroUsize,
        seen: SeenSet,
        want_total: bool,
    },
    /// Persist the seen-set after the debounce window.
    ScheduleSave(SeenSet),
    /// Drop any pending save and remove the persisted record.
    ClearSaved,
    /// Write any pending save now.
    FlushSave,
}
