use crate::{FeedKind, FeedPhase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedViewModel {
    pub kind: FeedKind,
    pub phase: FeedPhase,
    pub gallery_len: usize,
    pub seen_len: usize,
    pub total: Option<u64>,
    pub last_page_len: Option<usize>,
    pub pages_loaded: usize,
    pub has_more: bool,
    pub dirty: bool,
}
