use crate::{ItemId, SeenSet};

/// Number of items to request when `needed` are still missing.
///
/// Never less than `needed`, so a factor below 1.0 degrades to no over-fetch.
pub fn fetch_size(needed: usize, overfetch_factor: f64) -> usize {
    let scaled = (needed as f64 * overfetch_factor).ceil();
    if scaled.is_finite() && scaled > needed as f64 {
        scaled as usize
    } else {
        needed
    }
}

/// Most recent `window` ids of `seen`, forwarded upstream as a best-effort filter.
pub fn hint_exclusions(seen: &SeenSet, window: usize) -> Vec<ItemId> {
    seen.recent(window)
}

/// Stop rule for infinite paging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagingPolicy {
    pub exhaustion_ratio: f64,
}

impl Default for PagingPolicy {
    fn default() -> Self {
        Self {
            exhaustion_ratio: 0.9,
        }
    }
}

impl PagingPolicy {
    pub fn new(exhaustion_ratio: f64) -> Self {
        Self { exhaustion_ratio }
    }

    /// True once the seen-set covers `exhaustion_ratio` of the catalog or the
    /// last page came back short. An unknown total only applies the short-page rule.
    pub fn should_stop(
        &self,
        seen_size: usize,
        total_catalog_size: Option<u64>,
        last_page_size: usize,
        requested_limit: usize,
    ) -> bool {
        let near_exhaustion = total_catalog_size
            .is_some_and(|total| seen_size as f64 >= self.exhaustion_ratio * total as f64);
        near_exhaustion || last_page_size < requested_limit
    }
}

/// [`PagingPolicy::should_stop`] with the default 90% ratio and a known total.
pub fn should_stop_paging(
    seen_size: usize,
    total_catalog_size: u64,
    last_page_size: usize,
    requested_limit: usize,
) -> bool {
    PagingPolicy::default().should_stop(
        seen_size,
        Some(total_catalog_size),
        last_page_size,
        requested_limit,
    )
}
