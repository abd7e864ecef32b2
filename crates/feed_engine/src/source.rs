use feed_core::{ItemId, Wallpaper};

use crate::FetchError;

/// Upstream that hands out pseudo-random catalog items.
#[async_trait::async_trait]
pub trait RandomSampleSource: Send + Sync {
    /// Returns up to `count` items. Ids in `exclude_hint` should be avoided,
    /// but callers must not rely on it. An empty result means the catalog is
    /// exhausted relative to the hint.
    async fn sample(&self, count: usize, exclude_hint: &[ItemId])
        -> Result<Vec<Wallpaper>, FetchError>;
}

/// Upstream that reports the catalog size.
#[async_trait::async_trait]
pub trait CountSource: Send + Sync {
    async fn total(&self) -> Result<u64, FetchError>;
}

/// Both halves of a catalog backend.
pub trait CatalogSource: RandomSampleSource + CountSource {}

impl<T: RandomSampleSource + CountSource + ?Sized> CatalogSource for T {}
