use serde::{Deserialize, Serialize};

pub type ItemId = i64;

/// A catalog record as returned by the random-sampling RPC.
///
/// Only `id` is interpreted by the feed; everything else is carried through
/// untouched for whoever renders the page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallpaper {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub download_count: i64,
    #[serde(default)]
    pub fav_count: i64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub file_size: String,
    #[serde(default)]
    pub format: String,
}

impl Wallpaper {
    /// A bare record carrying only an id.
    pub fn with_id(id: ItemId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}
