use feed_core::{FeedPhase, FeedViewModel, Wallpaper};

pub fn wallpaper_line(wallpaper: &Wallpaper) -> String {
    let name = if wallpaper.name.is_empty() {
        "(untitled)"
    } else {
        wallpaper.name.as_str()
    };
    format!(
        "#{:<6} {:<32} {}x{} {:<4} {}",
        wallpaper.id, name, wallpaper.width, wallpaper.height, wallpaper.format, wallpaper.image_url
    )
}

pub fn status_line(view: &FeedViewModel) -> String {
    let total = view
        .total
        .map(|total| total.to_string())
        .unwrap_or_else(|| "?".to_string());
    let phase = match view.phase {
        FeedPhase::Empty => "idle",
        FeedPhase::Restoring => "restoring",
        FeedPhase::Loading => "loading",
        FeedPhase::Populated => "more available",
        FeedPhase::Exhausted => "end of catalog",
        FeedPhase::Closed => "closed",
    };
    format!(
        "-- {:?} feed: {} shown, {} seen of {} in catalog, {} page(s), {}",
        view.kind, view.gallery_len, view.seen_len, total, view.pages_loaded, phase
    )
}
