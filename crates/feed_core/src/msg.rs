#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The feed was entered (mounted).
    Start,
    /// Persisted seen-set finished loading.
    SeenRestored(crate::SeenSet),
    /// The viewer scrolled close to the end of what is loaded.
    LoadMore,
    /// A page request finished.
    PageLoaded {
        ticket: crate::FetchTicket,
        items: Vec<crate::Wallpaper>,
        /// Catalog size, when it was requested and the count call succeeded.
        total: Option<u64>,
    },
    /// User asked for a fresh shuffle.
    Refresh,
    /// The feed was left; late results must be ignored.
    Teardown,
    /// UI/render tick.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
