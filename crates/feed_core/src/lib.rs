//! Feed core: seen-set bookkeeping, paging policy and the pure feed-session state machine.
mod effect;
mod item;
mod msg;
mod policy;
mod seen;
mod settings;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, FetchTicket};
pub use item::{ItemId, Wallpaper};
pub use msg::Msg;
pub use policy::{fetch_size, hint_exclusions, should_stop_paging, PagingPolicy};
pub use seen::{SeenSet, MAX_SEEN};
pub use settings::{FeedKind, FeedSettings};
pub use state::{FeedPhase, FeedState};
pub use update::update;
pub use view_model::FeedViewModel;
