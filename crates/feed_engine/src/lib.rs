//! Feed engine: upstream sources, unique-page fetching, persistence and effect execution.
mod catalog;
mod debounce;
mod engine;
mod seen_store;
mod source;
mod store;
mod types;
mod unique;

pub use catalog::{CatalogSettings, RestCatalog};
pub use debounce::DebouncedWriter;
pub use engine::EngineHandle;
pub use seen_store::{SeenStore, SEEN_STORAGE_KEY};
pub use source::{CatalogSource, CountSource, RandomSampleSource};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
pub use types::{EngineEvent, FailureKind, FetchError, FetchOutcome, StopReason};
pub use unique::fetch_unique_page;
