use std::fmt;

use feed_core::{FetchTicket, SeenSet, Wallpaper};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SeenLoaded(SeenSet),
    PageFetched {
        ticket: FetchTicket,
        outcome: FetchOutcome,
        total: Option<u64>,
    },
}

/// Result of one unique-page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub items: Vec<Wallpaper>,
    /// Upstream calls that returned a non-empty batch.
    pub attempts: u32,
    pub stop: StopReason,
}

/// Why the fetch loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The page reached the requested size.
    Filled,
    /// The attempt budget ran out before the page was full.
    BudgetSpent,
    /// The source returned an empty batch.
    SourceExhausted,
    /// The source call failed; the page holds whatever came before.
    SourceFailed(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
