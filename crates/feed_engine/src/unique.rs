use std::collections::HashSet;
use std::num::NonZeroUsize;

use feed_core::{fetch_size, hint_exclusions, FeedSettings, ItemId, SeenSet};
use feed_logging::{feed_debug, feed_warn};

use crate::{FetchOutcome, RandomSampleSource, StopReason};

/// Collects up to `limit` items whose ids are neither in `seen` nor repeated.
///
/// The exclusion hint sent upstream is only the most recent slice of `seen`;
/// the filtering here is what guarantees uniqueness. Round trips are
/// sequential and bounded by `settings.max_attempts`. A failed call ends the
/// loop like an empty batch, but is reported as `StopReason::SourceFailed`.
pub async fn fetch_unique_page<S>(
    source: &S,
    limit: NonZeroUsize,
    seen: &SeenSet,
    settings: &FeedSettings,
) -> FetchOutcome
where
    S: RandomSampleSource + ?Sized,
{
    let limit = limit.get();
    let hint = hint_exclusions(seen, settings.hint_window);
    let mut items = Vec::with_capacity(limit);
    let mut taken: HashSet<ItemId> = HashSet::with_capacity(limit);
    let mut attempts = 0;

    while items.len() < limit && attempts < settings.max_attempts {
        let needed = limit - items.len();
        let request = fetch_size(needed, settings.overfetch_factor);

        let batch = match source.sample(request, &hint).await {
            Ok(batch) => batch,
            Err(err) => {
                feed_warn!(
                    "Random sample failed after {} attempt(s), returning {} item(s): {}",
                    attempts,
                    items.len(),
                    err
                );
                return FetchOutcome {
                    items,
                    attempts,
                    stop: StopReason::SourceFailed(err),
                };
            }
        };
        if batch.is_empty() {
            feed_debug!("Random sample returned nothing; source exhausted");
            return FetchOutcome {
                items,
                attempts,
                stop: StopReason::SourceExhausted,
            };
        }

        let offered = batch.len();
        for item in batch {
            if seen.contains(item.id) || !taken.insert(item.id) {
                continue;
            }
            items.push(item);
            if items.len() == limit {
                break;
            }
        }
        attempts += 1;
        feed_debug!(
            "Attempt {} asked {} got {} kept {}/{}",
            attempts,
            request,
            offered,
            items.len(),
            limit
        );
    }

    let stop = if items.len() == limit {
        StopReason::Filled
    } else {
        StopReason::BudgetSpent
    };
    FetchOutcome {
        items,
        attempts,
        stop,
    }
}
