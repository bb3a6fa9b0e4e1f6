//! Bounded-concurrency batch loading.
//!
//! Fetches are driven through a fixed-size pool; results are collected as
//! they complete, so completion order does not matter. A failed fetch is
//! recorded against its ID rather than failing the batch; the caller
//! decides what a missing element means.

use std::collections::{HashMap, HashSet};
use std::future::Future;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::OsmError;

/// Default number of in-flight requests per batch.
pub const DEFAULT_PARALLEL_REQUESTS: usize = 10;

/// Outcome of each fetch in a batch, keyed by ID.
pub type BatchResult<T> = HashMap<i64, Result<T, OsmError>>;

/// Fetch every ID with at most `parallel` fetches in flight.
///
/// Duplicate IDs are fetched once. If `cancel` fires, in-flight fetches are
/// dropped, no new ones are started, and [`OsmError::Cancelled`] is returned.
pub async fn load_many<T, F, Fut>(
    ids: &[i64],
    parallel: usize,
    cancel: &CancellationToken,
    fetch: F,
) -> Result<BatchResult<T>, OsmError>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<T, OsmError>>,
{
    let mut seen = HashSet::with_capacity(ids.len());
    let unique: Vec<i64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    let mut results = HashMap::with_capacity(unique.len());
    if unique.is_empty() {
        return Ok(results);
    }

    if cancel.is_cancelled() {
        return Err(OsmError::Cancelled);
    }

    let mut pending = stream::iter(unique)
        .map(|id| {
            let fut = fetch(id);
            async move { (id, fut.await) }
        })
        .buffer_unordered(parallel.max(1));

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(loaded = results.len(), "batch load cancelled");
                return Err(OsmError::Cancelled);
            }
            next = pending.next() => match next {
                Some((id, Ok(element))) => {
                    results.insert(id, Ok(element));
                }
                Some((id, Err(e))) => {
                    debug!(id, error = %e, "failed to load element");
                    results.insert(id, Err(e));
                }
                None => break,
            },
        }
    }

    Ok(results)
}

/// The first ID, in `order`, whose fetch failed, with its error.
pub fn first_failure<'r, T>(
    results: &'r BatchResult<T>,
    order: &[i64],
) -> Option<(i64, &'r OsmError)> {
    order.iter().find_map(|id| match results.get(id) {
        Some(Err(e)) => Some((*id, e)),
        _ => None,
    })
}
