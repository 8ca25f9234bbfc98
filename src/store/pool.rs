//! Bounded-concurrency task pool.
//!
//! Runs one async job per input item with at most `concurrency` jobs in
//! flight. Results come back in input order. The batch is all-or-nothing:
//! the first failure is returned and the remaining in-flight jobs are
//! aborted when the pool is dropped.
//!
//! Must be called from within a Tokio runtime.

use std::future::Future;

use tokio::task::JoinSet;
use tracing::debug;

use super::{StoreError, StoreResult};

/// Runs `job(item)` for every item with bounded parallelism.
///
/// A `concurrency` of 0 is treated as 1.
pub async fn run_bounded<I, T, F, Fut>(
    items: Vec<I>,
    concurrency: usize,
    job: F,
) -> StoreResult<Vec<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = StoreResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let limit = concurrency.max(1);
    let total = items.len();
    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let mut in_flight: JoinSet<(usize, StoreResult<T>)> = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let fut = job(item);
        in_flight.spawn(async move { (index, fut.await) });

        if in_flight.len() >= limit {
            collect_one(&mut in_flight, &mut slots).await?;
        }
    }

    while !in_flight.is_empty() {
        collect_one(&mut in_flight, &mut slots).await?;
    }

    debug!(jobs = total, concurrency = limit, "bounded batch complete");
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| StoreError::Unavailable {
                operation: "batch",
                message: format!("job {index} produced no result"),
            })
        })
        .collect()
}

async fn collect_one<T: Send + 'static>(
    in_flight: &mut JoinSet<(usize, StoreResult<T>)>,
    slots: &mut [Option<T>],
) -> StoreResult<()> {
    let Some(joined) = in_flight.join_next().await else {
        return Ok(());
    };
    let (index, result) = joined.map_err(|err| StoreError::Unavailable {
        operation: "batch",
        message: format!("failed to join fetch task: {err}"),
    })?;
    if let Some(slot) = slots.get_mut(index) {
        *slot = Some(result?);
    }
    Ok(())
}
