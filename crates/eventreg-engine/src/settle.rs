//! Settle-all join over independent fallible operations.

use std::future::Future;

use futures_util::future::join_all;

/// Outcome of one operation, paired with the input that produced it.
#[derive(Debug)]
pub struct Settled<K, T, E> {
    pub key: K,
    pub result: Result<T, E>,
}

/// Starts `op` for every key and waits until every one has finished.
///
/// All operations are polled concurrently on the current task. A failure
/// never cancels the others; results come back in input order.
pub async fn settle_all<K, T, E, F, Fut>(keys: Vec<K>, mut op: F) -> Vec<Settled<K, T, E>>
where
    F: FnMut(&K) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if keys.is_empty() {
        return Vec::new();
    }
    let pending: Vec<Fut> = keys.iter().map(&mut op).collect();
    let results = join_all(pending).await;
    keys.into_iter()
        .zip(results)
        .map(|(key, result)| Settled { key, result })
        .collect()
}
